//! [`User`] definitions.

use std::sync::LazyLock;

use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{domain::define_text, validation::Violations};

/// Renter of [`Product`]s.
///
/// [`Product`]: crate::domain::Product
#[derive(Clone, Debug)]
pub struct User {
    /// ID of this [`User`].
    pub id: Id,

    /// First [`Name`] of this [`User`].
    pub first_name: Name,

    /// Last [`Name`] of this [`User`].
    pub last_name: Name,

    /// [`Email`] of this [`User`].
    pub email: Email,

    /// [`Phone`] of this [`User`].
    pub phone: Phone,

    /// [`PostalAddress`] of this [`User`].
    pub postal_address: PostalAddress,

    /// [`City`] of this [`User`].
    pub city: City,

    /// [`BirthDate`] of this [`User`].
    pub birth_date: BirthDate,

    /// [`DateTime`] when this [`User`] was created.
    ///
    /// [`DateTime`]: common::DateTime
    pub created_at: CreationDateTime,
}

impl User {
    /// Returns the full name of this [`User`].
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// ID of a [`User`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

define_text! {
    #[doc = "First or last name of a [`User`]."]
    Name, max = 512
}

define_text! {
    #[doc = "Street part of a [`User`]'s postal address."]
    PostalAddress, max = 512
}

define_text! {
    #[doc = "City a [`User`] lives in."]
    City, max = 512
}

/// Email address of a [`User`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Email(String);

impl Email {
    /// Creates a new [`Email`] if the given `address` is valid.
    ///
    /// Surrounding whitespace is trimmed.
    #[must_use]
    pub fn new(address: impl AsRef<str>) -> Option<Self> {
        let address = address.as_ref().trim();
        Self::check(address).then(|| Self(address.to_owned()))
    }

    /// Checks whether the given `address` is a valid [`Email`].
    fn check(address: &str) -> bool {
        /// Regular expression checking [`Email`] format: a local part, a `@`
        /// and a dotted domain, none of them containing whitespace or `@`.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("valid regex")
        });

        address.len() <= 320 && REGEX.is_match(address)
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

/// Phone number of a [`User`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Phone(String);

impl Phone {
    /// Creates a new [`Phone`] if the given `number` is valid.
    ///
    /// Surrounding whitespace is trimmed.
    #[must_use]
    pub fn new(number: impl AsRef<str>) -> Option<Self> {
        let number = number.as_ref().trim();
        Self::check(number).then(|| Self(number.to_owned()))
    }

    /// Checks whether the given `number` is a valid [`Phone`].
    fn check(number: &str) -> bool {
        /// Regular expression checking [`Phone`] format: an optional leading
        /// `+` followed by digits, spaces, dashes, dots and parentheses.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^\+?[\d\s().-]{5,32}$").expect("valid regex")
        });

        REGEX.is_match(number)
            && number.chars().filter(char::is_ascii_digit).count() >= 5
    }
}

impl FromStr for Phone {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Phone`")
    }
}

/// Birth date of a [`User`] in `YYYY-MM-DD` format.
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct BirthDate(String);

impl BirthDate {
    /// Creates a new [`BirthDate`] if the given `date` is an existing
    /// calendar date.
    #[must_use]
    pub fn new(date: impl AsRef<str>) -> Option<Self> {
        let date = date.as_ref().trim();
        Self::check(date).then(|| Self(date.to_owned()))
    }

    /// Checks whether the given `date` is a valid [`BirthDate`].
    fn check(date: &str) -> bool {
        /// Regular expression capturing year, month and day of a
        /// [`BirthDate`].
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid regex")
        });

        let Some(caps) = REGEX.captures(date) else {
            return false;
        };
        let (Ok(year), Ok(month), Ok(day)) = (
            caps[1].parse::<u16>(),
            caps[2].parse::<u8>(),
            caps[3].parse::<u8>(),
        ) else {
            return false;
        };

        let leap = year % 4 == 0 && (year % 100 != 0 || year % 400 == 0);
        let days_in_month = match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 if leap => 29,
            2 => 28,
            _ => return false,
        };
        year >= 1900 && (1..=days_in_month).contains(&day)
    }
}

impl FromStr for BirthDate {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `BirthDate`")
    }
}

/// [`DateTime`] of a [`User`] creation.
///
/// [`DateTime`]: common::DateTime
pub type CreationDateTime = DateTimeOf<(User, unit::Creation)>;

/// Field of a [`Draft`].
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Field {
    /// [`Draft::first_name`].
    #[display("firstName")]
    FirstName,

    /// [`Draft::last_name`].
    #[display("lastName")]
    LastName,

    /// [`Draft::email`].
    #[display("email")]
    Email,

    /// [`Draft::phone`].
    #[display("phoneNumber")]
    Phone,

    /// [`Draft::postal_address`].
    #[display("postalAddress")]
    PostalAddress,

    /// [`Draft::city`].
    #[display("city")]
    City,

    /// [`Draft::birth_date`].
    #[display("birthDate")]
    BirthDate,
}

/// Unvalidated input describing a [`User`].
#[derive(Clone, Debug)]
pub struct Draft {
    /// Raw first [`Name`].
    pub first_name: String,

    /// Raw last [`Name`].
    pub last_name: String,

    /// Raw [`Email`].
    pub email: String,

    /// Raw [`Phone`].
    pub phone: String,

    /// Raw [`PostalAddress`].
    pub postal_address: String,

    /// Raw [`City`].
    pub city: String,

    /// Raw [`BirthDate`].
    pub birth_date: String,
}

impl Draft {
    /// Validates this [`Draft`] into a new [`User`].
    ///
    /// # Errors
    ///
    /// With every violated [`Field`] if this [`Draft`] is invalid.
    pub fn validate(
        self,
        id: Id,
        created_at: CreationDateTime,
    ) -> Result<User, Violations<Field>> {
        let Self {
            first_name,
            last_name,
            email,
            phone,
            postal_address,
            city,
            birth_date,
        } = self;

        let mut v = Violations::new();

        let first_name = v.text(Field::FirstName, &first_name, Name::new);
        let last_name = v.text(Field::LastName, &last_name, Name::new);
        let email = v.formatted(Field::Email, &email, Email::new);
        let phone = v.formatted(Field::Phone, &phone, Phone::new);
        let postal_address =
            v.text(Field::PostalAddress, &postal_address, PostalAddress::new);
        let city = v.text(Field::City, &city, City::new);
        let birth_date =
            v.formatted(Field::BirthDate, &birth_date, BirthDate::new);

        v.finish(|| {
            Some(User {
                id,
                first_name: first_name?,
                last_name: last_name?,
                email: email?,
                phone: phone?,
                postal_address: postal_address?,
                city: city?,
                birth_date: birth_date?,
                created_at,
            })
        })
    }
}

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::validation::Reason;

    use super::{BirthDate, Draft, Email, Field, Id, Phone};

    fn draft() -> Draft {
        Draft {
            first_name: "Jeanne".into(),
            last_name: "Martin".into(),
            email: "jeanne.martin@example.com".into(),
            phone: "+33 6 12 34 56 78".into(),
            postal_address: "12 rue des Lilas".into(),
            city: "Lyon".into(),
            birth_date: "1990-02-28".into(),
        }
    }

    #[test]
    fn accepts_valid_draft() {
        let user = draft()
            .validate(Id::new(), DateTime::now().coerce())
            .unwrap();

        assert_eq!(user.full_name(), "Jeanne Martin");
        assert_eq!(
            AsRef::<str>::as_ref(&user.email),
            "jeanne.martin@example.com",
        );
    }

    #[test]
    fn reports_every_violation() {
        let mut d = draft();
        d.first_name = " ".into();
        d.email = "jeanne.example.com".into();
        d.phone = String::new();
        d.birth_date = "28/02/1990".into();

        let v = d.validate(Id::new(), DateTime::now().coerce()).unwrap_err();
        assert_eq!(v.len(), 4);
        assert_eq!(v.get(&Field::FirstName), Some(Reason::Required));
        assert_eq!(v.get(&Field::Email), Some(Reason::Malformed));
        assert_eq!(v.get(&Field::Phone), Some(Reason::Required));
        assert_eq!(v.get(&Field::BirthDate), Some(Reason::Malformed));
    }

    #[test]
    fn checks_email_format() {
        for valid in ["a@b.co", "first.last+tag@mail.example.org"] {
            assert!(Email::new(valid).is_some(), "{valid}");
        }
        for invalid in ["", "a@b", "@b.co", "a b@c.de", "a@@b.co", "a@b."] {
            assert!(Email::new(invalid).is_none(), "{invalid}");
        }
    }

    #[test]
    fn checks_phone_format() {
        for valid in ["0612345678", "+1 (555) 010-0199", "06.12.34.56.78"] {
            assert!(Phone::new(valid).is_some(), "{valid}");
        }
        for invalid in ["123", "phone", "+++1234567"] {
            assert!(Phone::new(invalid).is_none(), "{invalid}");
        }
    }

    #[test]
    fn checks_birth_date_exists() {
        for valid in ["2000-02-29", "1985-12-31"] {
            assert!(BirthDate::new(valid).is_some(), "{valid}");
        }
        for invalid in ["1900-02-29", "2023-04-31", "2023-13-01", "1990-1-1"] {
            assert!(BirthDate::new(invalid).is_none(), "{invalid}");
        }
    }
}
