//! [`Contract`] definitions.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;
use std::{convert::Infallible, fmt};

use common::{unit, DateTime, DateTimeOf, Money};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{accepts, private::BytesMut, to_sql_checked, IsNull, Type};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    domain::{define_text, product, user},
    validation::{Reason, Violations},
};

/// Rental agreement of a [`Product`] by a [`User`] over a period.
///
/// [`Product`]: crate::domain::Product
/// [`User`]: crate::domain::User
#[derive(Clone, Debug)]
pub struct Contract {
    /// ID of this [`Contract`].
    pub id: Id,

    /// ID of the rented [`Product`].
    ///
    /// [`Product`]: crate::domain::Product
    pub product_id: product::Id,

    /// ID of the renting [`User`].
    ///
    /// [`User`]: crate::domain::User
    pub user_id: user::Id,

    /// Number of rented units.
    pub quantity: product::Quantity,

    /// Beginning of the rental period.
    pub start_date: StartDate,

    /// Exclusive end of the rental period.
    pub end_date: EndDate,

    /// Price fixed when this [`Contract`] was created.
    pub total_price: Money,

    /// [`Status`] of this [`Contract`].
    pub status: Status,

    /// [`Condition`] of the rented units when handed over.
    pub state_before: Option<Condition>,

    /// [`Condition`] of the rented units when returned.
    pub state_after: Option<Condition>,

    /// [`DateTime`] when this [`Contract`] was created.
    pub created_at: CreationDateTime,
}

impl Contract {
    /// Indicates whether the rental period of this [`Contract`] contains the
    /// provided moment.
    #[must_use]
    pub fn covers(&self, at: DateTime) -> bool {
        self.start_date.coerce() <= at && at < self.end_date.coerce()
    }
}

/// ID of a [`Contract`].
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
    PartialEq,
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
    #[doc = "Notes on the condition of rented units."]
    Condition, max = 4096
}

/// Lifecycle status of a [`Contract`].
///
/// Any label is accepted: the well-known ones are parsed exactly
/// (case-sensitive), while any other is kept verbatim as [`Status::Other`].
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum Status {
    /// Agreed, but the units aren't handed over yet.
    #[default]
    Pending,

    /// Units are handed over to the renter.
    Active,

    /// Units are returned.
    Completed,

    /// Called off.
    Cancelled,

    /// Unrecognized label.
    Other(String),
}

impl Status {
    /// Maximum allowed length of a [`Status`] label (in chars).
    pub const MAX_LEN: usize = 512;

    /// Indicates whether the label of this [`Status`] is non-blank and fits
    /// into [`Status::MAX_LEN`].
    #[must_use]
    pub fn is_storable(&self) -> bool {
        let label = self.as_str();
        !label.trim().is_empty() && label.chars().count() <= Self::MAX_LEN
    }

    /// Returns the label of this [`Status`].
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::Active => "Active",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::Other(label) => label,
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Pending" => Self::Pending,
            "Active" => Self::Active,
            "Completed" => Self::Completed,
            "Cancelled" => Self::Cancelled,
            other => Self::Other(other.to_owned()),
        })
    }
}

#[cfg(feature = "postgres")]
impl FromSql<'_> for Status {
    accepts!(VARCHAR, TEXT);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        let label = <&str as FromSql>::from_sql(ty, raw)?;
        Ok(label.parse().unwrap_or_else(|e: Infallible| match e {}))
    }
}

#[cfg(feature = "postgres")]
impl ToSql for Status {
    accepts!(VARCHAR, TEXT);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        self.as_str().to_sql(ty, w)
    }
}

/// [`DateTime`] a [`Contract`] period starts at.
pub type StartDate = DateTimeOf<(Contract, unit::Start)>;

/// [`DateTime`] a [`Contract`] period ends at (exclusive).
pub type EndDate = DateTimeOf<(Contract, unit::End)>;

/// [`DateTime`] of a [`Contract`] creation.
pub type CreationDateTime = DateTimeOf<(Contract, unit::Creation)>;

/// Field of a [`Draft`].
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Field {
    /// [`Draft::start_date`].
    #[display("startDate")]
    StartDate,

    /// [`Draft::end_date`].
    #[display("endDate")]
    EndDate,

    /// [`Draft::quantity`].
    #[display("quantity")]
    Quantity,

    /// [`Draft::state_before`].
    #[display("stateBefore")]
    StateBefore,

    /// [`Contract::status`].
    #[display("status")]
    Status,

    /// [`Contract::state_after`].
    #[display("stateAfter")]
    StateAfter,
}

/// Unvalidated rental terms of a new [`Contract`].
#[derive(Clone, Debug)]
pub struct Draft {
    /// Requested [`StartDate`].
    pub start_date: DateTime,

    /// Requested [`EndDate`].
    pub end_date: DateTime,

    /// Requested number of units.
    pub quantity: i32,

    /// Raw [`Condition`] at hand-over, blank meaning none.
    pub state_before: Option<String>,
}

/// Validated rental terms of a new [`Contract`].
#[derive(Clone, Debug)]
pub struct Terms {
    /// [`Contract::start_date`].
    pub start_date: StartDate,

    /// [`Contract::end_date`].
    pub end_date: EndDate,

    /// [`Contract::quantity`].
    pub quantity: product::Quantity,

    /// [`Contract::state_before`].
    pub state_before: Option<Condition>,
}

impl Draft {
    /// Validates this [`Draft`].
    ///
    /// Equal dates are accepted and denote an empty period.
    ///
    /// # Errors
    ///
    /// With every violated [`Field`] if this [`Draft`] is invalid.
    pub fn validate(self) -> Result<Terms, Violations<Field>> {
        let Self {
            start_date,
            end_date,
            quantity,
            state_before,
        } = self;

        let mut v = Violations::new();

        v.ensure(end_date >= start_date, Field::EndDate, Reason::BeforeStart);
        let quantity =
            product::Quantity::parse(quantity, Field::Quantity, &mut v);
        let state_before = match state_before {
            Some(s) if !s.trim().is_empty() => {
                v.text(Field::StateBefore, &s, Condition::new).map(Some)
            }
            _ => Some(None),
        };

        v.finish(|| {
            Some(Terms {
                start_date: start_date.coerce(),
                end_date: end_date.coerce(),
                quantity: quantity?,
                state_before: state_before?,
            })
        })
    }
}

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::validation::Reason;

    use super::{Draft, Field, Status};

    fn dt(s: &str) -> DateTime {
        DateTime::from_rfc3339(s).unwrap()
    }

    fn draft(start: &str, end: &str) -> Draft {
        Draft {
            start_date: dt(start),
            end_date: dt(end),
            quantity: 1,
            state_before: None,
        }
    }

    #[test]
    fn parses_known_statuses_exactly() {
        assert_eq!("Active".parse(), Ok(Status::Active));
        assert_eq!("Cancelled".parse(), Ok(Status::Cancelled));
        assert_eq!("active".parse(), Ok(Status::Other("active".into())));
        assert_eq!(Status::default(), Status::Pending);
    }

    #[test]
    fn keeps_unknown_status_label() {
        let status: Status = "On hold".parse().unwrap();

        assert_eq!(status, Status::Other("On hold".into()));
        assert_eq!(status.to_string(), "On hold");
    }

    #[test]
    fn checks_status_label_storability() {
        assert!(Status::Active.is_storable());
        assert!(Status::Other("On hold".into()).is_storable());
        assert!(!Status::Other("  ".into()).is_storable());
        assert!(!Status::Other("x".repeat(Status::MAX_LEN + 1)).is_storable());
    }

    #[test]
    fn rejects_inverted_period() {
        let v = draft("2024-01-10T00:00:00Z", "2024-01-09T00:00:00Z")
            .validate()
            .unwrap_err();

        assert_eq!(v.get(&Field::EndDate), Some(Reason::BeforeStart));
    }

    #[test]
    fn accepts_empty_period() {
        let terms = draft("2024-01-10T00:00:00Z", "2024-01-10T00:00:00Z")
            .validate()
            .unwrap();

        assert_eq!(terms.start_date.coerce::<()>(), terms.end_date.coerce());
    }

    #[test]
    fn rejects_non_positive_quantity() {
        let mut d = draft("2024-01-10T00:00:00Z", "2024-01-12T00:00:00Z");
        d.quantity = 0;

        let v = d.validate().unwrap_err();
        assert_eq!(v.get(&Field::Quantity), Some(Reason::NotPositive));
    }

    #[test]
    fn rejects_oversized_quantity() {
        let mut d = draft("2024-01-10T00:00:00Z", "2024-01-12T00:00:00Z");
        d.quantity = 70_000;

        let v = d.validate().unwrap_err();
        assert_eq!(v.get(&Field::Quantity), Some(Reason::TooLarge));
    }
}
