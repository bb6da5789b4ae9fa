//! [`Product`] definitions.

use common::{unit, Currency, DateTime, DateTimeOf, Money};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    domain::{contract, define_text, Contract},
    engine::pricing::RateSchedule,
    validation::{Reason, Violations},
};

/// Rentable item of the catalog.
#[derive(Clone, Debug)]
pub struct Product {
    /// ID of this [`Product`].
    pub id: Id,

    /// [`Object`] describing what this [`Product`] is.
    pub object: Object,

    /// [`Brand`] of this [`Product`].
    pub brand: Brand,

    /// [`Model`] of this [`Product`].
    pub model: Model,

    /// [`Description`] of this [`Product`].
    pub description: Description,

    /// [`Precautions`] to be taken while using this [`Product`].
    pub precautions: Option<Precautions>,

    /// Number of units of this [`Product`] owned.
    pub quantity: Quantity,

    /// Price of renting this [`Product`] for a single day.
    pub price_per_day: Money,

    /// Price of renting this [`Product`] for a full week.
    pub price_per_week: Money,

    /// Refundable deposit taken for this [`Product`].
    pub caution_deposit: Money,

    /// [`DateTime`] when this [`Product`] was created.
    pub created_at: CreationDateTime,
}

impl Product {
    /// Returns the [`RateSchedule`] this [`Product`] is priced by.
    #[must_use]
    pub fn rates(&self) -> RateSchedule {
        RateSchedule::from_amounts(
            self.price_per_day.currency,
            self.price_per_day.amount,
            self.price_per_week.amount,
        )
    }

    /// Returns the display name of this [`Product`].
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.object, self.brand)
    }

    /// Derives the [`Status`] of this [`Product`] at the provided moment from
    /// the given [`Contract`]s.
    ///
    /// [`Contract`]s of other [`Product`]s are ignored.
    #[must_use]
    pub fn status<'c>(
        &self,
        at: DateTime,
        contracts: impl IntoIterator<Item = &'c Contract>,
    ) -> Status {
        let rented = contracts
            .into_iter()
            .filter(|c| {
                c.product_id == self.id
                    && c.status == contract::Status::Active
                    && c.covers(at)
            })
            .map(|c| u32::from(u16::from(c.quantity)))
            .sum::<u32>();
        if rented >= u32::from(u16::from(self.quantity)) {
            Status::Rented
        } else {
            Status::Available
        }
    }
}

/// ID of a [`Product`].
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
    #[doc = "Kind of object a [`Product`] is (e.g. `Drill`)."]
    Object, max = 512
}

define_text! {
    #[doc = "Brand of a [`Product`]."]
    Brand, max = 512
}

define_text! {
    #[doc = "Model of a [`Product`]."]
    Model, max = 512
}

define_text! {
    #[doc = "Free-form description of a [`Product`]."]
    Description, max = 4096
}

define_text! {
    #[doc = "Safety precautions for using a [`Product`]."]
    Precautions, max = 4096
}

/// Highest amount a [`Product`] price or deposit may have.
///
/// Keeps the price of the longest representable rental well within
/// [`Decimal`] range.
pub const MAX_PRICE: Decimal =
    Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Number of units of a [`Product`] or a [`Contract`].
#[derive(Clone, Copy, Debug, Display, Eq, Into, Ord, PartialEq, PartialOrd)]
pub struct Quantity(u16);

impl Quantity {
    /// Single unit.
    pub const ONE: Self = Self(1);

    /// Creates a new [`Quantity`] if the given `value` is positive and fits.
    #[must_use]
    pub fn new(value: impl TryInto<u16>) -> Option<Self> {
        let value = value.try_into().ok()?;
        (value > 0).then_some(Self(value))
    }
}

impl Quantity {
    /// Parses the provided raw `value` of a `field`, recording
    /// [`Reason::NotPositive`] or [`Reason::TooLarge`] if it doesn't fit.
    pub(crate) fn parse<F: Ord>(
        value: i32,
        field: F,
        v: &mut Violations<F>,
    ) -> Option<Self> {
        let quantity = Self::new(value);
        if quantity.is_none() {
            let reason = if value > 0 {
                Reason::TooLarge
            } else {
                Reason::NotPositive
            };
            v.add(field, reason);
        }
        quantity
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

/// Availability of a [`Product`] at some moment.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Status {
    /// At least one unit is free.
    Available,

    /// Every unit is taken by an active [`Contract`].
    Rented,
}

/// [`DateTime`] of a [`Product`] creation.
pub type CreationDateTime = DateTimeOf<(Product, unit::Creation)>;

/// Field of a [`Draft`].
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Field {
    /// [`Draft::object`].
    #[display("object")]
    Object,

    /// [`Draft::brand`].
    #[display("brand")]
    Brand,

    /// [`Draft::model`].
    #[display("model")]
    Model,

    /// [`Draft::description`].
    #[display("description")]
    Description,

    /// [`Draft::precautions`].
    #[display("precautions")]
    Precautions,

    /// [`Draft::quantity`].
    #[display("quantity")]
    Quantity,

    /// [`Draft::price_per_day`].
    #[display("pricePerDay")]
    PricePerDay,

    /// [`Draft::price_per_week`].
    #[display("pricePerWeek")]
    PricePerWeek,

    /// [`Draft::caution_deposit`].
    #[display("cautionDeposit")]
    CautionDeposit,
}

/// Unvalidated input describing a [`Product`].
#[derive(Clone, Debug)]
pub struct Draft {
    /// Raw [`Object`].
    pub object: String,

    /// Raw [`Brand`].
    pub brand: String,

    /// Raw [`Model`].
    pub model: String,

    /// Raw [`Description`].
    pub description: String,

    /// Raw [`Precautions`], blank meaning none.
    pub precautions: Option<String>,

    /// Raw [`Quantity`].
    pub quantity: i32,

    /// Price per day, must be positive.
    pub price_per_day: Money,

    /// Price per week, must be positive.
    pub price_per_week: Money,

    /// Caution deposit, must not be negative.
    pub caution_deposit: Money,
}

/// Validated descriptive part of a [`Product`].
#[derive(Clone, Debug)]
pub struct Details {
    /// [`Product::object`].
    pub object: Object,

    /// [`Product::brand`].
    pub brand: Brand,

    /// [`Product::model`].
    pub model: Model,

    /// [`Product::description`].
    pub description: Description,

    /// [`Product::precautions`].
    pub precautions: Option<Precautions>,

    /// [`Product::quantity`].
    pub quantity: Quantity,

    /// [`Product::price_per_day`].
    pub price_per_day: Money,

    /// [`Product::price_per_week`].
    pub price_per_week: Money,

    /// [`Product::caution_deposit`].
    pub caution_deposit: Money,
}

impl Draft {
    /// Validates this [`Draft`], expecting every price in the provided
    /// [`Currency`].
    ///
    /// # Errors
    ///
    /// With every violated [`Field`] if this [`Draft`] is invalid.
    pub fn validate(
        self,
        currency: Currency,
    ) -> Result<Details, Violations<Field>> {
        let Self {
            object,
            brand,
            model,
            description,
            precautions,
            quantity,
            price_per_day,
            price_per_week,
            caution_deposit,
        } = self;

        let mut v = Violations::new();

        let object = v.text(Field::Object, &object, Object::new);
        let brand = v.text(Field::Brand, &brand, Brand::new);
        let model = v.text(Field::Model, &model, Model::new);
        let description =
            v.text(Field::Description, &description, Description::new);
        let precautions = match precautions {
            Some(p) if !p.trim().is_empty() => {
                v.text(Field::Precautions, &p, Precautions::new).map(Some)
            }
            _ => Some(None),
        };
        let quantity = Quantity::parse(quantity, Field::Quantity, &mut v);

        for (field, price) in [
            (Field::PricePerDay, price_per_day),
            (Field::PricePerWeek, price_per_week),
        ] {
            v.ensure(price.is_positive(), field, Reason::NotPositive);
            v.ensure(price.amount <= MAX_PRICE, field, Reason::TooLarge);
            v.ensure(
                price.currency == currency,
                field,
                Reason::CurrencyMismatch,
            );
        }
        v.ensure(
            !caution_deposit.is_negative(),
            Field::CautionDeposit,
            Reason::Negative,
        );
        v.ensure(
            caution_deposit.amount <= MAX_PRICE,
            Field::CautionDeposit,
            Reason::TooLarge,
        );
        v.ensure(
            caution_deposit.currency == currency,
            Field::CautionDeposit,
            Reason::CurrencyMismatch,
        );

        v.finish(|| {
            Some(Details {
                object: object?,
                brand: brand?,
                model: model?,
                description: description?,
                precautions: precautions?,
                quantity: quantity?,
                price_per_day,
                price_per_week,
                caution_deposit,
            })
        })
    }
}

impl Details {
    /// Builds a new [`Product`] out of these [`Details`].
    #[must_use]
    pub fn into_product(self, id: Id, created_at: CreationDateTime) -> Product {
        let Self {
            object,
            brand,
            model,
            description,
            precautions,
            quantity,
            price_per_day,
            price_per_week,
            caution_deposit,
        } = self;
        Product {
            id,
            object,
            brand,
            model,
            description,
            precautions,
            quantity,
            price_per_day,
            price_per_week,
            caution_deposit,
            created_at,
        }
    }
}

#[cfg(test)]
mod spec {
    use common::{Currency, DateTime, Money};
    use rust_decimal::Decimal;

    use crate::{
        domain::{contract, Contract},
        validation::Reason,
    };

    use super::{Draft, Field, Id, Product, Quantity, Status};

    fn usd(amount: i64) -> Money {
        Money {
            amount: Decimal::from(amount),
            currency: Currency::Usd,
        }
    }

    fn draft() -> Draft {
        Draft {
            object: "Drill".into(),
            brand: "Bosch".into(),
            model: "GSB 18V".into(),
            description: "Cordless hammer drill".into(),
            precautions: None,
            quantity: 2,
            price_per_day: usd(20),
            price_per_week: usd(100),
            caution_deposit: usd(0),
        }
    }

    fn product(quantity: u16) -> Product {
        draft()
            .validate(Currency::Usd)
            .unwrap()
            .into_product(Id::new(), DateTime::now().coerce())
            .with_quantity(quantity)
    }

    impl Product {
        fn with_quantity(mut self, quantity: u16) -> Self {
            self.quantity = Quantity::new(quantity).unwrap();
            self
        }
    }

    fn dt(s: &str) -> DateTime {
        DateTime::from_rfc3339(s).unwrap()
    }

    fn active(product: &Product, start: &str, end: &str) -> Contract {
        Contract {
            id: contract::Id::new(),
            product_id: product.id,
            user_id: crate::domain::user::Id::new(),
            quantity: Quantity::ONE,
            start_date: dt(start).coerce(),
            end_date: dt(end).coerce(),
            total_price: usd(0),
            status: contract::Status::Active,
            state_before: None,
            state_after: None,
            created_at: DateTime::now().coerce(),
        }
    }

    #[test]
    fn accepts_valid_draft() {
        let details = draft().validate(Currency::Usd).unwrap();

        assert_eq!(AsRef::<str>::as_ref(&details.object), "Drill");
        assert_eq!(u16::from(details.quantity), 2);
        assert!(details.precautions.is_none());
    }

    #[test]
    fn trims_text_fields() {
        let mut d = draft();
        d.brand = "  Makita ".into();
        d.precautions = Some("   ".into());

        let details = d.validate(Currency::Usd).unwrap();
        assert_eq!(AsRef::<str>::as_ref(&details.brand), "Makita");
        assert!(details.precautions.is_none());
    }

    #[test]
    fn reports_every_violation() {
        let mut d = draft();
        d.object = String::new();
        d.model = " ".into();
        d.quantity = 0;
        d.price_per_day = usd(0);
        d.price_per_week = usd(-5);
        d.caution_deposit = usd(-1);

        let v = d.validate(Currency::Usd).unwrap_err();
        assert_eq!(v.len(), 6);
        assert_eq!(v.get(&Field::Object), Some(Reason::Required));
        assert_eq!(v.get(&Field::Model), Some(Reason::Required));
        assert_eq!(v.get(&Field::Quantity), Some(Reason::NotPositive));
        assert_eq!(v.get(&Field::PricePerDay), Some(Reason::NotPositive));
        assert_eq!(v.get(&Field::PricePerWeek), Some(Reason::NotPositive));
        assert_eq!(v.get(&Field::CautionDeposit), Some(Reason::Negative));
        assert_eq!(v.get(&Field::Brand), None);
    }

    #[test]
    fn rejects_oversized_values() {
        let mut d = draft();
        d.quantity = i32::from(u16::MAX) + 1;
        d.price_per_day.amount = Decimal::MAX;
        d.caution_deposit.amount = super::MAX_PRICE + Decimal::ONE;

        let v = d.validate(Currency::Usd).unwrap_err();
        assert_eq!(v.len(), 3);
        assert_eq!(v.get(&Field::Quantity), Some(Reason::TooLarge));
        assert_eq!(v.get(&Field::PricePerDay), Some(Reason::TooLarge));
        assert_eq!(v.get(&Field::CautionDeposit), Some(Reason::TooLarge));
    }

    #[test]
    fn accepts_highest_price() {
        let mut d = draft();
        d.price_per_week.amount = super::MAX_PRICE;

        assert!(d.validate(Currency::Usd).is_ok());
    }

    #[test]
    fn accepts_zero_deposit_only() {
        let mut d = draft();
        d.caution_deposit = usd(0);
        assert!(d.validate(Currency::Usd).is_ok());
    }

    #[test]
    fn rejects_foreign_currency() {
        let mut d = draft();
        d.price_per_week.currency = Currency::Eur;

        let v = d.validate(Currency::Usd).unwrap_err();
        assert_eq!(v.get(&Field::PricePerWeek), Some(Reason::CurrencyMismatch));
    }

    #[test]
    fn rejects_too_long_text() {
        let mut d = draft();
        d.object = "x".repeat(513);

        let v = d.validate(Currency::Usd).unwrap_err();
        assert_eq!(v.get(&Field::Object), Some(Reason::TooLong));
    }

    #[test]
    fn is_rented_once_every_unit_is_taken() {
        let p = product(2);
        let at = dt("2024-05-10T12:00:00Z");

        let one = [active(&p, "2024-05-01T00:00:00Z", "2024-05-20T00:00:00Z")];
        assert_eq!(p.status(at, &one), Status::Available);

        let two = [
            active(&p, "2024-05-01T00:00:00Z", "2024-05-20T00:00:00Z"),
            active(&p, "2024-05-09T00:00:00Z", "2024-05-11T00:00:00Z"),
        ];
        assert_eq!(p.status(at, &two), Status::Rented);
    }

    #[test]
    fn ignores_inactive_and_foreign_contracts() {
        let p = product(1);
        let other = product(1);
        let at = dt("2024-05-10T12:00:00Z");

        let mut pending =
            active(&p, "2024-05-01T00:00:00Z", "2024-05-20T00:00:00Z");
        pending.status = contract::Status::Pending;
        let foreign =
            active(&other, "2024-05-01T00:00:00Z", "2024-05-20T00:00:00Z");
        let ended = active(&p, "2024-05-01T00:00:00Z", "2024-05-10T12:00:00Z");

        assert_eq!(
            p.status(at, [&pending, &foreign, &ended]),
            Status::Available,
        );
    }
}
