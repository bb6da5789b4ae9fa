//! [`Contract`] read model definitions.

use std::{collections::HashMap, fmt};

use common::{DateTime, Money};

use crate::{
    domain::{contract, product, user, Contract, Product, User},
    engine::pricing,
};

/// Placeholder of a value unknown because of a missing reference.
const UNKNOWN: &str = "Unknown";

/// Placeholder of a value to be filled in by hand on a [`Document`].
const BLANK: &str = "___________________";

/// [`Contract`] with its [`Product`] and [`User`] attached, if they still
/// exist.
#[derive(Clone, Debug)]
pub struct Joined {
    /// Joined [`Contract`].
    pub contract: Contract,

    /// [`Product`] the [`Contract`] refers to.
    pub product: Option<Product>,

    /// [`User`] the [`Contract`] refers to.
    pub user: Option<User>,
}

impl Joined {
    /// Attaches the [`Product`]s and [`User`]s referred by the provided
    /// [`Contract`]s, keeping their order.
    ///
    /// A reference missing from the given collections is left empty.
    #[must_use]
    pub fn join(
        contracts: impl IntoIterator<Item = Contract>,
        products: &HashMap<product::Id, Product>,
        users: &HashMap<user::Id, User>,
    ) -> Vec<Self> {
        contracts
            .into_iter()
            .map(|contract| Self {
                product: products.get(&contract.product_id).cloned(),
                user: users.get(&contract.user_id).cloned(),
                contract,
            })
            .collect()
    }
}

/// Flattened view of a [`Contract`] to be printed and signed.
#[derive(Clone, Debug)]
pub struct Document {
    /// ID of the [`Contract`].
    pub contract_id: contract::Id,

    /// Date the [`Document`] is issued at, in `YYYY-MM-DD` format.
    pub issued_on: String,

    /// [`contract::Status`] of the [`Contract`].
    pub status: contract::Status,

    /// [`product::Object`] of the rented [`Product`].
    pub object: String,

    /// [`product::Brand`] of the rented [`Product`].
    pub brand: String,

    /// [`product::Model`] of the rented [`Product`].
    pub model: String,

    /// [`product::Description`] of the rented [`Product`].
    pub description: String,

    /// [`product::Precautions`] of the rented [`Product`].
    pub precautions: String,

    /// Number of rented units.
    pub quantity: u16,

    /// Day rate of the rented [`Product`].
    pub price_per_day: Option<Money>,

    /// Week rate of the rented [`Product`].
    pub price_per_week: Option<Money>,

    /// Caution deposit of the rented [`Product`].
    pub caution_deposit: Option<Money>,

    /// Full name of the renting [`User`].
    pub renter_name: String,

    /// [`user::Email`] of the renting [`User`].
    pub renter_email: String,

    /// [`user::Phone`] of the renting [`User`].
    pub renter_phone: String,

    /// [`user::PostalAddress`] of the renting [`User`].
    pub renter_address: String,

    /// [`user::City`] of the renting [`User`].
    pub renter_city: String,

    /// Start of the rental period, in `YYYY-MM-DD` format.
    pub start_date: String,

    /// End of the rental period, in `YYYY-MM-DD` format.
    pub end_date: String,

    /// Number of rented days.
    pub days: i64,

    /// Total price fixed by the [`Contract`].
    pub total_price: Money,

    /// Condition at hand-over.
    pub state_before: Option<String>,

    /// Condition at return.
    pub state_after: Option<String>,
}

impl Document {
    /// Flattens the provided [`Joined`] [`Contract`] into a [`Document`]
    /// issued at the given moment.
    ///
    /// Missing [`Product`] or [`User`] details are filled with placeholders.
    #[must_use]
    pub fn new(joined: &Joined, issued_at: DateTime) -> Self {
        let Joined {
            contract,
            product,
            user,
        } = joined;
        let product = product.as_ref();
        let user = user.as_ref();

        let text = |v: Option<String>| v.unwrap_or_else(|| UNKNOWN.to_owned());

        Self {
            contract_id: contract.id,
            issued_on: issued_at.to_date_string(),
            status: contract.status.clone(),
            object: text(product.map(|p| p.object.to_string())),
            brand: text(product.map(|p| p.brand.to_string())),
            model: text(product.map(|p| p.model.to_string())),
            description: text(product.map(|p| p.description.to_string())),
            precautions: product
                .and_then(|p| p.precautions.as_ref())
                .map_or_else(|| "None".to_owned(), ToString::to_string),
            quantity: contract.quantity.into(),
            price_per_day: product.map(|p| p.price_per_day),
            price_per_week: product.map(|p| p.price_per_week),
            caution_deposit: product.map(|p| p.caution_deposit),
            renter_name: user.map_or_else(|| UNKNOWN.to_owned(), User::full_name),
            renter_email: text(user.map(|u| u.email.to_string())),
            renter_phone: text(user.map(|u| u.phone.to_string())),
            renter_address: text(user.map(|u| u.postal_address.to_string())),
            renter_city: text(user.map(|u| u.city.to_string())),
            start_date: contract.start_date.to_date_string(),
            end_date: contract.end_date.to_date_string(),
            days: pricing::rental_days(
                contract.start_date.coerce(),
                contract.end_date.coerce(),
            ),
            total_price: contract.total_price,
            state_before: contract.state_before.as_ref().map(ToString::to_string),
            state_after: contract.state_after.as_ref().map(ToString::to_string),
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let money = |m: Option<Money>| {
            m.map_or_else(|| UNKNOWN.to_owned(), |m| m.to_string())
        };

        writeln!(f, "RENTAL CONTRACT")?;
        writeln!(f, "Contract #: {}", self.contract_id)?;
        writeln!(f, "Date: {}", self.issued_on)?;
        writeln!(f, "Status: {}", self.status)?;
        writeln!(f)?;

        writeln!(f, "1. PRODUCT INFORMATION")?;
        writeln!(f, "  Object: {}", self.object)?;
        writeln!(f, "  Brand: {}", self.brand)?;
        writeln!(f, "  Model: {}", self.model)?;
        writeln!(f, "  Description: {}", self.description)?;
        writeln!(f, "  Precautions: {}", self.precautions)?;
        writeln!(f, "  Quantity: {}", self.quantity)?;
        writeln!(f)?;

        writeln!(f, "2. RENTER INFORMATION")?;
        writeln!(f, "  Name: {}", self.renter_name)?;
        writeln!(f, "  Email: {}", self.renter_email)?;
        writeln!(f, "  Phone: {}", self.renter_phone)?;
        writeln!(f, "  Address: {}", self.renter_address)?;
        writeln!(f, "  City: {}", self.renter_city)?;
        writeln!(f)?;

        writeln!(f, "3. RENTAL TERMS")?;
        writeln!(
            f,
            "  Rental Period: {} - {} ({} days)",
            self.start_date, self.end_date, self.days,
        )?;
        writeln!(f, "  Price per Day: {}", money(self.price_per_day))?;
        writeln!(f, "  Price per Week: {}", money(self.price_per_week))?;
        writeln!(f, "  Security Deposit: {}", money(self.caution_deposit))?;
        writeln!(f, "  Total Rental Amount: {}", self.total_price)?;
        writeln!(f)?;

        writeln!(f, "4. PRODUCT CONDITION")?;
        writeln!(
            f,
            "  Condition at Rental Start: {}",
            self.state_before.as_deref().unwrap_or(BLANK),
        )?;
        writeln!(
            f,
            "  Condition at Return: {}",
            self.state_after.as_deref().unwrap_or(BLANK),
        )?;
        writeln!(f)?;

        writeln!(f, "5. SIGNATURES")?;
        writeln!(f, "  Renter Signature: {BLANK}    Date: {BLANK}")?;
        write!(f, "  Owner Signature:  {BLANK}    Date: {BLANK}")
    }
}

#[cfg(test)]
mod spec {
    use std::collections::HashMap;

    use common::{Currency, DateTime, Money};
    use rust_decimal::Decimal;

    use crate::domain::{contract, product, user, Contract, Product, User};

    use super::{Document, Joined};

    fn usd(amount: i64) -> Money {
        Money {
            amount: Decimal::from(amount),
            currency: Currency::Usd,
        }
    }

    fn product() -> Product {
        product::Draft {
            object: "Ladder".into(),
            brand: "Hailo".into(),
            model: "L60".into(),
            description: "Aluminium ladder".into(),
            precautions: Some("Check the feet".into()),
            quantity: 1,
            price_per_day: usd(5),
            price_per_week: usd(25),
            caution_deposit: usd(50),
        }
        .validate(Currency::Usd)
        .unwrap()
        .into_product(product::Id::new(), DateTime::now().coerce())
    }

    fn user() -> User {
        user::Draft {
            first_name: "Ada".into(),
            last_name: "Byron".into(),
            email: "ada@example.org".into(),
            phone: "0612345678".into(),
            postal_address: "1 Analytical St".into(),
            city: "London".into(),
            birth_date: "1990-12-10".into(),
        }
        .validate(user::Id::new(), DateTime::now().coerce())
        .unwrap()
    }

    fn contract(product_id: product::Id, user_id: user::Id) -> Contract {
        Contract {
            id: contract::Id::new(),
            product_id,
            user_id,
            quantity: product::Quantity::ONE,
            start_date: DateTime::from_rfc3339("2024-06-01T00:00:00Z")
                .unwrap()
                .coerce(),
            end_date: DateTime::from_rfc3339("2024-06-04T00:00:00Z")
                .unwrap()
                .coerce(),
            total_price: usd(15),
            status: contract::Status::Active,
            state_before: None,
            state_after: None,
            created_at: DateTime::now().coerce(),
        }
    }

    #[test]
    fn joins_references_by_id() {
        let (p, u) = (product(), user());
        let products = HashMap::from([(p.id, p.clone())]);
        let users = HashMap::from([(u.id, u.clone())]);

        let joined = Joined::join(
            [
                contract(p.id, u.id),
                contract(product::Id::new(), u.id),
                contract(p.id, user::Id::new()),
            ],
            &products,
            &users,
        );

        assert_eq!(joined.len(), 3);
        assert!(joined[0].product.is_some() && joined[0].user.is_some());
        assert!(joined[1].product.is_none() && joined[1].user.is_some());
        assert!(joined[2].product.is_some() && joined[2].user.is_none());
    }

    #[test]
    fn flattens_full_document() {
        let (p, u) = (product(), user());
        let c = contract(p.id, u.id);
        let joined = Joined {
            contract: c.clone(),
            product: Some(p),
            user: Some(u),
        };

        let doc = Document::new(
            &joined,
            DateTime::from_rfc3339("2024-05-30T10:00:00Z").unwrap(),
        );

        assert_eq!(doc.issued_on, "2024-05-30");
        assert_eq!(doc.renter_name, "Ada Byron");
        assert_eq!(doc.precautions, "Check the feet");
        assert_eq!(doc.days, 3);
        assert_eq!(doc.caution_deposit, Some(usd(50)));

        let text = doc.to_string();
        assert!(text.contains(&format!("Contract #: {}", c.id)));
        assert!(text.contains("Rental Period: 2024-06-01 - 2024-06-04 (3 days)"));
        assert!(text.contains("Total Rental Amount: 15USD"));
        assert!(text.contains("Condition at Return: ____"));
    }

    #[test]
    fn fills_placeholders_for_missing_references() {
        let joined = Joined {
            contract: contract(product::Id::new(), user::Id::new()),
            product: None,
            user: None,
        };

        let doc = Document::new(&joined, DateTime::now());

        assert_eq!(doc.object, "Unknown");
        assert_eq!(doc.renter_name, "Unknown");
        assert!(doc.price_per_day.is_none());
        assert!(doc.to_string().contains("Price per Day: Unknown"));
    }
}
