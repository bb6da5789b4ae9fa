//! Calendar [`Event`]s derivation.

use derive_more::{Display, Error};

use crate::{
    domain::{contract, product},
    read::contract::Joined,
};

/// Label of the [`ProductFilter`] matching every [`Product`].
///
/// [`Product`]: crate::domain::Product
pub const ALL: &str = "all";

/// Filter selecting [`Contract`]s of the calendar by their [`Product`].
///
/// [`Contract`]: crate::domain::Contract
/// [`Product`]: crate::domain::Product
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ProductFilter {
    /// Every [`Product`] matches.
    ///
    /// [`Product`]: crate::domain::Product
    #[default]
    All,

    /// Only the [`Product`] with the provided ID matches.
    ///
    /// [`Product`]: crate::domain::Product
    Only(product::Id),
}

impl ProductFilter {
    /// Indicates whether the provided [`product::Id`] passes this
    /// [`ProductFilter`].
    #[must_use]
    pub fn matches(&self, id: product::Id) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => *only == id,
        }
    }
}

impl std::str::FromStr for ProductFilter {
    type Err = InvalidProductFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL {
            return Ok(Self::All);
        }
        s.parse()
            .map(Self::Only)
            .map_err(|_| InvalidProductFilter(s.to_owned()))
    }
}

/// Error of parsing a [`ProductFilter`].
#[derive(Clone, Debug, Display, Error)]
#[display("`{_0}` is neither `all` nor a product ID")]
pub struct InvalidProductFilter(#[error(not(source))] String);

/// Calendar event displaying a single [`Contract`].
///
/// [`Contract`]: crate::domain::Contract
#[derive(Clone, Debug)]
pub struct Event<'c> {
    /// [`Joined`] [`Contract`] this [`Event`] is derived from.
    ///
    /// [`Contract`]: crate::domain::Contract
    pub joined: &'c Joined,

    /// Title of this [`Event`].
    pub title: String,
}

impl Event<'_> {
    /// Returns the start of this [`Event`].
    #[must_use]
    pub fn start(&self) -> contract::StartDate {
        self.joined.contract.start_date
    }

    /// Returns the (exclusive) end of this [`Event`].
    #[must_use]
    pub fn end(&self) -> contract::EndDate {
        self.joined.contract.end_date
    }
}

/// Derives [`Event`]s of the provided [`Joined`] [`Contract`]s passing the
/// given [`ProductFilter`], in the same order.
///
/// The returned iterator may be cloned to be walked again.
///
/// [`Contract`]: crate::domain::Contract
pub fn events<'c>(
    contracts: &'c [Joined],
    filter: &ProductFilter,
) -> impl Iterator<Item = Event<'c>> + Clone + 'c {
    let filter = *filter;
    contracts
        .iter()
        .filter(move |j| filter.matches(j.contract.product_id))
        .map(|joined| Event {
            joined,
            title: title(joined),
        })
}

/// Builds the title of an [`Event`] from its product object and renter first
/// name, falling back to placeholders for missing references.
fn title(joined: &Joined) -> String {
    match (&joined.product, &joined.user) {
        (Some(product), Some(user)) => {
            format!("{} ({})", product.object, user.first_name)
        }
        (Some(product), None) => format!("{} (Unknown)", product.object),
        (None, _) => format!("Contract #{}", joined.contract.id),
    }
}

#[cfg(test)]
mod spec {
    use common::{Currency, DateTime, Money};
    use rust_decimal::Decimal;

    use crate::{
        domain::{contract, product, user, Contract, Product, User},
        read::contract::Joined,
    };

    use super::{events, ProductFilter};

    fn usd(amount: i64) -> Money {
        Money {
            amount: Decimal::from(amount),
            currency: Currency::Usd,
        }
    }

    fn product(object: &str) -> Product {
        product::Draft {
            object: object.into(),
            brand: "Acme".into(),
            model: "X1".into(),
            description: "Handy".into(),
            precautions: None,
            quantity: 1,
            price_per_day: usd(10),
            price_per_week: usd(50),
            caution_deposit: usd(0),
        }
        .validate(Currency::Usd)
        .unwrap()
        .into_product(product::Id::new(), DateTime::now().coerce())
    }

    fn user(first_name: &str) -> User {
        user::Draft {
            first_name: first_name.into(),
            last_name: "Doe".into(),
            email: "doe@example.com".into(),
            phone: "0612345678".into(),
            postal_address: "5 Main St".into(),
            city: "Paris".into(),
            birth_date: "1980-01-01".into(),
        }
        .validate(user::Id::new(), DateTime::now().coerce())
        .unwrap()
    }

    fn joined(product: Option<&Product>, user: Option<&User>) -> Joined {
        Joined {
            contract: Contract {
                id: contract::Id::new(),
                product_id: product.map_or_else(product::Id::new, |p| p.id),
                user_id: user.map_or_else(user::Id::new, |u| u.id),
                quantity: product::Quantity::ONE,
                start_date: DateTime::from_rfc3339("2024-01-02T00:00:00Z")
                    .unwrap()
                    .coerce(),
                end_date: DateTime::from_rfc3339("2024-01-05T00:00:00Z")
                    .unwrap()
                    .coerce(),
                total_price: usd(30),
                status: contract::Status::Pending,
                state_before: None,
                state_after: None,
                created_at: DateTime::now().coerce(),
            },
            product: product.cloned(),
            user: user.cloned(),
        }
    }

    #[test]
    fn parses_filter() {
        let id = product::Id::new();

        assert_eq!("all".parse::<ProductFilter>().unwrap(), ProductFilter::All);
        assert_eq!(
            id.to_string().parse::<ProductFilter>().unwrap(),
            ProductFilter::Only(id),
        );
        assert!("All".parse::<ProductFilter>().is_err());
        assert!("drill".parse::<ProductFilter>().is_err());
    }

    #[test]
    fn keeps_every_contract_for_all() {
        let (drill, saw) = (product("Drill"), product("Saw"));
        let contracts = [
            joined(Some(&drill), None),
            joined(Some(&saw), None),
            joined(Some(&drill), None),
        ];

        let evs = events(&contracts, &ProductFilter::All).collect::<Vec<_>>();

        assert_eq!(evs.len(), 3);
        for (ev, c) in evs.iter().zip(&contracts) {
            assert_eq!(ev.joined.contract.id, c.contract.id);
            assert_eq!(ev.start(), c.contract.start_date);
            assert_eq!(ev.end(), c.contract.end_date);
        }
    }

    #[test]
    fn keeps_only_filtered_product() {
        let (drill, saw) = (product("Drill"), product("Saw"));
        let contracts = [
            joined(Some(&drill), None),
            joined(Some(&saw), None),
            joined(Some(&drill), None),
        ];

        let evs = events(&contracts, &ProductFilter::Only(drill.id));

        assert_eq!(evs.clone().count(), 2);
        assert!(evs.clone().all(|e| e.joined.contract.product_id == drill.id));
        assert_eq!(evs.count(), 2);
    }

    #[test]
    fn titles_with_placeholders() {
        let (drill, ann) = (product("Drill"), user("Ann"));
        let contracts = [
            joined(Some(&drill), Some(&ann)),
            joined(Some(&drill), None),
            joined(None, Some(&ann)),
        ];

        let titles = events(&contracts, &ProductFilter::All)
            .map(|e| e.title)
            .collect::<Vec<_>>();

        assert_eq!(titles[0], "Drill (Ann)");
        assert_eq!(titles[1], "Drill (Unknown)");
        assert_eq!(
            titles[2],
            format!("Contract #{}", contracts[2].contract.id),
        );
    }
}
