//! Rental [`Statistics`] aggregation.

use std::collections::HashMap;

use common::{Currency, Money};
use rust_decimal::Decimal;

use crate::{
    domain::{contract, product, Contract, Product},
    engine::pricing,
};

/// Display name reported when no top [`Product`] can be determined.
pub const NO_TOP_PRODUCT: &str = "None";

/// Summary of a set of [`Contract`]s.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Statistics {
    /// Number of [`contract::Status::Active`] [`Contract`]s.
    pub active_contracts: usize,

    /// Number of [`contract::Status::Pending`] [`Contract`]s.
    pub pending_contracts: usize,

    /// Number of [`contract::Status::Completed`] [`Contract`]s.
    pub completed_contracts: usize,

    /// Number of [`contract::Status::Cancelled`] [`Contract`]s.
    pub cancelled_contracts: usize,

    /// Sum of every [`Contract`] price, whatever its status.
    pub total_revenue: Money,

    /// Sum of every non-[`contract::Status::Cancelled`] [`Contract`] price.
    pub realized_revenue: Money,

    /// Mean number of rented days per [`Contract`].
    pub average_duration: Decimal,

    /// [`Product`] rented by the most [`Contract`]s.
    pub top_product: Option<TopProduct>,
}

impl Statistics {
    /// Returns the display name of the [`Statistics::top_product`], or
    /// [`NO_TOP_PRODUCT`] if there is none.
    #[must_use]
    pub fn top_product_name(&self) -> &str {
        self.top_product.as_ref().map_or(NO_TOP_PRODUCT, |p| &p.name)
    }
}

/// [`Product`] rented by the most [`Contract`]s.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TopProduct {
    /// ID of the [`Product`].
    pub id: product::Id,

    /// Display name of the [`Product`].
    pub name: String,

    /// Number of [`Contract`]s of the [`Product`].
    pub contracts: usize,
}

/// Aggregates [`Statistics`] of the provided [`Contract`]s, resolving the top
/// one among the given [`Product`]s.
///
/// Revenue is summed in the provided [`Currency`] only, ignoring prices in
/// any other one. [`contract::Status::Other`] labels aren't counted by any
/// status tally.
#[must_use]
pub fn compute(
    contracts: &[Contract],
    products: &[Product],
    currency: Currency,
) -> Statistics {
    let mut stats = Statistics {
        active_contracts: 0,
        pending_contracts: 0,
        completed_contracts: 0,
        cancelled_contracts: 0,
        total_revenue: Money::zero(currency),
        realized_revenue: Money::zero(currency),
        average_duration: Decimal::ZERO,
        top_product: None,
    };

    let mut total_days = Decimal::ZERO;
    for c in contracts {
        match &c.status {
            contract::Status::Active => stats.active_contracts += 1,
            contract::Status::Pending => stats.pending_contracts += 1,
            contract::Status::Completed => stats.completed_contracts += 1,
            contract::Status::Cancelled => stats.cancelled_contracts += 1,
            contract::Status::Other(_) => {}
        }

        if c.total_price.currency == currency {
            let revenue = &mut stats.total_revenue.amount;
            *revenue = revenue.saturating_add(c.total_price.amount);
            if c.status != contract::Status::Cancelled {
                let realized = &mut stats.realized_revenue.amount;
                *realized = realized.saturating_add(c.total_price.amount);
            }
        }

        total_days = total_days.saturating_add(Decimal::from(
            pricing::rental_days(c.start_date.coerce(), c.end_date.coerce()),
        ));
    }
    if !contracts.is_empty() {
        stats.average_duration = total_days / Decimal::from(contracts.len());
    }

    stats.top_product = most_rented(contracts).and_then(|(id, count)| {
        products.iter().find(|p| p.id == id).map(|p| TopProduct {
            id,
            name: p.display_name(),
            contracts: count,
        })
    });

    stats
}

/// Finds the [`product::Id`] referred by the most [`Contract`]s, along with
/// the number of them.
///
/// On a tie, the [`product::Id`] encountered first wins.
fn most_rented(contracts: &[Contract]) -> Option<(product::Id, usize)> {
    let mut order = Vec::new();
    let mut counts = HashMap::<product::Id, usize>::new();
    for c in contracts {
        let count = counts.entry(c.product_id).or_insert_with(|| {
            order.push(c.product_id);
            0
        });
        *count += 1;
    }

    let mut top: Option<(product::Id, usize)> = None;
    for id in order {
        let count = counts[&id];
        if top.map_or(true, |(_, max)| count > max) {
            top = Some((id, count));
        }
    }
    top
}

#[cfg(test)]
mod spec {
    use common::{Currency, DateTime, Money};
    use rust_decimal::Decimal;

    use crate::domain::{contract, product, user, Contract, Product};

    use super::{compute, NO_TOP_PRODUCT};

    fn money(amount: i64, currency: Currency) -> Money {
        Money {
            amount: Decimal::from(amount),
            currency,
        }
    }

    fn usd(amount: i64) -> Money {
        money(amount, Currency::Usd)
    }

    fn product(object: &str, brand: &str) -> Product {
        product::Draft {
            object: object.into(),
            brand: brand.into(),
            model: "M".into(),
            description: "D".into(),
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

    fn contract(
        product_id: product::Id,
        status: &str,
        price: Money,
        (start, end): (&str, &str),
    ) -> Contract {
        Contract {
            id: contract::Id::new(),
            product_id,
            user_id: user::Id::new(),
            quantity: product::Quantity::ONE,
            start_date: DateTime::from_rfc3339(start).unwrap().coerce(),
            end_date: DateTime::from_rfc3339(end).unwrap().coerce(),
            total_price: price,
            status: status.parse().unwrap(),
            state_before: None,
            state_after: None,
            created_at: DateTime::now().coerce(),
        }
    }

    const TWO_DAYS: (&str, &str) = ("2024-01-01T00:00:00Z", "2024-01-03T00:00:00Z");

    #[test]
    fn empty_set_yields_zeroes() {
        let stats = compute(&[], &[], Currency::Usd);

        assert_eq!(stats.active_contracts, 0);
        assert_eq!(stats.pending_contracts, 0);
        assert_eq!(stats.completed_contracts, 0);
        assert_eq!(stats.cancelled_contracts, 0);
        assert_eq!(stats.total_revenue, usd(0));
        assert_eq!(stats.average_duration, Decimal::ZERO);
        assert_eq!(stats.top_product, None);
        assert_eq!(stats.top_product_name(), NO_TOP_PRODUCT);
    }

    #[test]
    fn counts_statuses_exactly() {
        let p = product("Drill", "Bosch");
        let contracts = ["Active", "Active", "Pending", "Cancelled", "active"]
            .map(|s| contract(p.id, s, usd(10), TWO_DAYS));

        let stats = compute(&contracts, &[p], Currency::Usd);

        assert_eq!(stats.active_contracts, 2);
        assert_eq!(stats.pending_contracts, 1);
        assert_eq!(stats.cancelled_contracts, 1);
        assert_eq!(stats.completed_contracts, 0);
    }

    #[test]
    fn sums_revenue_including_cancelled() {
        let p = product("Drill", "Bosch");
        let contracts = [
            contract(p.id, "Completed", usd(100), TWO_DAYS),
            contract(p.id, "Cancelled", usd(40), TWO_DAYS),
            contract(p.id, "Pending", money(999, Currency::Eur), TWO_DAYS),
        ];

        let stats = compute(&contracts, &[p], Currency::Usd);

        assert_eq!(stats.total_revenue, usd(140));
        assert_eq!(stats.realized_revenue, usd(100));
    }

    #[test]
    fn saturates_huge_revenue() {
        let p = product("Drill", "Bosch");
        let huge = Money {
            amount: Decimal::MAX,
            currency: Currency::Usd,
        };
        let contracts = [
            contract(p.id, "Active", huge, TWO_DAYS),
            contract(p.id, "Completed", huge, TWO_DAYS),
        ];

        let stats = compute(&contracts, &[p], Currency::Usd);

        assert_eq!(stats.total_revenue, huge);
        assert_eq!(stats.realized_revenue, huge);
    }

    #[test]
    fn averages_rounded_up_durations() {
        let p = product("Drill", "Bosch");
        let contracts = [
            contract(p.id, "Active", usd(0), TWO_DAYS),
            // 1 day and 1 hour counts as 2 days.
            contract(
                p.id,
                "Active",
                usd(0),
                ("2024-01-01T00:00:00Z", "2024-01-02T01:00:00Z"),
            ),
            contract(
                p.id,
                "Active",
                usd(0),
                ("2024-01-01T00:00:00Z", "2024-01-06T00:00:00Z"),
            ),
        ];

        let stats = compute(&contracts, &[p], Currency::Usd);

        assert_eq!(stats.average_duration, Decimal::from(3));
    }

    #[test]
    fn picks_most_rented_product() {
        let (drill, saw) = (product("Drill", "Bosch"), product("Saw", "Makita"));
        let contracts = [
            contract(drill.id, "Active", usd(0), TWO_DAYS),
            contract(saw.id, "Active", usd(0), TWO_DAYS),
            contract(saw.id, "Active", usd(0), TWO_DAYS),
        ];

        let stats = compute(&contracts, &[drill, saw.clone()], Currency::Usd);

        let top = stats.top_product.clone().unwrap();
        assert_eq!(top.id, saw.id);
        assert_eq!(top.contracts, 2);
        assert_eq!(stats.top_product_name(), "Saw Makita");
    }

    #[test]
    fn breaks_ties_by_first_encountered() {
        let (drill, saw) = (product("Drill", "Bosch"), product("Saw", "Makita"));
        let contracts = [
            contract(saw.id, "Active", usd(0), TWO_DAYS),
            contract(drill.id, "Active", usd(0), TWO_DAYS),
            contract(drill.id, "Active", usd(0), TWO_DAYS),
            contract(saw.id, "Active", usd(0), TWO_DAYS),
        ];

        let stats = compute(&contracts, &[drill, saw], Currency::Usd);

        assert_eq!(stats.top_product_name(), "Saw Makita");
    }

    #[test]
    fn reports_none_for_unknown_top_product() {
        let contracts =
            [contract(product::Id::new(), "Active", usd(0), TWO_DAYS)];

        let stats = compute(&contracts, &[], Currency::Usd);

        assert_eq!(stats.top_product, None);
        assert_eq!(stats.top_product_name(), "None");
    }
}
