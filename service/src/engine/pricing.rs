//! Rental price computation.

use common::{Currency, DateTime, Money};
use rust_decimal::Decimal;

/// Length of a rental day in nanoseconds.
const DAY_NANOS: i128 = 86_400 * 1_000_000_000;

/// Day and week rates a [`Product`] is rented by.
///
/// The week rate is an independent tier, not necessarily a discount of seven
/// day rates.
///
/// [`Product`]: crate::domain::Product
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RateSchedule {
    /// [`Currency`] of both rates.
    currency: Currency,

    /// Price of a single day.
    per_day: Decimal,

    /// Price of a full week.
    per_week: Decimal,
}

impl RateSchedule {
    /// Creates a new [`RateSchedule`] out of the provided rates.
    ///
    /// [`None`] is returned if the rates are in different [`Currency`]s.
    #[must_use]
    pub fn new(per_day: Money, per_week: Money) -> Option<Self> {
        (per_day.currency == per_week.currency).then_some(Self {
            currency: per_day.currency,
            per_day: per_day.amount,
            per_week: per_week.amount,
        })
    }

    /// Creates a new [`RateSchedule`] out of raw amounts in the provided
    /// [`Currency`].
    #[must_use]
    pub const fn from_amounts(
        currency: Currency,
        per_day: Decimal,
        per_week: Decimal,
    ) -> Self {
        Self {
            currency,
            per_day,
            per_week,
        }
    }

    /// Returns the [`Currency`] of this [`RateSchedule`].
    #[must_use]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns the price of a single day.
    #[must_use]
    pub const fn per_day(&self) -> Money {
        Money {
            amount: self.per_day,
            currency: self.currency,
        }
    }

    /// Returns the price of a full week.
    #[must_use]
    pub const fn per_week(&self) -> Money {
        Money {
            amount: self.per_week,
            currency: self.currency,
        }
    }
}

/// Counts the days between `start` and `end`, any started day counting as a
/// whole one.
///
/// The result is negative if `end` precedes `start`, rounded towards zero
/// then (a span of `-1.5` days gives `-1`).
#[must_use]
pub fn rental_days(start: DateTime, end: DateTime) -> i64 {
    let nanos = (end - start).whole_nanoseconds();
    let (whole, rest) = (nanos / DAY_NANOS, nanos % DAY_NANOS);
    let days = if rest > 0 { whole + 1 } else { whole };
    i64::try_from(days).unwrap_or(if days > 0 { i64::MAX } else { i64::MIN })
}

/// Computes the price of renting by the provided [`RateSchedule`] from
/// `start` until `end`.
///
/// Every full week is charged by the week rate and the remaining days by the
/// day rate. Empty and inverted periods cost nothing. Amounts beyond
/// [`Decimal`] range saturate at its bounds.
#[must_use]
pub fn total_price(
    rates: &RateSchedule,
    start: DateTime,
    end: DateTime,
) -> Money {
    let days = rental_days(start, end);
    if days <= 0 {
        return Money::zero(rates.currency);
    }

    let (weeks, days) = (days / 7, days % 7);
    Money {
        amount: rates
            .per_week
            .saturating_mul(Decimal::from(weeks))
            .saturating_add(rates.per_day.saturating_mul(Decimal::from(days))),
        currency: rates.currency,
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::{Currency, DateTime, Money};
    use rust_decimal::Decimal;

    use super::{rental_days, total_price, RateSchedule};

    fn usd(amount: i64) -> Money {
        Money {
            amount: Decimal::from(amount),
            currency: Currency::Usd,
        }
    }

    fn rates() -> RateSchedule {
        RateSchedule::new(usd(20), usd(100)).unwrap()
    }

    fn start() -> DateTime {
        DateTime::from_rfc3339("2024-03-01T09:00:00Z").unwrap()
    }

    fn after_days(days: u64) -> DateTime {
        start() + Duration::from_secs(days * 86_400)
    }

    #[test]
    fn rejects_mixed_currencies() {
        let eur = Money {
            amount: Decimal::from(100),
            currency: Currency::Eur,
        };

        assert!(RateSchedule::new(usd(20), eur).is_none());
    }

    #[test]
    fn saturates_instead_of_overflowing() {
        let huge = Money {
            amount: Decimal::MAX,
            currency: Currency::Usd,
        };
        let rates = RateSchedule::new(huge, huge).unwrap();

        assert_eq!(total_price(&rates, start(), after_days(2)), huge);
        assert_eq!(total_price(&rates, start(), after_days(9)), huge);
    }

    #[test]
    fn empty_or_inverted_period_is_free() {
        assert_eq!(total_price(&rates(), start(), start()), usd(0));
        assert_eq!(total_price(&rates(), after_days(3), start()), usd(0));
    }

    #[test]
    fn charges_day_rate_below_a_week() {
        for days in 1..=6 {
            assert_eq!(
                total_price(&rates(), start(), after_days(days)),
                usd(20 * i64::try_from(days).unwrap()),
            );
        }
    }

    #[test]
    fn charges_week_rate_for_full_weeks() {
        assert_eq!(total_price(&rates(), start(), after_days(7)), usd(100));
        assert_eq!(total_price(&rates(), start(), after_days(9)), usd(140));
        assert_eq!(total_price(&rates(), start(), after_days(10)), usd(160));
        assert_eq!(total_price(&rates(), start(), after_days(14)), usd(200));
    }

    #[test]
    fn applies_week_rate_even_if_pricier() {
        let rates = RateSchedule::new(usd(10), usd(100)).unwrap();

        assert_eq!(total_price(&rates, start(), after_days(7)), usd(100));
    }

    #[test]
    fn rounds_partial_days_up() {
        let end = after_days(1) + Duration::from_secs(60);

        assert_eq!(rental_days(start(), end), 2);
        assert_eq!(total_price(&rates(), start(), end), usd(40));
        assert_eq!(
            rental_days(start(), start() + Duration::from_secs(3_600)),
            1,
        );
    }

    #[test]
    fn keeps_sign_of_inverted_spans() {
        let end = after_days(1) + Duration::from_secs(43_200);

        assert_eq!(rental_days(end, start()), -1);
        assert_eq!(rental_days(after_days(3), start()), -3);
    }

    #[test]
    fn is_repeatable() {
        let end = after_days(12);

        assert_eq!(
            total_price(&rates(), start(), end),
            total_price(&rates(), start(), end),
        );
    }

    #[test]
    fn exposes_rates() {
        let rates = rates();

        assert_eq!(rates.per_day(), usd(20));
        assert_eq!(rates.per_week(), usd(100));
        assert_eq!(rates.currency(), Currency::Usd);
    }
}
