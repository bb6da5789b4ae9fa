//! [`Calendar`]-related definitions.

use common::{DateTime, Money};
use derive_more::{From, Into};
use juniper::{graphql_object, GraphQLObject};
use rust_decimal::prelude::ToPrimitive as _;
use service::{engine, query};

use crate::{api, Context};

/// Calendar of [`api::Contract`]s through a date window.
#[derive(Clone, Debug, From, Into)]
pub struct Calendar(query::calendar::Output);

/// A calendar of `Contract`s through a date window.
#[graphql_object(context = Context)]
impl Calendar {
    /// `Event`s of the `Contract`s passing the `Product` filter.
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.0
            .events()
            .map(|ev| Event {
                title: ev.title.clone(),
                start: ev.start().coerce(),
                end: ev.end().coerce(),
                contract: ev.joined.clone().into(),
            })
            .collect()
    }

    /// `Statistics` of every loaded `Contract`, whatever the `Product`
    /// filter.
    #[must_use]
    pub fn statistics(&self) -> Statistics {
        (&self.0.statistics).into()
    }
}

/// Calendar event displaying a single `Contract`.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "CalendarEvent", context = Context)]
pub struct Event {
    /// Title of this `CalendarEvent`.
    pub title: String,

    /// `DateTime` this `CalendarEvent` starts at.
    pub start: DateTime,

    /// `DateTime` this `CalendarEvent` ends at (exclusive).
    pub end: DateTime,

    /// `Contract` this `CalendarEvent` displays.
    pub contract: api::Contract,
}

/// Summary of a set of `Contract`s.
#[derive(Clone, Debug, GraphQLObject)]
#[graphql(name = "RentalStatistics", context = Context)]
pub struct Statistics {
    /// Number of `Active` `Contract`s.
    pub active_contracts: i32,

    /// Number of `Pending` `Contract`s.
    pub pending_contracts: i32,

    /// Number of `Completed` `Contract`s.
    pub completed_contracts: i32,

    /// Number of `Cancelled` `Contract`s.
    pub cancelled_contracts: i32,

    /// Sum of every `Contract` price, `Cancelled` ones included.
    pub total_revenue: Money,

    /// Sum of every non-`Cancelled` `Contract` price.
    pub realized_revenue: Money,

    /// Mean number of rented days per `Contract`.
    pub average_duration: f64,

    /// Display name of the most rented `Product`, or `None`.
    pub top_product: String,

    /// ID of the most rented `Product`, if any.
    pub top_product_id: Option<api::product::Id>,
}

impl From<&engine::Statistics> for Statistics {
    fn from(stats: &engine::Statistics) -> Self {
        Self {
            active_contracts: api::int(stats.active_contracts),
            pending_contracts: api::int(stats.pending_contracts),
            completed_contracts: api::int(stats.completed_contracts),
            cancelled_contracts: api::int(stats.cancelled_contracts),
            total_revenue: stats.total_revenue,
            realized_revenue: stats.realized_revenue,
            average_duration: stats.average_duration.to_f64().unwrap_or(0.0),
            top_product: stats.top_product_name().to_owned(),
            top_product_id: stats.top_product.as_ref().map(|p| p.id.into()),
        }
    }
}
