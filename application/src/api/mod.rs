//! GraphQL API definitions.

pub mod calendar;
pub mod contract;
mod mutation;
pub mod product;
mod query;
pub mod scalar;
pub mod user;

use juniper::EmptySubscription;

use crate::{define_error, Context};

pub use self::{
    calendar::Calendar, contract::Contract, mutation::Mutation,
    product::Product, query::Query, user::User,
};

/// GraphQL schema.
pub type Schema =
    juniper::RootNode<'static, Query, Mutation, EmptySubscription<Context>>;

define_error! {
    enum PeriodError {
        #[code = "INVALID_PERIOD"]
        #[status = BAD_REQUEST]
        #[message = "End of the period precedes its start"]
        Inverted,
    }
}

/// Converts the provided count into a GraphQL `Int`, saturating on overflow.
pub(crate) fn int(count: impl TryInto<i32>) -> i32 {
    count.try_into().unwrap_or(i32::MAX)
}
