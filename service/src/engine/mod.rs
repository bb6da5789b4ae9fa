//! Pricing and aggregation engine.
//!
//! Pure computations over [`Product`] rate schedules and [`Contract`] periods:
//! none of them touches the [`Database`] or fails.
//!
//! [`Contract`]: crate::domain::Contract
//! [`Database`]: crate::infra::Database
//! [`Product`]: crate::domain::Product

pub mod calendar;
pub mod pricing;
pub mod statistics;
pub mod window;

pub use self::{
    calendar::{Event, ProductFilter},
    pricing::RateSchedule,
    statistics::Statistics,
    window::Window,
};
