//! [`Query`] collection related to the multiple [`Contract`]s.

use common::operations::By;

#[cfg(doc)]
use crate::{domain::Product, Query};
use crate::{
    domain::{product, Contract},
    engine::Window,
};

use super::DatabaseQuery;

/// Queries every [`Contract`], ordered by start.
pub type List = DatabaseQuery<By<Vec<Contract>, ()>>;

/// Queries [`Contract`]s whose period overlaps the provided [`Window`].
pub type InRange = DatabaseQuery<By<Vec<Contract>, Window>>;

/// Queries [`Contract`]s of the [`Product`] with the provided
/// [`product::Id`].
pub type OfProduct = DatabaseQuery<By<Vec<Contract>, product::Id>>;
