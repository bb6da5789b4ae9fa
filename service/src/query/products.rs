//! [`Query`] collection related to the multiple [`Product`]s.

use std::collections::HashMap;

use common::operations::By;

use crate::domain::{product, Product};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries multiple [`Product`]s by their [`product::Id`]s.
pub type ByIds =
    DatabaseQuery<By<HashMap<product::Id, Product>, Vec<product::Id>>>;

/// Queries every [`Product`] in the catalog, oldest first.
pub type List = DatabaseQuery<By<Vec<Product>, ()>>;
