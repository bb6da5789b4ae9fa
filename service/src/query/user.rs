//! [`Query`] collection looking up a single [`User`].

use common::operations::By;

use crate::domain::{user, User};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`User`] by its [`user::Id`].
pub type ById = DatabaseQuery<By<Option<User>, user::Id>>;

/// Queries the [`User`] registered with the provided [`user::Email`], if any.
pub type ByEmail<'e> = DatabaseQuery<By<Option<User>, &'e user::Email>>;
