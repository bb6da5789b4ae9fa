//! Storage of products, users and rental contracts.

#[cfg(feature = "postgres")]
pub mod postgres;

use derive_more::{Display, Error as StdError, From};

#[cfg(feature = "postgres")]
pub use self::postgres::Postgres;

/// Storage operation.
pub use common::Handler as Database;

/// Names of the unique constraints a [`Database`] enforces.
pub mod constraint {
    /// Every [`User`] has its own [`user::Email`].
    ///
    /// [`User`]: crate::domain::User
    /// [`user::Email`]: crate::domain::user::Email
    pub const USER_EMAIL: &str = "users_email_key";
}

/// [`Database`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(feature = "postgres")]
    /// [`Postgres`] error.
    Postgres(postgres::Error),
}

impl Error {
    /// Indicates whether this [`Error`] is caused by a write violating the
    /// provided [`constraint`].
    #[must_use]
    pub fn violates(&self, constraint: &str) -> bool {
        match *self {
            #[cfg(feature = "postgres")]
            Self::Postgres(ref e) => e.is_unique_violation(Some(constraint)),
        }
    }
}
