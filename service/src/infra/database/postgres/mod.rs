//! [PostgreSQL] backed [`Database`].
//!
//! [PostgreSQL]: https://www.postgresql.org

pub mod client;
pub mod connection;
mod impls;

use deadpool_postgres::Runtime;
use derive_more::{Deref, Display, Error as StdError, From};
use tokio_postgres::{error::SqlState, NoTls};
use tracerr::Traced;
use tracing as log;

use crate::infra::database;
#[cfg(doc)]
use crate::infra::Database;

pub use refinery::embed_migrations;

pub use self::{
    client::{NonTx, Tx},
    connection::Connection,
};

pub use deadpool_postgres::Config;

/// [`Database`] storing products, users and rental contracts in Postgres.
///
/// `T` is the client statements run on: [`NonTx`] by default, or [`Tx`] once
/// a transaction is requested.
#[derive(Clone, Copy, Debug, Deref)]
pub struct Postgres<T = NonTx>(T);

impl Postgres {
    /// Creates a new [`Postgres`] pooling connections as the provided
    /// [`Config`] describes.
    ///
    /// No connection is established until the first statement runs.
    ///
    /// # Errors
    ///
    /// If the [`Config`] doesn't describe a valid pool.
    pub fn new(conf: &Config) -> Result<Self, Traced<database::Error>> {
        let pool = conf
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        log::debug!(
            host = ?conf.host,
            dbname = ?conf.dbname,
            "Postgres pool created",
        );
        Ok(Self(NonTx::from_pool(pool)))
    }
}

/// Error of a [`Postgres`] operation.
#[derive(Debug, Display, StdError, From)]
pub enum Error {
    /// Statement failed.
    #[display("Postgres statement failed: {_0}")]
    Connection(connection::Error),

    /// [`connection::Pool`] couldn't be created.
    #[display("Failed to create Postgres pool: {_0}")]
    PoolCreationError(connection::PoolCreationError),

    /// No connection could be acquired from the [`connection::Pool`].
    #[display("Failed to acquire Postgres connection: {_0}")]
    PoolError(connection::PoolError),
}

impl Error {
    /// Indicates whether this [`Error`] is a violation of a unique
    /// constraint, optionally the one named as provided.
    #[must_use]
    pub fn is_unique_violation(&self, constraint: Option<&str>) -> bool {
        let Self::Connection(e) = self else {
            return false;
        };
        e.code() == Some(&SqlState::UNIQUE_VIOLATION)
            && constraint.map_or(true, |name| {
                e.as_db_error().and_then(|db| db.constraint()) == Some(name)
            })
    }
}
