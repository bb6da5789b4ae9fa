//! [`NonTx`] client definitions.

use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard};
use tokio_postgres::{types::ToSql, Row, ToStatement};
use tracerr::Traced;

use crate::infra::database::{
    self,
    postgres::{self, connection, Connection},
};

/// Client running every statement on its own, in autocommit mode.
///
/// A pooled [`connection::NonTx`] is acquired on the first statement and
/// reused by every clone of this client afterwards.
#[derive(Clone, Debug)]
pub struct NonTx {
    /// [`connection::Pool`] the connection is acquired from.
    pub(crate) pool: connection::Pool,

    /// Acquired pooled connection, if any yet.
    acquired: Arc<RwLock<Option<connection::NonTx>>>,
}

impl NonTx {
    /// Wraps the provided [`connection::Pool`] without acquiring anything
    /// from it yet.
    #[must_use]
    pub(crate) fn from_pool(pool: connection::Pool) -> Self {
        Self {
            pool,
            acquired: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the pooled connection of this client, acquiring it first if
    /// needed.
    async fn connection(
        &self,
    ) -> Result<RwLockReadGuard<'_, connection::NonTx>, Traced<database::Error>>
    {
        let read = self.acquired.read().await;
        let guard = if read.is_some() {
            read
        } else {
            drop(read);

            let mut write = self.acquired.write().await;
            // Another task may have acquired it while the lock was released.
            if write.is_none() {
                let conn = self
                    .pool
                    .get()
                    .await
                    .map_err(tracerr::from_and_wrap!(=> postgres::Error))
                    .map_err(tracerr::map_from)?;
                *write = Some(conn);
            }
            write.downgrade()
        };

        Ok(RwLockReadGuard::map(guard, |conn| {
            conn.as_ref().expect("acquired above and never taken while read")
        }))
    }

    /// Detaches the acquired pooled connection from this client, so it may
    /// be turned into a transaction.
    ///
    /// The next statement run by this client acquires a fresh connection.
    #[must_use]
    pub(crate) async fn detach(&self) -> Option<connection::NonTx> {
        self.acquired.write().await.take()
    }
}

super::forward_connection!(NonTx);
