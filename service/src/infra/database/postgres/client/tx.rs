//! [`Tx`] client definitions.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock, RwLockReadGuard};
use tokio_postgres::{types::ToSql, Row, ToStatement};
use tracerr::Traced;

use crate::infra::database::{
    self,
    postgres::{self, connection, Connection},
};

use super::NonTx;

/// Client running every statement inside a single transaction.
///
/// The transaction is opened on the first statement, reusing the pooled
/// connection of the [`NonTx`] client it was created from when there is
/// one. Dropping every clone without [`Tx::commit()`] rolls it back.
#[derive(Clone, Debug)]
pub struct Tx {
    /// [`connection::Pool`] to acquire a connection from when the originating
    /// [`NonTx`] client has none.
    pool: connection::Pool,

    /// [`NonTx`] client this one is created from, until the transaction is
    /// opened.
    origin: Arc<Mutex<Option<NonTx>>>,

    /// Opened transaction, if any yet.
    opened: Arc<RwLock<Option<connection::Tx>>>,
}

impl Tx {
    /// Creates a new [`Tx`] client on top of the provided [`NonTx`] one.
    #[must_use]
    pub fn from_non_tx(client: NonTx) -> Self {
        Self {
            pool: client.pool.clone(),
            origin: Arc::new(Mutex::new(Some(client))),
            opened: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns the transaction of this client, opening it first if needed.
    async fn connection(
        &self,
    ) -> Result<RwLockReadGuard<'_, connection::Tx>, Traced<database::Error>>
    {
        let read = self.opened.read().await;
        let guard = if read.is_some() {
            read
        } else {
            drop(read);

            let mut write = self.opened.write().await;
            // Another task may have opened it while the lock was released.
            if write.is_none() {
                let origin = self.origin.lock().await.take();
                let reused = match origin {
                    Some(client) => client.detach().await,
                    None => None,
                };
                let conn = match reused {
                    Some(conn) => conn,
                    None => self
                        .pool
                        .get()
                        .await
                        .map_err(tracerr::from_and_wrap!(=> postgres::Error))
                        .map_err(tracerr::map_from)?,
                };
                *write = Some(
                    connection::Tx::from_non_tx(conn)
                        .await
                        .map_err(tracerr::wrap!())?,
                );
            }
            write.downgrade()
        };

        Ok(RwLockReadGuard::map(guard, |tx| {
            tx.as_ref().expect("opened above and never taken while read")
        }))
    }

    /// Commits the transaction of this client.
    ///
    /// Does nothing if no statement has been run yet.
    ///
    /// # Errors
    ///
    /// If Postgres fails to `COMMIT` the transaction.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        let Some(tx) = self.opened.write().await.take() else {
            return Ok(());
        };
        tx.commit().await.map_err(tracerr::wrap!())
    }
}

super::forward_connection!(Tx);
