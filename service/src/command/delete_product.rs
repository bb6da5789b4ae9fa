//! [`Command`] for deleting a [`Product`].

use common::operations::{By, Delete};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{product, Product},
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for deleting a [`Product`].
///
/// [`Contract`]s of the deleted [`Product`] are kept untouched.
///
/// [`Contract`]: crate::domain::Contract
#[derive(Clone, Copy, Debug)]
pub struct DeleteProduct {
    /// ID of the [`Product`] to be deleted.
    pub id: product::Id,
}

impl<Db> Command<DeleteProduct> for Service<Db>
where
    Db: Database<
        Delete<By<Product, product::Id>>,
        Ok = bool,
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: DeleteProduct) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let DeleteProduct { id } = cmd;

        let deleted = self
            .database()
            .execute(Delete(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if !deleted {
            return Err(tracerr::new!(E::NotExists(id)));
        }

        log::debug!("`Product(id: {id})` deleted");
        Ok(())
    }
}

/// Error of [`DeleteProduct`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Product`] with the provided ID does not exist.
    #[display("`Product(id: {_0})` does not exist")]
    NotExists(#[error(not(source))] product::Id),
}
