//! [`Command`] for updating an existing [`Product`].

use common::operations::{
    By, Commit, Lock, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{product, Product},
    infra::{database, Database},
    validation::Violations,
    Service,
};

use super::Command;

/// [`Command`] for updating an existing [`Product`].
///
/// Every descriptive field and price is replaced, while the ID and the
/// creation time are preserved.
#[derive(Clone, Debug)]
pub struct UpdateProduct {
    /// ID of the [`Product`] to be updated.
    pub id: product::Id,

    /// New [`product::Draft`] of the [`Product`].
    pub draft: product::Draft,
}

impl<Db> Command<UpdateProduct> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Product, product::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Product>, product::Id>>,
            Ok = Option<Product>,
            Err = Traced<database::Error>,
        > + Database<Update<Product>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Product;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateProduct) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateProduct { id, draft } = cmd;

        let details = draft
            .validate(self.config().currency)
            .map_err(E::Invalid)
            .map_err(tracerr::wrap!())?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent updates of the same `Product`.
        tx.execute(Lock(By::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let existing = tx
            .execute(Select(By::<Option<Product>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::NotExists(id))
            .map_err(tracerr::wrap!())?;

        let product = details.into_product(id, existing.created_at);

        tx.execute(Update(product.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(product)
    }
}

/// Error of [`UpdateProduct`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Provided [`product::Draft`] is invalid.
    #[display("Invalid `Product`: {_0}")]
    Invalid(#[error(not(source))] Violations<product::Field>),

    /// [`Product`] with the provided ID does not exist.
    #[display("`Product(id: {_0})` does not exist")]
    NotExists(#[error(not(source))] product::Id),
}
