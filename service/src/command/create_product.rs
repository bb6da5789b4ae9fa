//! [`Command`] for creating a new [`Product`].

use common::{operations::Insert, DateTime};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{product, Product},
    infra::{database, Database},
    validation::Violations,
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Product`].
#[derive(Clone, Debug)]
pub struct CreateProduct {
    /// [`product::Draft`] of a new [`Product`].
    pub draft: product::Draft,
}

impl<Db> Command<CreateProduct> for Service<Db>
where
    Db: Database<Insert<Product>, Err = Traced<database::Error>>,
{
    type Ok = Product;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateProduct) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateProduct { draft } = cmd;

        let product = draft
            .validate(self.config().currency)
            .map_err(E::Invalid)
            .map_err(tracerr::wrap!())?
            .into_product(product::Id::new(), DateTime::now().coerce());

        self.database()
            .execute(Insert(product.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(product)
    }
}

/// Error of [`CreateProduct`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Provided [`product::Draft`] is invalid.
    #[display("Invalid `Product`: {_0}")]
    Invalid(#[error(not(source))] Violations<product::Field>),
}
