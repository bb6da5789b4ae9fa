//! [`Quote`] definition.

use common::{
    operations::{By, Select},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Contract;
use crate::{
    domain::{product, Product},
    engine::pricing,
    infra::{database, Database},
    Query, Service,
};

/// [`Query`] of the price a prospective [`Contract`] would have.
///
/// Inverted or empty periods are quoted at zero.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Quote {
    /// ID of the [`Product`] to be rented.
    pub product_id: product::Id,

    /// Start of the rental period.
    pub start: DateTime,

    /// Exclusive end of the rental period.
    pub end: DateTime,
}

impl<Db> Query<Quote> for Service<Db>
where
    Db: Database<
        Select<By<Option<Product>, product::Id>>,
        Ok = Option<Product>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Money;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        Quote {
            product_id,
            start,
            end,
        }: Quote,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let product = self
            .database()
            .execute(Select(By::new(product_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProductNotExists(product_id))
            .map_err(tracerr::wrap!())?;

        Ok(pricing::total_price(&product.rates(), start, end))
    }
}

/// Error of [`Quote`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Product`] with the provided ID does not exist.
    #[display("`Product(id: {_0})` does not exist")]
    ProductNotExists(#[error(not(source))] product::Id),
}
