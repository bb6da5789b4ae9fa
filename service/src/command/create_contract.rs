//! [`Command`] for creating a new [`Contract`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contract, product, user, Contract, Product, User},
    engine::pricing,
    infra::{database, Database},
    validation::Violations,
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Contract`].
///
/// The [`Contract::total_price`] is computed from the [`Product`] rates at
/// the moment of creation, and never recomputed afterwards.
#[derive(Clone, Debug)]
pub struct CreateContract {
    /// ID of the rented [`Product`].
    pub product_id: product::Id,

    /// ID of the renting [`User`].
    pub user_id: user::Id,

    /// [`contract::Draft`] of the rental terms.
    pub draft: contract::Draft,

    /// Initial [`contract::Status`], [`contract::Status::Pending`] if none.
    pub status: Option<contract::Status>,
}

impl<Db> Command<CreateContract> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Product, product::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Product>, product::Id>>,
            Ok = Option<Product>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Insert<Contract>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Contract;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateContract,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateContract {
            product_id,
            user_id,
            draft,
            status,
        } = cmd;

        let terms = draft
            .validate()
            .map_err(E::Invalid)
            .map_err(tracerr::wrap!())?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid pricing by rates being concurrently updated.
        tx.execute(Lock(By::new(product_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let product = tx
            .execute(Select(By::<Option<Product>, _>::new(product_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::ProductNotExists(product_id))
            .map_err(tracerr::wrap!())?;

        let user = tx
            .execute(Select(By::<Option<User>, _>::new(user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::UserNotExists(user_id))
            .map_err(tracerr::wrap!())?;

        let total_price = pricing::total_price(
            &product.rates(),
            terms.start_date.coerce(),
            terms.end_date.coerce(),
        );

        let contract = Contract {
            id: contract::Id::new(),
            product_id: product.id,
            user_id: user.id,
            quantity: terms.quantity,
            start_date: terms.start_date,
            end_date: terms.end_date,
            total_price,
            status: status.unwrap_or_default(),
            state_before: terms.state_before,
            state_after: None,
            created_at: DateTime::now().coerce(),
        };

        tx.execute(Insert(contract.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(contract)
    }
}

/// Error of [`CreateContract`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Provided [`contract::Draft`] is invalid.
    #[display("Invalid `Contract`: {_0}")]
    Invalid(#[error(not(source))] Violations<contract::Field>),

    /// [`Product`] with the provided ID does not exist.
    #[display("`Product(id: {_0})` does not exist")]
    ProductNotExists(#[error(not(source))] product::Id),

    /// [`User`] with the provided ID does not exist.
    #[display("`User(id: {_0})` does not exist")]
    UserNotExists(#[error(not(source))] user::Id),
}
