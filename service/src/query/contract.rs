//! [`Query`] collection related to a single [`Contract`].

use common::{
    operations::{By, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contract, product, user, Contract, Product, User},
    infra::{database, Database},
    read::contract::{self as read, Joined},
    Query, Service,
};

use super::DatabaseQuery;

/// Queries a [`Contract`] by its [`contract::Id`].
pub type ById = DatabaseQuery<By<Option<Contract>, contract::Id>>;

/// [`Query`] of a printable [`read::Document`] of a [`Contract`].
#[derive(Clone, Copy, Debug)]
pub struct Document {
    /// ID of the [`Contract`] to issue the [`read::Document`] for.
    pub contract_id: contract::Id,
}

impl<Db> Query<Document> for Service<Db>
where
    Db: Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Product>, product::Id>>,
            Ok = Option<Product>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<User>, user::Id>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = read::Document;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        Document { contract_id }: Document,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let contract = self
            .database()
            .execute(Select(By::<Option<Contract>, _>::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::NotExists(contract_id))
            .map_err(tracerr::wrap!())?;

        let product = self
            .database()
            .execute(Select(By::<Option<Product>, _>::new(
                contract.product_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        let user = self
            .database()
            .execute(Select(By::<Option<User>, _>::new(contract.user_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let joined = Joined {
            contract,
            product,
            user,
        };
        Ok(read::Document::new(&joined, DateTime::now()))
    }
}

/// Error of [`Document`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Contract`] with the provided ID does not exist.
    #[display("`Contract(id: {_0})` does not exist")]
    NotExists(#[error(not(source))] contract::Id),
}
