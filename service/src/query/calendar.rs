//! [`Calendar`] definition.

use std::collections::HashMap;

use common::{
    operations::{By, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use itertools::Itertools as _;
use tracerr::Traced;

#[cfg(doc)]
use crate::engine::window::buffered;
use crate::{
    domain::{product, user, Contract, Product, User},
    engine::{self, calendar, statistics, Event, ProductFilter, Statistics},
    infra::{database, Database},
    read::contract::Joined,
    Query, Service,
};

/// [`Query`] of the calendar of [`Contract`]s through a date window.
///
/// The window is [`buffered`] before loading [`Contract`]s, so the ones
/// straddling its bounds are included too.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Calendar {
    /// Start of the visible window.
    pub start: DateTime,

    /// Exclusive end of the visible window.
    pub end: DateTime,

    /// [`ProductFilter`] of the [`Event`]s.
    pub filter: ProductFilter,
}

/// Output of the [`Calendar`] [`Query`].
#[derive(Clone, Debug)]
pub struct Output {
    /// Loaded [`Contract`]s with their references attached.
    pub contracts: Vec<Joined>,

    /// [`ProductFilter`] the [`Event`]s are derived with.
    pub filter: ProductFilter,

    /// [`Statistics`] of every loaded [`Contract`].
    pub statistics: Statistics,
}

impl Output {
    /// Derives the calendar [`Event`]s of this [`Output`].
    pub fn events(&self) -> impl Iterator<Item = Event<'_>> + Clone + '_ {
        calendar::events(&self.contracts, &self.filter)
    }
}

impl<Db> Query<Calendar> for Service<Db>
where
    Db: Database<
            Select<By<Vec<Contract>, engine::Window>>,
            Ok = Vec<Contract>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HashMap<product::Id, Product>, Vec<product::Id>>>,
            Ok = HashMap<product::Id, Product>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<HashMap<user::Id, User>, Vec<user::Id>>>,
            Ok = HashMap<user::Id, User>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        Calendar { start, end, filter }: Calendar,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let window = engine::Window::new(start, end)
            .ok_or(E::InvalidWindow)
            .map_err(tracerr::wrap!())?;
        let window = engine::window::buffered(
            window,
            self.config().calendar_buffer_months,
        );

        let contracts = self
            .database()
            .execute(Select(By::<Vec<Contract>, _>::new(window)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let product_ids = contracts
            .iter()
            .map(|c| c.product_id)
            .unique()
            .collect::<Vec<_>>();
        let products = self
            .database()
            .execute(Select(By::<HashMap<product::Id, Product>, _>::new(
                product_ids,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let user_ids = contracts
            .iter()
            .map(|c| c.user_id)
            .unique()
            .collect::<Vec<_>>();
        let users = self
            .database()
            .execute(Select(By::<HashMap<user::Id, User>, _>::new(user_ids)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        let statistics = statistics::compute(
            &contracts,
            &products.values().cloned().collect::<Vec<_>>(),
            self.config().currency,
        );

        Ok(Output {
            contracts: Joined::join(contracts, &products, &users),
            filter,
            statistics,
        })
    }
}

/// Error of [`Calendar`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// End of the window precedes its start.
    #[display("Window end precedes its start")]
    InvalidWindow,
}
