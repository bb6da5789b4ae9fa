//! GraphQL [`Query`]s definitions.

use common::{DateTime, Money};
use juniper::graphql_object;
use service::{domain::user, engine, query, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns every `Product` of the catalog, oldest first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "products",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn products(ctx: &Context) -> Result<Vec<api::Product>, Error> {
        ctx.service()
            .execute(query::products::List::by(()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|ps| ps.into_iter().map(Into::into).collect())
    }

    /// Returns the `Product` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PRODUCT_NOT_EXISTS` - the `Product` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "product",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn product(
        id: api::product::Id,
        ctx: &Context,
    ) -> Result<api::Product, Error> {
        ctx.service()
            .execute(query::product::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| ProductError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns every `User`, ordered by name.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "users",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn users(ctx: &Context) -> Result<Vec<api::User>, Error> {
        ctx.service()
            .execute(query::users::List::by(()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|us| us.into_iter().map(Into::into).collect())
    }

    /// Returns the `User` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `USER_NOT_EXISTS` - the `User` with the specified ID does not exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "user",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn user(
        id: api::user::Id,
        ctx: &Context,
    ) -> Result<api::User, Error> {
        ctx.service()
            .execute(query::user::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| UserError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `User` registered with the specified email, if any.
    ///
    /// Malformed emails match no `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            email = %email,
            gql.name = "userByEmail",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn user_by_email(
        email: String,
        ctx: &Context,
    ) -> Result<Option<api::User>, Error> {
        let Some(email) = user::Email::new(&email) else {
            return Ok(None);
        };
        ctx.service()
            .execute(query::user::ByEmail::by(&email))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|u| u.map(Into::into))
    }

    /// Returns every `Contract`, ordered by start.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "contracts",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn contracts(ctx: &Context) -> Result<Vec<api::Contract>, Error> {
        ctx.service()
            .execute(query::contracts::List::by(()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|cs| cs.into_iter().map(Into::into).collect())
    }

    /// Returns the `Contract` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CONTRACT_NOT_EXISTS` - the `Contract` with the specified ID does not
    ///                           exist.
    #[tracing::instrument(
        skip_all,
        fields(
            id = %id,
            gql.name = "contract",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn contract(
        id: api::contract::Id,
        ctx: &Context,
    ) -> Result<api::Contract, Error> {
        ctx.service()
            .execute(query::contract::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| ContractError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns the `Contract`s whose period overlaps the specified one.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_PERIOD` - `end` precedes `start`.
    #[tracing::instrument(
        skip_all,
        fields(
            end = %end.to_rfc3339(),
            gql.name = "contractsInRange",
            otel.name = Self::SPAN_NAME,
            start = %start.to_rfc3339(),
        ),
    )]
    pub async fn contracts_in_range(
        start: DateTime,
        end: DateTime,
        ctx: &Context,
    ) -> Result<Vec<api::Contract>, Error> {
        let window = engine::Window::new(start, end)
            .ok_or_else(|| api::PeriodError::Inverted.into())
            .map_err(ctx.error())?;

        ctx.service()
            .execute(query::contracts::InRange::by(window))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|cs| cs.into_iter().map(Into::into).collect())
    }

    /// Returns the calendar of `Contract`s through the specified window.
    ///
    /// `product` is either `all` (default) or a `ProductId` to derive
    /// `CalendarEvent`s of.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_PERIOD` - `end` precedes `start`;
    /// - `INVALID_PRODUCT_FILTER` - `product` is neither `all` nor a
    ///                              `ProductId`.
    #[tracing::instrument(
        skip_all,
        fields(
            end = %end.to_rfc3339(),
            gql.name = "calendar",
            otel.name = Self::SPAN_NAME,
            product = ?product,
            start = %start.to_rfc3339(),
        ),
    )]
    pub async fn calendar(
        start: DateTime,
        end: DateTime,
        product: Option<String>,
        ctx: &Context,
    ) -> Result<api::Calendar, Error> {
        let filter = product
            .as_deref()
            .unwrap_or(engine::calendar::ALL)
            .parse::<engine::ProductFilter>()
            .map_err(|e| Error::from(CalendarError::Filter).with_details(&e))
            .map_err(ctx.error())?;

        ctx.service()
            .execute(query::Calendar { start, end, filter })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Quotes the price of renting the specified `Product` over the specified
    /// period.
    ///
    /// Inverted or empty periods are quoted at zero.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PRODUCT_NOT_EXISTS` - the `Product` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            end_date = %end_date.to_rfc3339(),
            gql.name = "quote",
            otel.name = Self::SPAN_NAME,
            product_id = %product_id,
            start_date = %start_date.to_rfc3339(),
        ),
    )]
    pub async fn quote(
        product_id: api::product::Id,
        start_date: DateTime,
        end_date: DateTime,
        ctx: &Context,
    ) -> Result<Money, Error> {
        ctx.service()
            .execute(query::Quote {
                product_id: product_id.into(),
                start: start_date,
                end: end_date,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Issues a printable document of the `Contract` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CONTRACT_NOT_EXISTS` - the `Contract` with the specified ID does not
    ///                           exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "contractDocument",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn contract_document(
        id: api::contract::Id,
        ctx: &Context,
    ) -> Result<api::contract::Document, Error> {
        ctx.service()
            .execute(query::contract::Document {
                contract_id: id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

impl AsError for query::calendar::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::InvalidWindow => Some(api::PeriodError::Inverted.into()),
        }
    }
}

impl AsError for query::quote::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::ProductNotExists(_) => Some(ProductError::NotExists.into()),
        }
    }
}

impl AsError for query::contract::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::NotExists(_) => Some(ContractError::NotExists.into()),
        }
    }
}

define_error! {
    enum CalendarError {
        #[code = "INVALID_PRODUCT_FILTER"]
        #[status = BAD_REQUEST]
        #[message = "Invalid `Product` filter"]
        Filter,
    }
}

define_error! {
    enum ContractError {
        #[code = "CONTRACT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Contract` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum ProductError {
        #[code = "PRODUCT_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Product` with the specified ID does not exist"]
        NotExists,
    }
}

define_error! {
    enum UserError {
        #[code = "USER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`User` with the specified ID does not exist"]
        NotExists,
    }
}
