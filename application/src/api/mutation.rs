//! GraphQL [`Mutation`]s definitions.

use juniper::graphql_object;
use service::{command, domain, Command as _};

use crate::{
    api::{
        self,
        query::{ContractError, ProductError, UserError},
    },
    define_error, AsError, Context, Error,
};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Creates a new `Product` in the catalog.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_PRODUCT` - some of the provided fields are invalid.
    #[tracing::instrument(
        skip_all,
        fields(
            brand = %input.brand,
            gql.name = "createProduct",
            object = %input.object,
            otel.name = Self::SPAN_NAME,
            price_per_day = %input.price_per_day,
            price_per_week = %input.price_per_week,
        ),
    )]
    pub async fn create_product(
        input: api::product::Input,
        ctx: &Context,
    ) -> Result<api::Product, Error> {
        ctx.service()
            .execute(command::CreateProduct {
                draft: input.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Replaces the description and prices of the `Product` with the
    /// specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PRODUCT_NOT_EXISTS` - the `Product` with the specified ID does not
    ///                          exist;
    /// - `INVALID_PRODUCT` - some of the provided fields are invalid.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateProduct",
            id = %id,
            otel.name = Self::SPAN_NAME,
            price_per_day = %input.price_per_day,
            price_per_week = %input.price_per_week,
        ),
    )]
    pub async fn update_product(
        id: api::product::Id,
        input: api::product::Input,
        ctx: &Context,
    ) -> Result<api::Product, Error> {
        ctx.service()
            .execute(command::UpdateProduct {
                id: id.into(),
                draft: input.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Deletes the `Product` with the specified ID.
    ///
    /// `Contract`s of the deleted `Product` are kept.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PRODUCT_NOT_EXISTS` - the `Product` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "deleteProduct",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn delete_product(
        id: api::product::Id,
        ctx: &Context,
    ) -> Result<bool, Error> {
        ctx.service()
            .execute(command::DeleteProduct { id: id.into() })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|()| true)
    }

    /// Registers a new `User`.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `INVALID_USER` - some of the provided fields are invalid;
    /// - `EMAIL_OCCUPIED` - the provided email is used by another `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            email = %input.email,
            gql.name = "createUser",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn create_user(
        input: api::user::Input,
        ctx: &Context,
    ) -> Result<api::User, Error> {
        ctx.service()
            .execute(command::CreateUser {
                draft: input.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Creates a new `Contract`, pricing it by the current `Product` rates.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `PRODUCT_NOT_EXISTS` - the `Product` with the specified ID does not
    ///                          exist;
    /// - `USER_NOT_EXISTS` - the `User` with the specified ID does not exist;
    /// - `INVALID_CONTRACT` - some of the provided terms are invalid.
    #[tracing::instrument(
        skip_all,
        fields(
            end_date = %input.end_date.to_rfc3339(),
            gql.name = "createContract",
            otel.name = Self::SPAN_NAME,
            product_id = %input.product_id,
            start_date = %input.start_date.to_rfc3339(),
            user_id = %input.user_id,
        ),
    )]
    pub async fn create_contract(
        input: api::contract::Input,
        ctx: &Context,
    ) -> Result<api::Contract, Error> {
        let api::contract::Input {
            product_id,
            user_id,
            start_date,
            end_date,
            quantity,
            state_before,
            status,
        } = input;

        ctx.service()
            .execute(command::CreateContract {
                product_id: product_id.into(),
                user_id: user_id.into(),
                draft: domain::contract::Draft {
                    start_date,
                    end_date,
                    quantity: quantity.unwrap_or(1),
                    state_before,
                },
                status: status.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Changes the status of the `Contract` with the specified ID.
    ///
    /// Any status is accepted, and the price of the `Contract` is kept.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CONTRACT_NOT_EXISTS` - the `Contract` with the specified ID does not
    ///                           exist;
    /// - `INVALID_CONTRACT` - the status or the condition is invalid.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateContractStatus",
            id = %id,
            otel.name = Self::SPAN_NAME,
            status = %status,
        ),
    )]
    pub async fn update_contract_status(
        id: api::contract::Id,
        status: api::contract::Status,
        state_after: Option<String>,
        ctx: &Context,
    ) -> Result<api::Contract, Error> {
        ctx.service()
            .execute(command::UpdateContractStatus {
                contract_id: id.into(),
                status: status.into(),
                state_after,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

impl AsError for command::create_product::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::Invalid(v) => {
                Some(Error::from(InvalidError::Product).with_violations(v))
            }
        }
    }
}

impl AsError for command::update_product::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::Invalid(v) => {
                Some(Error::from(InvalidError::Product).with_violations(v))
            }
            Self::NotExists(_) => Some(ProductError::NotExists.into()),
        }
    }
}

impl AsError for command::delete_product::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::NotExists(_) => Some(ProductError::NotExists.into()),
        }
    }
}

impl AsError for command::create_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "EMAIL_OCCUPIED"]
                #[status = CONFLICT]
                #[message = "Email is used by another `User`"]
                EmailOccupied,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::EmailOccupied(_) => Some(Error::EmailOccupied.into()),
            Self::Invalid(v) => Some(
                crate::Error::from(InvalidError::User).with_violations(v),
            ),
        }
    }
}

impl AsError for command::create_contract::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::Invalid(v) => {
                Some(Error::from(InvalidError::Contract).with_violations(v))
            }
            Self::ProductNotExists(_) => Some(ProductError::NotExists.into()),
            Self::UserNotExists(_) => Some(UserError::NotExists.into()),
        }
    }
}

impl AsError for command::update_contract_status::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::Invalid(v) => {
                Some(Error::from(InvalidError::Contract).with_violations(v))
            }
            Self::NotExists(_) => Some(ContractError::NotExists.into()),
        }
    }
}

define_error! {
    enum InvalidError {
        #[code = "INVALID_CONTRACT"]
        #[status = BAD_REQUEST]
        #[message = "Invalid `Contract`"]
        Contract,

        #[code = "INVALID_PRODUCT"]
        #[status = BAD_REQUEST]
        #[message = "Invalid `Product`"]
        Product,

        #[code = "INVALID_USER"]
        #[status = BAD_REQUEST]
        #[message = "Invalid `User`"]
        User,
    }
}
