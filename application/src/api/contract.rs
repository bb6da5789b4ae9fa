//! [`Contract`]-related definitions.

use common::{DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use futures::TryFutureExt as _;
use juniper::{graphql_object, GraphQLInputObject, GraphQLScalar};
use service::{domain, query, read, Query as _};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    AsError, Context, Error,
};

/// Rental [`domain::Contract`] with lazily loaded references.
#[derive(Clone, Debug)]
pub struct Contract {
    /// Underlying [`domain::Contract`].
    contract: domain::Contract,

    /// [`domain::Product`] the [`domain::Contract`] refers to, if it still
    /// exists.
    product: OnceCell<Option<domain::Product>>,

    /// [`domain::User`] the [`domain::Contract`] refers to, if it still
    /// exists.
    user: OnceCell<Option<domain::User>>,
}

impl From<domain::Contract> for Contract {
    fn from(contract: domain::Contract) -> Self {
        Self {
            contract,
            product: OnceCell::new(),
            user: OnceCell::new(),
        }
    }
}

impl From<read::contract::Joined> for Contract {
    fn from(joined: read::contract::Joined) -> Self {
        let read::contract::Joined {
            contract,
            product,
            user,
        } = joined;
        Self {
            contract,
            product: OnceCell::new_with(Some(product)),
            user: OnceCell::new_with(Some(user)),
        }
    }
}

impl Contract {
    /// Returns the [`domain::Product`] of this [`Contract`], loading it if
    /// required.
    ///
    /// # Errors
    ///
    /// If failed to load the [`domain::Product`].
    async fn load_product(
        &self,
        ctx: &Context,
    ) -> Result<Option<&domain::Product>, Error> {
        let id = self.contract.product_id;
        self.product
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::product::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
            })
            .await
            .map(Option::as_ref)
    }

    /// Returns the [`domain::User`] of this [`Contract`], loading it if
    /// required.
    ///
    /// # Errors
    ///
    /// If failed to load the [`domain::User`].
    async fn load_user(
        &self,
        ctx: &Context,
    ) -> Result<Option<&domain::User>, Error> {
        let id = self.contract.user_id;
        self.user
            .get_or_try_init(|| {
                ctx.service()
                    .execute(query::user::ById::by(id))
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
            })
            .await
            .map(Option::as_ref)
    }
}

/// A rental `Contract` of a `Product` by a `User`.
#[graphql_object(context = Context)]
impl Contract {
    /// Unique identifier of this `Contract`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.contract.id.into()
    }

    /// Rented `Product`, unless it has been deleted.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.product",
            id = %self.contract.id,
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn product(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Product>, Error> {
        Ok(self.load_product(ctx).await?.cloned().map(Into::into))
    }

    /// Renting `User`, unless they have been deleted.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Contract.user",
            id = %self.contract.id,
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn user(&self, ctx: &Context) -> Result<Option<api::User>, Error> {
        Ok(self.load_user(ctx).await?.cloned().map(Into::into))
    }

    /// Number of rented units.
    #[must_use]
    pub fn quantity(&self) -> i32 {
        u16::from(self.contract.quantity).into()
    }

    /// `DateTime` the rental period starts at.
    #[must_use]
    pub fn start_date(&self) -> DateTime {
        self.contract.start_date.coerce()
    }

    /// `DateTime` the rental period ends at (exclusive).
    #[must_use]
    pub fn end_date(&self) -> DateTime {
        self.contract.end_date.coerce()
    }

    /// Price fixed at the creation of this `Contract`.
    #[must_use]
    pub fn total_price(&self) -> Money {
        self.contract.total_price
    }

    /// Current status of this `Contract`.
    #[must_use]
    pub fn status(&self) -> Status {
        self.contract.status.clone().into()
    }

    /// Condition of the rented units when handed over.
    #[must_use]
    pub fn state_before(&self) -> Option<String> {
        self.contract.state_before.as_ref().map(ToString::to_string)
    }

    /// Condition of the rented units when returned.
    #[must_use]
    pub fn state_after(&self) -> Option<String> {
        self.contract.state_after.as_ref().map(ToString::to_string)
    }

    /// `DateTime` when this `Contract` was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.contract.created_at.coerce()
    }
}

/// Unique identifier of a `Contract`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::contract::Id)]
#[into(domain::contract::Id)]
#[graphql(name = "ContractId", transparent)]
pub struct Id(Uuid);

/// Status of a `Contract`.
///
/// `Pending`, `Active`, `Completed` and `Cancelled` are well-known, while any
/// other label is kept as is.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "ContractStatus",
    with = scalar::Via::<domain::contract::Status>,
)]
pub struct Status(domain::contract::Status);

/// Terms of a `Contract` to be created.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "ContractInput")]
pub struct Input {
    /// ID of the `Product` to be rented.
    pub product_id: api::product::Id,

    /// ID of the renting `User`.
    pub user_id: api::user::Id,

    /// `DateTime` the rental period starts at.
    pub start_date: DateTime,

    /// `DateTime` the rental period ends at (exclusive).
    pub end_date: DateTime,

    /// Number of rented units, `1` if omitted.
    pub quantity: Option<i32>,

    /// Condition of the rented units when handed over.
    pub state_before: Option<String>,

    /// Initial status, `Pending` if omitted.
    pub status: Option<Status>,
}

/// Printable document of a `Contract`.
#[derive(Clone, Debug, From, Into)]
pub struct Document(read::contract::Document);

/// A printable document of a `Contract` to be signed.
#[graphql_object(name = "ContractDocument", context = Context)]
impl Document {
    /// ID of the `Contract`.
    #[must_use]
    pub fn contract_id(&self) -> Id {
        self.0.contract_id.into()
    }

    /// Date this document is issued on, in `YYYY-MM-DD` format.
    #[must_use]
    pub fn issued_on(&self) -> &str {
        &self.0.issued_on
    }

    /// Status of the `Contract`.
    #[must_use]
    pub fn status(&self) -> Status {
        self.0.status.clone().into()
    }

    /// Rented object.
    #[must_use]
    pub fn object(&self) -> &str {
        &self.0.object
    }

    /// Brand of the rented object.
    #[must_use]
    pub fn brand(&self) -> &str {
        &self.0.brand
    }

    /// Model of the rented object.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.0.model
    }

    /// Full name of the renter.
    #[must_use]
    pub fn renter_name(&self) -> &str {
        &self.0.renter_name
    }

    /// Email address of the renter.
    #[must_use]
    pub fn renter_email(&self) -> &str {
        &self.0.renter_email
    }

    /// Start of the rental period, in `YYYY-MM-DD` format.
    #[must_use]
    pub fn start_date(&self) -> &str {
        &self.0.start_date
    }

    /// End of the rental period, in `YYYY-MM-DD` format.
    #[must_use]
    pub fn end_date(&self) -> &str {
        &self.0.end_date
    }

    /// Number of billed days.
    #[must_use]
    pub fn days(&self) -> i32 {
        api::int(self.0.days)
    }

    /// Price of the `Contract`.
    #[must_use]
    pub fn total_price(&self) -> Money {
        self.0.total_price
    }

    /// Refundable deposit, if the `Product` still exists.
    #[must_use]
    pub fn caution_deposit(&self) -> Option<Money> {
        self.0.caution_deposit
    }

    /// Plain text rendering of this document.
    #[must_use]
    pub fn text(&self) -> String {
        self.0.to_string()
    }
}
