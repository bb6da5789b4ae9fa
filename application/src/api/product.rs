//! [`Product`]-related definitions.

use common::{DateTime, Money};
use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLInputObject, GraphQLScalar};
use service::{domain, query, Query as _};
use uuid::Uuid;

use crate::{api, AsError, Context, Error};

/// Rentable [`domain::Product`] of the catalog.
#[derive(Clone, Debug, From, Into)]
pub struct Product(domain::Product);

/// A rentable `Product` of the catalog.
#[graphql_object(context = Context)]
impl Product {
    /// Unique identifier of this `Product`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Kind of object this `Product` is.
    #[must_use]
    pub fn object(&self) -> String {
        self.0.object.to_string()
    }

    /// Brand of this `Product`.
    #[must_use]
    pub fn brand(&self) -> String {
        self.0.brand.to_string()
    }

    /// Model of this `Product`.
    #[must_use]
    pub fn model(&self) -> String {
        self.0.model.to_string()
    }

    /// Description of this `Product`.
    #[must_use]
    pub fn description(&self) -> String {
        self.0.description.to_string()
    }

    /// Precautions of using this `Product`, if any.
    #[must_use]
    pub fn precautions(&self) -> Option<String> {
        self.0.precautions.as_ref().map(ToString::to_string)
    }

    /// Number of units of this `Product` owned.
    #[must_use]
    pub fn quantity(&self) -> i32 {
        u16::from(self.0.quantity).into()
    }

    /// Price of renting this `Product` for a day.
    #[must_use]
    pub fn price_per_day(&self) -> Money {
        self.0.price_per_day
    }

    /// Price of renting this `Product` for a whole week.
    #[must_use]
    pub fn price_per_week(&self) -> Money {
        self.0.price_per_week
    }

    /// Refundable deposit required for renting this `Product`.
    #[must_use]
    pub fn caution_deposit(&self) -> Money {
        self.0.caution_deposit
    }

    /// Display name of this `Product`.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.0.display_name()
    }

    /// Availability of this `Product` at the provided `DateTime` (now, if
    /// omitted).
    #[tracing::instrument(
        skip_all,
        fields(
            at = ?at.map(|at| at.to_rfc3339()),
            gql.name = "Product.status",
            id = %self.0.id,
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn status(
        &self,
        at: Option<DateTime>,
        ctx: &Context,
    ) -> Result<Status, Error> {
        let contracts = ctx
            .service()
            .execute(query::contracts::OfProduct::by(self.0.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        Ok(self
            .0
            .status(at.unwrap_or_else(DateTime::now), &contracts)
            .into())
    }

    /// `DateTime` when this `Product` was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Unique identifier of a `Product`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::product::Id)]
#[into(domain::product::Id)]
#[graphql(name = "ProductId", transparent)]
pub struct Id(Uuid);

/// Availability of a `Product`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "ProductStatus")]
pub enum Status {
    /// At least one unit may be rented.
    Available,

    /// Every unit is rented.
    Rented,
}

impl From<domain::product::Status> for Status {
    fn from(status: domain::product::Status) -> Self {
        match status {
            domain::product::Status::Available => Self::Available,
            domain::product::Status::Rented => Self::Rented,
        }
    }
}

/// Description of a `Product` to be created or updated.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "ProductInput")]
pub struct Input {
    /// Kind of object the `Product` is.
    pub object: String,

    /// Brand of the `Product`.
    pub brand: String,

    /// Model of the `Product`.
    pub model: String,

    /// Description of the `Product`.
    pub description: String,

    /// Precautions of using the `Product`.
    pub precautions: Option<String>,

    /// Number of units owned.
    pub quantity: i32,

    /// Price of renting for a day.
    pub price_per_day: Money,

    /// Price of renting for a whole week.
    pub price_per_week: Money,

    /// Refundable deposit.
    pub caution_deposit: Money,
}

impl From<Input> for domain::product::Draft {
    fn from(input: Input) -> Self {
        let Input {
            object,
            brand,
            model,
            description,
            precautions,
            quantity,
            price_per_day,
            price_per_week,
            caution_deposit,
        } = input;
        Self {
            object,
            brand,
            model,
            description,
            precautions,
            quantity,
            price_per_day,
            price_per_week,
            caution_deposit,
        }
    }
}
