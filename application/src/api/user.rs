//! [`User`]-related definitions.

use common::DateTime;
use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLInputObject, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::Context;

/// Renter of [`Product`]s.
///
/// [`Product`]: crate::api::Product
#[derive(Clone, Debug, From, Into)]
pub struct User(domain::User);

/// A renter of `Product`s.
#[graphql_object(context = Context)]
impl User {
    /// Unique identifier of this `User`.
    #[must_use]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// First name of this `User`.
    #[must_use]
    pub fn first_name(&self) -> String {
        self.0.first_name.to_string()
    }

    /// Last name of this `User`.
    #[must_use]
    pub fn last_name(&self) -> String {
        self.0.last_name.to_string()
    }

    /// Full name of this `User`.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.0.full_name()
    }

    /// Email address of this `User`.
    #[must_use]
    pub fn email(&self) -> String {
        self.0.email.to_string()
    }

    /// Phone number of this `User`.
    #[must_use]
    pub fn phone_number(&self) -> String {
        self.0.phone.to_string()
    }

    /// Postal address of this `User`.
    #[must_use]
    pub fn postal_address(&self) -> String {
        self.0.postal_address.to_string()
    }

    /// City this `User` lives in.
    #[must_use]
    pub fn city(&self) -> String {
        self.0.city.to_string()
    }

    /// Birth date of this `User` in `YYYY-MM-DD` format.
    #[must_use]
    pub fn birth_date(&self) -> String {
        self.0.birth_date.to_string()
    }

    /// `DateTime` when this `User` was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// Unique identifier of a `User`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::user::Id)]
#[into(domain::user::Id)]
#[graphql(name = "UserId", transparent)]
pub struct Id(Uuid);

/// Description of a `User` to be created.
#[derive(Clone, Debug, GraphQLInputObject)]
#[graphql(name = "UserInput")]
pub struct Input {
    /// First name of the `User`.
    pub first_name: String,

    /// Last name of the `User`.
    pub last_name: String,

    /// Email address of the `User`.
    pub email: String,

    /// Phone number of the `User`.
    pub phone_number: String,

    /// Postal address of the `User`.
    pub postal_address: String,

    /// City the `User` lives in.
    pub city: String,

    /// Birth date of the `User` in `YYYY-MM-DD` format.
    pub birth_date: String,
}

impl From<Input> for domain::user::Draft {
    fn from(input: Input) -> Self {
        let Input {
            first_name,
            last_name,
            email,
            phone_number,
            postal_address,
            city,
            birth_date,
        } = input;
        Self {
            first_name,
            last_name,
            email,
            phone: phone_number,
            postal_address,
            city,
            birth_date,
        }
    }
}
