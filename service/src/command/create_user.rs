//! [`Command`] for creating a new [`User`].

use common::{
    operations::{By, Insert, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{user, User},
    infra::{database, Database},
    validation::Violations,
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`User`].
#[derive(Clone, Debug)]
pub struct CreateUser {
    /// [`user::Draft`] of a new [`User`].
    pub draft: user::Draft,
}

impl<Db> Command<CreateUser> for Service<Db>
where
    Db: for<'e> Database<
            Select<By<Option<User>, &'e user::Email>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Insert<User>, Err = Traced<database::Error>>,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateUser) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateUser { draft } = cmd;

        let user = draft
            .validate(user::Id::new(), DateTime::now().coerce())
            .map_err(E::Invalid)
            .map_err(tracerr::wrap!())?;

        let existing = self
            .database()
            .execute(Select(By::new(&user.email)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if existing.is_some() {
            return Err(tracerr::new!(E::EmailOccupied(user.email)));
        }

        // Concurrent registrations of the same email race past the check
        // above, so the unique constraint decides between them.
        let inserted = self.database().execute(Insert(user.clone())).await;
        if let Err(e) = &inserted {
            if e.as_ref().violates(database::constraint::USER_EMAIL) {
                return Err(tracerr::new!(E::EmailOccupied(user.email)));
            }
        }
        inserted.map_err(tracerr::map_from_and_wrap!(=> E)).map(drop)?;

        Ok(user)
    }
}

/// Error of [`CreateUser`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`user::Email`] is already occupied.
    #[display("`{_0}` email is occupied")]
    EmailOccupied(#[error(not(source))] user::Email),

    /// Provided [`user::Draft`] is invalid.
    #[display("Invalid `User`: {_0}")]
    Invalid(#[error(not(source))] Violations<user::Field>),
}
