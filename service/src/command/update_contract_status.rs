//! [`Command`] for changing the status of a [`Contract`].

use common::operations::{
    By, Commit, Insert, Lock, Select, Transact, Transacted,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{contract, Contract},
    infra::{database, Database},
    validation::{Reason, Violations},
    Service,
};

use super::Command;

/// [`Command`] for changing the [`contract::Status`] of a [`Contract`].
///
/// Any transition is accepted, and the [`Contract::total_price`] is left as
/// it is.
#[derive(Clone, Debug)]
pub struct UpdateContractStatus {
    /// ID of the [`Contract`] to be updated.
    pub contract_id: contract::Id,

    /// New [`contract::Status`] of the [`Contract`].
    pub status: contract::Status,

    /// Raw [`contract::Condition`] of the returned units, if recorded.
    pub state_after: Option<String>,
}

impl UpdateContractStatus {
    /// Validates the new values of this [`UpdateContractStatus`].
    fn validate(
        status: contract::Status,
        state_after: Option<String>,
    ) -> Result<
        (contract::Status, Option<contract::Condition>),
        Violations<contract::Field>,
    > {
        use contract::Field;

        let mut v = Violations::new();

        if !status.is_storable() {
            let reason = if status.as_str().trim().is_empty() {
                Reason::Required
            } else {
                Reason::TooLong
            };
            v.add(Field::Status, reason);
        }
        let state_after = match state_after {
            Some(s) if !s.trim().is_empty() => v
                .text(Field::StateAfter, &s, contract::Condition::new)
                .map(Some),
            _ => Some(None),
        };

        v.finish(|| Some((status, state_after?)))
    }
}

impl<Db> Command<UpdateContractStatus> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Contract, contract::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Contract>, contract::Id>>,
            Ok = Option<Contract>,
            Err = Traced<database::Error>,
        > + Database<Insert<Contract>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Contract;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateContractStatus,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateContractStatus {
            contract_id,
            status,
            state_after,
        } = cmd;

        let (status, state_after) =
            UpdateContractStatus::validate(status, state_after)
                .map_err(E::Invalid)
                .map_err(tracerr::wrap!())?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent updates of the same `Contract`.
        tx.execute(Lock(By::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut contract = tx
            .execute(Select(By::<Option<Contract>, _>::new(contract_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::NotExists(contract_id))
            .map_err(tracerr::wrap!())?;

        contract.status = status;
        if state_after.is_some() {
            contract.state_after = state_after;
        }

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

/// Error of [`UpdateContractStatus`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Provided values are invalid.
    #[display("Invalid `Contract`: {_0}")]
    Invalid(#[error(not(source))] Violations<contract::Field>),

    /// [`Contract`] with the provided ID does not exist.
    #[display("`Contract(id: {_0})` does not exist")]
    NotExists(#[error(not(source))] contract::Id),
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::contract::{Field, Status},
        validation::Reason,
    };

    use super::UpdateContractStatus;

    #[test]
    fn accepts_any_label() {
        let (status, state_after) = UpdateContractStatus::validate(
            Status::Other("On hold".into()),
            Some("  ".into()),
        )
        .unwrap();

        assert_eq!(status, Status::Other("On hold".into()));
        assert!(state_after.is_none());
    }

    #[test]
    fn rejects_blank_label() {
        let v = UpdateContractStatus::validate(Status::Other(" ".into()), None)
            .unwrap_err();

        assert_eq!(v.get(&Field::Status), Some(Reason::Required));
    }

    #[test]
    fn rejects_too_long_values() {
        let v = UpdateContractStatus::validate(
            Status::Other("x".repeat(513)),
            Some("y".repeat(5000)),
        )
        .unwrap_err();

        assert_eq!(v.get(&Field::Status), Some(Reason::TooLong));
        assert_eq!(v.get(&Field::StateAfter), Some(Reason::TooLong));
    }
}
