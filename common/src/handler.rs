//! [`Handler`] abstraction.

use std::future::Future;

/// Asynchronous handler of `Args`.
///
/// Commands, queries and storage operations are all [`Handler`]s, each one
/// implemented for the type it is executed by.
pub trait Handler<Args = ()> {
    /// Outcome of successful execution.
    type Ok;

    /// Error of failed execution.
    type Err;

    /// Executes the provided `Args`.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
