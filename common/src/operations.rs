//! Storage operations, dispatched to a [`Handler`] by their type.
//!
//! Each operation wraps its argument, so a single storage type implements a
//! separate [`Handler`] per operation and per argument, e.g.
//! `Handler<Select<By<Option<Product>, product::Id>>>`.

use std::marker::PhantomData;

use crate::Handler;

/// Stores a new value.
#[derive(Clone, Copy, Debug)]
pub struct Insert<T>(pub T);

/// Overwrites an already stored value.
#[derive(Clone, Copy, Debug)]
pub struct Update<T>(pub T);

/// Removes the stored value designated by `T`.
#[derive(Clone, Copy, Debug)]
pub struct Delete<T>(pub T);

/// Reads the stored value designated by `T`.
#[derive(Clone, Copy, Debug)]
pub struct Select<T>(pub T);

/// Locks the stored value designated by `T` until the current transaction
/// ends.
#[derive(Clone, Copy, Debug)]
pub struct Lock<T>(pub T);

/// Starts a transaction, yielding a [`Transacted`] handler for it.
#[derive(Clone, Copy, Debug)]
pub struct Transact;

/// Handler running operations inside the transaction [`Transact`] started on
/// `T`.
pub type Transacted<T> = <T as Handler<Transact>>::Ok;

/// Commits the transaction of a [`Transacted`] handler.
#[derive(Clone, Copy, Debug)]
pub struct Commit;

/// Designates a `W` value (or collection of values) by its `B` key.
///
/// `W` exists at type level only, so different results are selectable by the
/// same key, e.g. `By<Option<Contract>, contract::Id>` and
/// `By<Vec<Contract>, product::Id>`.
#[derive(Clone, Copy, Debug)]
pub struct By<W, B> {
    /// Designated kind of value.
    _what: PhantomData<W>,

    /// Key designating the value.
    by: B,
}

impl<W, B> By<W, B> {
    /// Designates a `W` value by the provided key.
    #[must_use]
    pub fn new(by: B) -> Self {
        Self {
            _what: PhantomData,
            by,
        }
    }

    /// Unwraps the key of this [`By`].
    #[must_use]
    pub fn into_inner(self) -> B {
        self.by
    }
}
