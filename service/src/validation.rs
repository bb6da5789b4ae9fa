//! Field validation of incoming domain drafts.

use std::{
    collections::BTreeMap,
    error::Error as StdError,
    fmt::{self, Debug, Formatter},
};

use derive_more::Display;
use itertools::Itertools as _;

/// Reason a single field was rejected.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Reason {
    /// Field is required but blank or missing.
    #[display("required")]
    Required,

    /// Field must be greater than zero.
    #[display("must be positive")]
    NotPositive,

    /// Field must not be less than zero.
    #[display("must not be negative")]
    Negative,

    /// Field has an invalid format.
    #[display("malformed")]
    Malformed,

    /// Field is expressed in an unexpected currency.
    #[display("currency mismatch")]
    CurrencyMismatch,

    /// Field precedes the start of its period.
    #[display("precedes start")]
    BeforeStart,

    /// Field exceeds its maximum length.
    #[display("too long")]
    TooLong,

    /// Field exceeds its maximum value.
    #[display("too large")]
    TooLarge,
}

/// Violated fields of a draft, each with the [`Reason`] it was rejected for.
///
/// Only the first [`Reason`] reported for a field is kept.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Violations<F: Ord>(BTreeMap<F, Reason>);

impl<F: Ord> Default for Violations<F> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<F: Ord> Violations<F> {
    /// Creates empty [`Violations`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the provided `field` as violated for the given [`Reason`],
    /// unless it has been recorded already.
    pub fn add(&mut self, field: F, reason: Reason) {
        _ = self.0.entry(field).or_insert(reason);
    }

    /// Returns the [`Reason`] the provided `field` was rejected for, if any.
    #[must_use]
    pub fn get(&self, field: &F) -> Option<Reason> {
        self.0.get(field).copied()
    }

    /// Indicates whether no field has been violated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of violated fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over violated fields in their declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&F, Reason)> {
        self.0.iter().map(|(f, r)| (f, *r))
    }

    /// Parses the provided raw text `value` of a `field` with the given
    /// length-limited constructor, recording [`Reason::Required`] for blank
    /// values and [`Reason::TooLong`] for anything else rejected.
    pub(crate) fn text<'v, T>(
        &mut self,
        field: F,
        value: &'v str,
        new: impl FnOnce(&'v str) -> Option<T>,
    ) -> Option<T> {
        self.parse(field, value, new, Reason::TooLong)
    }

    /// Parses the provided raw text `value` of a `field` with the given
    /// format-checking constructor, recording [`Reason::Required`] for blank
    /// values and [`Reason::Malformed`] for anything else rejected.
    pub(crate) fn formatted<'v, T>(
        &mut self,
        field: F,
        value: &'v str,
        new: impl FnOnce(&'v str) -> Option<T>,
    ) -> Option<T> {
        self.parse(field, value, new, Reason::Malformed)
    }

    /// Parses the provided raw text `value` of a `field`, recording the
    /// `rejected` [`Reason`] if it isn't blank but still fails.
    fn parse<'v, T>(
        &mut self,
        field: F,
        value: &'v str,
        new: impl FnOnce(&'v str) -> Option<T>,
        rejected: Reason,
    ) -> Option<T> {
        let parsed = new(value);
        if parsed.is_none() {
            let reason = if value.trim().is_empty() {
                Reason::Required
            } else {
                rejected
            };
            self.add(field, reason);
        }
        parsed
    }

    /// Records the provided `field` as violated for the given [`Reason`] if
    /// the `check` fails.
    pub(crate) fn ensure(&mut self, check: bool, field: F, reason: Reason) {
        if !check {
            self.add(field, reason);
        }
    }

    /// Finishes validation, returning the outcome of `ok` if no field has been
    /// violated.
    ///
    /// # Errors
    ///
    /// With these [`Violations`] if any field has been violated.
    pub(crate) fn finish<T>(
        self,
        ok: impl FnOnce() -> Option<T>,
    ) -> Result<T, Self> {
        if !self.is_empty() {
            return Err(self);
        }
        ok().ok_or(self)
    }
}

impl<F: Ord + Display> Display for Violations<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .iter()
                .format_with(", ", |(field, reason), f| f(&format_args!(
                    "`{field}` {reason}"
                ))),
        )
    }
}

impl<F: Ord + Debug + Display> StdError for Violations<F> {}

#[cfg(test)]
mod spec {
    use derive_more::Display;

    use super::{Reason, Violations};

    #[derive(Clone, Copy, Debug, Display, Eq, Ord, PartialEq, PartialOrd)]
    enum Field {
        #[display("name")]
        Name,
        #[display("amount")]
        Amount,
    }

    #[test]
    fn keeps_first_reason_per_field() {
        let mut v = Violations::new();
        v.add(Field::Amount, Reason::NotPositive);
        v.add(Field::Amount, Reason::Malformed);

        assert_eq!(v.len(), 1);
        assert_eq!(v.get(&Field::Amount), Some(Reason::NotPositive));
    }

    #[test]
    fn classifies_rejected_text() {
        let mut v = Violations::new();
        let parse = |s: &str| (!s.trim().is_empty() && s.len() < 5).then_some(());

        assert_eq!(v.text(Field::Name, "ok", parse), Some(()));
        assert!(v.is_empty());

        assert_eq!(v.text(Field::Name, "   ", parse), None);
        assert_eq!(v.get(&Field::Name), Some(Reason::Required));

        let mut v = Violations::new();
        assert_eq!(v.text(Field::Name, "far too long", parse), None);
        assert_eq!(v.get(&Field::Name), Some(Reason::TooLong));

        let mut v = Violations::new();
        assert_eq!(v.formatted(Field::Name, "far too long", parse), None);
        assert_eq!(v.get(&Field::Name), Some(Reason::Malformed));
    }

    fn shout(value: impl AsRef<str>) -> Option<String> {
        let value = value.as_ref().trim();
        (!value.is_empty()).then(|| value.to_uppercase())
    }

    #[test]
    fn accepts_generic_constructors() {
        let mut v = Violations::new();
        let raw = String::from(" ok ");

        assert_eq!(v.text(Field::Name, &raw, shout), Some("OK".to_owned()));
        assert_eq!(v.formatted(Field::Amount, " ", shout), None);
        assert_eq!(v.get(&Field::Amount), Some(Reason::Required));
    }

    #[test]
    fn displays_in_field_order() {
        let mut v = Violations::new();
        v.add(Field::Amount, Reason::Negative);
        v.add(Field::Name, Reason::Required);

        assert_eq!(
            v.to_string(),
            "`name` required, `amount` must not be negative",
        );
    }

    #[test]
    fn finishes_only_without_violations() {
        let v = Violations::<Field>::new();
        assert_eq!(v.finish(|| Some(1)), Ok(1));

        let mut v = Violations::new();
        v.ensure(false, Field::Name, Reason::Required);
        v.ensure(true, Field::Amount, Reason::NotPositive);
        let err = v.finish(|| Some(1)).unwrap_err();
        assert_eq!(err.len(), 1);
    }
}
