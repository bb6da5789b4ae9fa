//! Helpers for custom GraphQL scalars.

use std::{fmt, marker::PhantomData, str::FromStr};

use juniper::{
    GraphQLType, InputValue, ParseScalarResult, ParseScalarValue, ScalarToken,
    ScalarValue, Value,
};

/// GraphQL scalar represented by the string form of an `As` domain value.
///
/// Meant for `#[graphql(with = scalar::Via::<As>)]` on a wrapper of `As`,
/// which must implement [`AsRef`] and [`TryFrom`] for `As`. Values are
/// written with the [`Display`] impl of `As` and read with its [`FromStr`]
/// impl.
///
/// [`Display`]: fmt::Display
#[derive(Debug)]
pub struct Via<As>(PhantomData<As>);

impl<As> Via<As> {
    /// Writes the wrapped `As` value as a string [`Value`].
    pub fn to_output<T, S>(value: &T) -> Value<S>
    where
        As: fmt::Display,
        T: AsRef<As>,
        S: ScalarValue,
    {
        Value::from(value.as_ref().to_string())
    }

    /// Reads a `T` wrapper from a string [`InputValue`].
    ///
    /// # Errors
    ///
    /// If the [`InputValue`] is not a string, or `As` or `T` reject it.
    pub fn from_input<T, S>(input: &InputValue<S>) -> Result<T, String>
    where
        As: FromStr,
        As::Err: fmt::Display,
        T: TryFrom<As> + GraphQLType<S, TypeInfo = ()>,
        T::Error: fmt::Display,
        S: ScalarValue,
    {
        let name = T::name(&()).unwrap_or("scalar");

        let Some(s) = input.as_string_value() else {
            return Err(format!("`{name}` expects a string, found: {input}"));
        };
        let value = s.parse::<As>().map_err(|e| {
            format!("`{name}` cannot be parsed from \"{s}\": {e}")
        })?;
        T::try_from(value).map_err(|e| format!("Invalid `{name}`: {e}"))
    }

    /// Parses the provided [`ScalarToken`] as a string.
    ///
    /// # Errors
    ///
    /// If the [`ScalarToken`] is not a string.
    pub fn parse_token<S: ScalarValue>(
        value: ScalarToken<'_>,
    ) -> ParseScalarResult<S> {
        <String as ParseScalarValue<S>>::from_str(value)
    }
}

#[cfg(test)]
mod spec {
    use juniper::{DefaultScalarValue, InputValue, Value};

    use crate::api::contract::Status;

    use super::Via;

    type ViaStatus = Via<service::domain::contract::Status>;

    #[test]
    fn writes_display_form() {
        let status = Status::from(service::domain::contract::Status::Active);

        let out: Value<DefaultScalarValue> = ViaStatus::to_output(&status);

        assert_eq!(out, Value::scalar("Active".to_owned()));
    }

    #[test]
    fn reads_custom_labels_verbatim() {
        let input = InputValue::<DefaultScalarValue>::scalar("On hold");

        let status: Status = ViaStatus::from_input(&input).unwrap();

        assert_eq!(status.to_string(), "On hold");
    }

    #[test]
    fn rejects_non_strings() {
        let input = InputValue::<DefaultScalarValue>::scalar(42);

        let err = ViaStatus::from_input::<Status, _>(&input).unwrap_err();

        assert!(err.contains("ContractStatus"), "{err}");
    }
}
