//! GraphQL API [`Error`] and conversions into it.

use std::fmt;

use derive_more::Error as StdError;
use itertools::Itertools as _;
use juniper::IntoFieldError;
use service::{infra::database, validation::Violations};
use tracerr::{Trace, Traced};

/// Defines a new error type convertible into an API [`Error`].
///
/// Every variant declares its [`Code`], its [`http::StatusCode`] and the
/// message it is displayed with.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[status = $status_code:ident]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// Error type.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                match err {
                    $(
                        $name::$variant => Self::new(
                            $code,
                            ::http::StatusCode::$status_code,
                            $message,
                        ),
                    )*
                }
            }
        }
    };
}

/// Error returned by the GraphQL API.
///
/// Exposed to clients as a GraphQL field error whose extensions carry the
/// [`Code`], the [`Error::fields`] and the backtrace, if any.
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// Machine-readable [`Code`] of this [`Error`].
    pub code: Code,

    /// [`http::StatusCode`] to respond with.
    pub status_code: http::StatusCode,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// Human-readable message.
    pub message: String,

    /// Rejected input fields along with the reasons they were rejected for.
    pub fields: Vec<(String, String)>,
}

impl Error {
    /// Creates a new [`Error`] out of its parts.
    #[must_use]
    pub fn new(
        code: Code,
        status_code: http::StatusCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code,
            status_code,
            backtrace: None,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Creates a new [`Error`] representing an internal server error.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self::new(
            "INTERNAL_SERVER_ERROR",
            http::StatusCode::INTERNAL_SERVER_ERROR,
            msg.to_string(),
        )
    }

    /// Appends the provided `details` to the message of this [`Error`].
    #[must_use]
    pub fn with_details(mut self, details: &impl fmt::Display) -> Self {
        self.message = format!("{}: {details}", self.message);
        self
    }

    /// Attaches the provided [`Violations`] to this [`Error`], both in its
    /// message and its [`Error::fields`].
    #[must_use]
    pub fn with_violations<F>(mut self, violations: &Violations<F>) -> Self
    where
        F: Ord + fmt::Display,
    {
        self.fields.extend(
            violations
                .iter()
                .map(|(field, reason)| (field.to_string(), reason.to_string())),
        );
        self.with_details(violations)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            code,
            status_code: _,
            backtrace,
            message,
            fields: _,
        } = self;

        write!(
            f,
            "[{code}]: {message}{}",
            backtrace
                .iter()
                .format_with("\n", |trace, f| f(&format_args!("{trace}"))),
        )
    }
}

impl<S> IntoFieldError<S> for Error
where
    S: From<String>,
{
    fn into_field_error(self) -> juniper::FieldError<S> {
        let mut ext = juniper::Object::with_capacity(3);
        drop(
            ext.add_field("code", juniper::Value::scalar(self.code.to_owned())),
        );
        if !self.fields.is_empty() {
            let mut fields = juniper::Object::with_capacity(self.fields.len());
            for (name, reason) in self.fields {
                drop(fields.add_field(name, juniper::Value::scalar(reason)));
            }
            drop(ext.add_field("fields", juniper::Value::object(fields)));
        }
        drop(
            ext.add_field(
                "backtrace",
                juniper::Value::list(
                    self.backtrace
                        .iter()
                        .flat_map(|trace| trace.iter())
                        .map(|frame| juniper::Value::scalar(frame.to_string()))
                        .collect(),
                ),
            ),
        );
        juniper::FieldError::new(self.message, juniper::Value::object(ext))
    }
}

/// Machine-readable code of an [`Error`], e.g. `PRODUCT_NOT_EXISTS`.
pub type Code = &'static str;

/// Conversion of command and query errors into API [`Error`]s.
pub trait AsError {
    /// Converts this value into an [`Error`] exposable to clients.
    ///
    /// [`None`] means the value is internal and is exposed as
    /// `INTERNAL_SERVER_ERROR`.
    fn try_as_error(&self) -> Option<Error>;

    /// Converts this value into an [`Error`], falling back to an internal one.
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error()
            .unwrap_or_else(|| Error::internal(&self))
    }

    /// Converts this value into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().try_as_error()?;
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }
}

/// Storage failures are never exposed as is.
impl AsError for database::Error {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}

#[cfg(test)]
mod spec {
    use juniper::{DefaultScalarValue, IntoFieldError, Value};
    use service::{
        domain::product,
        validation::{Reason, Violations},
    };

    use super::Error;

    #[test]
    fn exposes_violated_fields() {
        let mut violations = Violations::new();
        violations.add(product::Field::PricePerDay, Reason::NotPositive);
        violations.add(product::Field::Object, Reason::Required);

        let err = Error::new(
            "INVALID_PRODUCT",
            http::StatusCode::BAD_REQUEST,
            "Invalid `Product`",
        )
        .with_violations(&violations);

        assert_eq!(err.fields.len(), 2);
        assert!(err.message.starts_with("Invalid `Product`: "), "{err}");

        let field_err =
            IntoFieldError::<DefaultScalarValue>::into_field_error(err);
        let ext = field_err.extensions().as_object_value().unwrap();
        assert_eq!(
            ext.get_field_value("code"),
            Some(&Value::scalar("INVALID_PRODUCT".to_owned())),
        );
        let fields = ext
            .get_field_value("fields")
            .and_then(Value::as_object_value)
            .unwrap();
        assert_eq!(
            fields.get_field_value("object"),
            Some(&Value::scalar("required".to_owned())),
        );
    }

    #[test]
    fn omits_fields_when_none_violated() {
        let field_err = IntoFieldError::<DefaultScalarValue>::into_field_error(
            Error::internal(&"boom"),
        );

        let ext = field_err.extensions().as_object_value().unwrap();
        assert!(ext.get_field_value("fields").is_none());
        assert_eq!(field_err.message(), "boom");
    }
}
