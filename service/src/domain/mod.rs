//! Domain definitions.

pub mod contract;
pub mod product;
pub mod user;

pub use self::{contract::Contract, product::Product, user::User};

/// Defines a non-empty trimmed text newtype, limited to `$max` characters.
macro_rules! define_text {
    (
        #[doc = $doc:literal]
        $name:ident, max = $max:literal
    ) => {
        #[doc = $doc]
        #[derive(
            ::derive_more::AsRef,
            Clone,
            Debug,
            ::derive_more::Display,
            Eq,
            Hash,
            PartialEq,
        )]
        #[as_ref(str, String)]
        #[cfg_attr(
            feature = "postgres",
            derive(::postgres_types::FromSql, ::postgres_types::ToSql),
            postgres(transparent)
        )]
        pub struct $name(String);

        impl $name {
            /// Maximum length of this value in characters.
            pub const MAX_LEN: usize = $max;

            /// Creates a new value if the given `value` is valid.
            ///
            /// Surrounding whitespace is trimmed.
            #[must_use]
            pub fn new(value: impl AsRef<str>) -> Option<Self> {
                let value = value.as_ref().trim();
                Self::check(value).then(|| Self(value.to_owned()))
            }

            /// Checks whether the given trimmed `value` is valid.
            fn check(value: &str) -> bool {
                !value.is_empty() && value.chars().count() <= Self::MAX_LEN
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = &'static str;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s).ok_or(concat!("invalid `", stringify!($name), "`"))
            }
        }
    };
}
pub(crate) use define_text;

