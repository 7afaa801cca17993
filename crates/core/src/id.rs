//! Strongly-typed string identifiers used across the domains.
//!
//! Entity ids are opaque strings supplied by the owning service. They are stable
//! across the entity's lifecycle and unique within one entity category.

/// Declare a string-backed identifier newtype.
///
/// The generated type is `serde(transparent)`, rejects empty/blank values in
/// `FromStr`/`parse`, and can mint fresh ids with `generate()` (UUIDv7, time-ordered).
#[macro_export]
macro_rules! string_id {
    ($(#[$meta:meta])* $vis:vis struct $t:ident, $name:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(transparent)]
        $vis struct $t(String);

        impl $t {
            /// Wrap an existing identifier without validation.
            ///
            /// Prefer `parse` for untrusted input.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Mint a fresh identifier (UUIDv7 rendered as a string).
            pub fn generate() -> Self {
                Self($crate::__private::Uuid::now_v7().to_string())
            }

            /// Parse and validate an identifier.
            pub fn parse(value: &str) -> Result<Self, $crate::DomainError> {
                value.parse()
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }

            /// True when the id is empty or whitespace only.
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl ::core::fmt::Display for $t {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::str::FromStr for $t {
            type Err = $crate::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                if s.trim().is_empty() {
                    return Err($crate::DomainError::invalid_id(concat!($name, ": empty")));
                }
                Ok(Self(s.to_string()))
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $t {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $t {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}
