//! Common error types for GreekDesk

use thiserror::Error;

/// Common error type used across GreekDesk crates
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A label did not match any known variant
    #[error("Unknown {kind}: {value}")]
    UnknownLabel { kind: &'static str, value: String },
}

/// Result type alias using the common Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an unknown label error
    pub fn unknown_label(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownLabel {
            kind,
            value: value.into(),
        }
    }
}
