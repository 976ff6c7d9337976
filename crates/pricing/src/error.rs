//! Pricing error types

use thiserror::Error;

/// Errors raised when a contract cannot be priced
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    /// A contract field is outside its valid domain
    #[error("Invalid {field}: {value} ({reason})")]
    InvalidInput {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
}

impl PricingError {
    pub(crate) fn invalid(field: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidInput {
            field,
            value,
            reason,
        }
    }
}
