//! Risk engine error types

use pricing::PricingError;
use thiserror::Error;

/// Errors surfaced by the engine facade
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiskError {
    /// A contract failed pricing validation
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// A quote could not be priced; carries the quote's symbol
    #[error("Quote {symbol} rejected: {source}")]
    InvalidQuote {
        symbol: String,
        #[source]
        source: PricingError,
    },

    /// A portfolio position carries a value the aggregation cannot use
    #[error("Position {symbol} has invalid {field}: {value} ({reason})")]
    InvalidPosition {
        symbol: String,
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
}
