//! Option pricing for GreekDesk
//!
//! Closed-form Black-Scholes-Merton valuation of European calls and puts.
//!
//! # Key Invariants
//!
//! - Pricing is a pure function: no state, no I/O, no logging
//! - Inputs are validated before the formula runs; garbage never becomes NaN
//! - `T == 0` and `σ == 0` take the explicit intrinsic-value branch
//! - Greeks are per unit, theta per year, vega per 1.00 of volatility

pub mod black_scholes;
pub mod error;

pub use black_scholes::{d1_d2, norm_cdf, norm_pdf, price_and_greeks, validate_contract};
pub use error::PricingError;

/// Result type for pricing operations
pub type Result<T> = std::result::Result<T, PricingError>;
