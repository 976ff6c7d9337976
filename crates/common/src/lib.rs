//! Common types and utilities for GreekDesk
//!
//! This crate provides the plain value types exchanged between the pricing
//! engine, the risk engine and the host process.
//!
//! # Modules
//!
//! - [`error`] - Common error types
//! - [`types`] - Contracts, Greeks, snapshots, positions and portfolio risk

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
