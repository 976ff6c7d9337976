//! Market data error types

use risk_engine::RiskError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while fetching quotes
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// Quote file could not be read
    #[error("Failed to read quote file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Quote file content is malformed
    #[error("Failed to parse quote file {path:?}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Quote file extension is neither JSON nor YAML
    #[error("Unsupported quote file format: {0:?} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),

    /// Source-specific failure
    #[error("Source {source_name} failed: {message}")]
    Source {
        source_name: &'static str,
        message: String,
    },

    /// The held book could not be evaluated
    #[error(transparent)]
    Risk(#[from] RiskError),
}
