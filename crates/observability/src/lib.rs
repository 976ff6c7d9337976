//! Observability for GreekDesk
//!
//! - Structured logging via tracing
//! - Prometheus metrics
//! - Engine tick metric helpers
//!
//! # Quick Start
//!
//! ```ignore
//! use observability::{init_logging, LogFormat};
//!
//! init_logging("greekdesk", LogFormat::Pretty)?;
//!
//! // Optional Prometheus endpoint
//! observability::metrics::init_metrics(9090)?;
//! ```

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LogFormat};
pub use metrics::{init_metrics, EngineMetrics, TickTimer};
