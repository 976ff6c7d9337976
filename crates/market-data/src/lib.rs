//! Market data for GreekDesk
//!
//! Everything between quote providers and the risk engine:
//!
//! - [`MarketDataSource`]: async trait every provider implements
//! - [`SyntheticMarketData`]: seeded, clearly fake quotes for demos and tests
//! - [`FileMarketData`]: recorded quotes from a JSON or YAML file
//! - [`build_positions`]: holdings joined with the current snapshots
//! - [`RiskMonitor`]: periodic refresh publishing [`TickReport`]s on a broadcast channel

pub mod error;
pub mod file;
pub mod monitor;
pub mod positions;
pub mod source;
pub mod synthetic;
pub mod types;

pub use error::MarketDataError;
pub use file::FileMarketData;
pub use monitor::{RiskMonitor, TickReport};
pub use positions::{build_positions, PositionBook};
pub use source::{build_source, MarketDataSource};
pub use synthetic::SyntheticMarketData;
pub use types::{Holding, QuoteFile};

/// Result type for market data operations
pub type Result<T> = std::result::Result<T, MarketDataError>;
