//! Risk engine for GreekDesk
//!
//! Turns priced contracts into risk information:
//!
//! - [`ContractRiskClassifier`]: risk band and trade signal for one contract
//! - [`PortfolioAggregator`]: quantity-weighted Greeks, value and a 0-100 risk score
//! - [`HedgingAdvisor`]: one-day drawdown estimate and prioritized hedging guidance
//! - [`OpportunityScanner`]: high-risk and actionable subsets of a universe
//! - [`RiskEngine`]: all of the above plus pricing behind one value
//!
//! Every threshold comes from [`config::EngineConfig`]. Nothing here holds
//! state between calls or performs I/O.

pub mod aggregator;
pub mod classifier;
pub mod engine;
pub mod error;
pub mod hedging;
pub mod scanner;

pub use aggregator::{risk_score, validate_position, PortfolioAggregator};
pub use classifier::{
    gamma_level, recommendation_for_score, ContractInputs, ContractRiskClassifier,
    SignalBreakdown,
};
pub use engine::{RejectedQuote, RiskEngine, UniverseSnapshot};
pub use error::RiskError;
pub use hedging::{HedgingAdvisor, MarketContext};
pub use scanner::{OpportunityScanner, ScanResult};

/// Result type for risk operations
pub type Result<T> = std::result::Result<T, RiskError>;
