//! Splits a priced universe into high-risk rows and actionable opportunities

use common::LiveOptionSnapshot;
use config::ScannerConfig;
use serde::{Deserialize, Serialize};

/// Both lists keep the input order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub high_risk: Vec<LiveOptionSnapshot>,
    pub opportunities: Vec<LiveOptionSnapshot>,
}

pub struct OpportunityScanner {
    policy: ScannerConfig,
}

impl OpportunityScanner {
    pub fn new(policy: ScannerConfig) -> Self {
        Self { policy }
    }

    pub fn scan(&self, universe: &[LiveOptionSnapshot]) -> ScanResult {
        ScanResult {
            high_risk: universe
                .iter()
                .filter(|s| s.risk_level.is_elevated())
                .cloned()
                .collect(),
            opportunities: universe
                .iter()
                .filter(|s| self.is_opportunity(s))
                .cloned()
                .collect(),
        }
    }

    /// Actionable signal on a contract that clears both liquidity floors
    pub fn is_opportunity(&self, snapshot: &LiveOptionSnapshot) -> bool {
        snapshot.trading_recommendation.is_actionable() && self.is_liquid(snapshot)
    }

    pub fn is_liquid(&self, snapshot: &LiveOptionSnapshot) -> bool {
        snapshot.volume >= self.policy.min_volume
            && snapshot.open_interest >= self.policy.min_open_interest
    }
}
