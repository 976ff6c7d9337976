//! Per-contract risk band and trade signal

use common::{Greeks, LiveOptionSnapshot, RiskLevel, TradingRecommendation};
use config::{RecommendationConfig, RiskBand, RiskBandsConfig};

/// What the classifier looks at for one contract
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContractInputs {
    pub greeks: Greeks,
    pub implied_volatility: f64,
}

impl From<&LiveOptionSnapshot> for ContractInputs {
    fn from(snapshot: &LiveOptionSnapshot) -> Self {
        Self {
            greeks: snapshot.greeks,
            implied_volatility: snapshot.implied_volatility,
        }
    }
}

/// The three signals behind a recommendation, each in {-1, 0, +1}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalBreakdown {
    /// +1 for strong directional conviction, -1 for a lottery-ticket delta
    pub delta: i8,
    /// +1 when optionality is cheap, -1 when it is expensive
    pub implied_volatility: i8,
    /// +1 when gamma offers convexity
    pub gamma: i8,
}

pub struct ContractRiskClassifier {
    bands: RiskBandsConfig,
    policy: RecommendationConfig,
}

impl ContractRiskClassifier {
    pub fn new(bands: RiskBandsConfig, policy: RecommendationConfig) -> Self {
        Self { bands, policy }
    }

    pub fn classify(&self, inputs: &ContractInputs) -> (RiskLevel, TradingRecommendation) {
        (self.risk_level(inputs), self.recommendation(inputs))
    }

    /// First band (extreme, then high, then medium) with any limit breached.
    /// Theta limits are per-day figures.
    pub fn risk_level(&self, inputs: &ContractInputs) -> RiskLevel {
        let gamma = inputs.greeks.gamma.abs();
        let theta_per_day = inputs.greeks.theta_per_day();
        let iv = inputs.implied_volatility;

        let breached = |band: &RiskBand| {
            gamma > band.gamma
                || band.theta_per_day.is_some_and(|limit| theta_per_day < limit)
                || iv > band.implied_volatility
        };

        if breached(&self.bands.extreme) {
            RiskLevel::Extreme
        } else if breached(&self.bands.high) {
            RiskLevel::High
        } else if breached(&self.bands.medium) {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn signals(&self, inputs: &ContractInputs) -> SignalBreakdown {
        let p = &self.policy;
        let abs_delta = inputs.greeks.delta.abs();
        let iv = inputs.implied_volatility;

        let delta = if abs_delta >= p.strong_delta {
            1
        } else if abs_delta <= p.weak_delta {
            -1
        } else {
            0
        };

        let implied_volatility = if iv <= p.cheap_iv {
            1
        } else if iv >= p.rich_iv {
            -1
        } else {
            0
        };

        let gamma = if inputs.greeks.gamma >= p.convexity_gamma {
            1
        } else {
            0
        };

        SignalBreakdown {
            delta,
            implied_volatility,
            gamma,
        }
    }

    /// Weighted sum of the three signals
    pub fn score(&self, inputs: &ContractInputs) -> f64 {
        let s = self.signals(inputs);
        let p = &self.policy;
        p.delta_weight * f64::from(s.delta)
            + p.iv_weight * f64::from(s.implied_volatility)
            + p.gamma_weight * f64::from(s.gamma)
    }

    pub fn recommendation(&self, inputs: &ContractInputs) -> TradingRecommendation {
        recommendation_for_score(&self.policy, self.score(inputs))
    }
}

/// Comparisons are strict, so a score sitting on a threshold falls back toward hold
pub fn recommendation_for_score(policy: &RecommendationConfig, score: f64) -> TradingRecommendation {
    if score > policy.strong_threshold {
        TradingRecommendation::StrongBuy
    } else if score > policy.buy_threshold {
        TradingRecommendation::Buy
    } else if score < -policy.strong_threshold {
        TradingRecommendation::StrongSell
    } else if score < -policy.buy_threshold {
        TradingRecommendation::Sell
    } else {
        TradingRecommendation::Hold
    }
}

/// Gamma-only banding, shared with portfolio gamma exposure
pub fn gamma_level(bands: &RiskBandsConfig, abs_gamma: f64) -> RiskLevel {
    if abs_gamma > bands.extreme.gamma {
        RiskLevel::Extreme
    } else if abs_gamma > bands.high.gamma {
        RiskLevel::High
    } else if abs_gamma > bands.medium.gamma {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::DAYS_PER_YEAR;

    fn classifier() -> ContractRiskClassifier {
        ContractRiskClassifier::new(RiskBandsConfig::default(), RecommendationConfig::default())
    }

    fn inputs(delta: f64, gamma: f64, theta_per_day: f64, iv: f64) -> ContractInputs {
        ContractInputs {
            greeks: Greeks {
                price: 100.0,
                delta,
                gamma,
                theta: theta_per_day * DAYS_PER_YEAR,
                vega: 10.0,
                rho: 1.0,
            },
            implied_volatility: iv,
        }
    }

    #[test]
    fn test_quiet_contract_is_low() {
        let level = classifier().risk_level(&inputs(0.5, 0.001, -2.0, 0.12));
        assert_eq!(level, RiskLevel::Low);
    }

    #[test]
    fn test_each_extreme_trigger() {
        let c = classifier();
        assert_eq!(c.risk_level(&inputs(0.5, 0.051, -1.0, 0.10)), RiskLevel::Extreme);
        assert_eq!(c.risk_level(&inputs(0.5, -0.051, -1.0, 0.10)), RiskLevel::Extreme);
        assert_eq!(c.risk_level(&inputs(0.5, 0.001, -15.5, 0.10)), RiskLevel::Extreme);
        assert_eq!(c.risk_level(&inputs(0.5, 0.001, -1.0, 0.36)), RiskLevel::Extreme);
    }

    #[test]
    fn test_high_and_medium_bands() {
        let c = classifier();
        assert_eq!(c.risk_level(&inputs(0.5, 0.031, -1.0, 0.10)), RiskLevel::High);
        assert_eq!(c.risk_level(&inputs(0.5, 0.001, -10.5, 0.10)), RiskLevel::High);
        assert_eq!(c.risk_level(&inputs(0.5, 0.001, -1.0, 0.26)), RiskLevel::High);
        assert_eq!(c.risk_level(&inputs(0.5, 0.016, -1.0, 0.10)), RiskLevel::Medium);
        assert_eq!(c.risk_level(&inputs(0.5, 0.001, -1.0, 0.19)), RiskLevel::Medium);
    }

    #[test]
    fn test_medium_band_has_no_theta_limit() {
        // Heavy decay below the high limit stays low when gamma and IV are quiet
        let level = classifier().risk_level(&inputs(0.5, 0.001, -9.0, 0.10));
        assert_eq!(level, RiskLevel::Low);
    }

    #[test]
    fn test_band_limits_are_strict() {
        let c = classifier();
        assert_eq!(c.risk_level(&inputs(0.5, 0.05, -1.0, 0.10)), RiskLevel::High);
        assert_eq!(c.risk_level(&inputs(0.5, 0.001, -1.0, 0.35)), RiskLevel::High);
        assert_eq!(c.risk_level(&inputs(0.5, 0.001, -1.0, 0.18)), RiskLevel::Low);
    }

    #[test]
    fn test_signal_breakdown() {
        let c = classifier();
        let s = c.signals(&inputs(0.8, 0.02, -1.0, 0.12));
        assert_eq!(
            s,
            SignalBreakdown {
                delta: 1,
                implied_volatility: 1,
                gamma: 1
            }
        );

        let s = c.signals(&inputs(-0.1, 0.0005, -1.0, 0.40));
        assert_eq!(
            s,
            SignalBreakdown {
                delta: -1,
                implied_volatility: -1,
                gamma: 0
            }
        );
    }

    #[test]
    fn test_recommendation_boundary_vectors() {
        let c = classifier();
        // +1 +1 +1 = 3
        assert_eq!(
            c.recommendation(&inputs(0.8, 0.02, -1.0, 0.12)),
            TradingRecommendation::StrongBuy
        );
        // +1 +1 +0 = 2
        assert_eq!(
            c.recommendation(&inputs(0.8, 0.001, -1.0, 0.12)),
            TradingRecommendation::StrongBuy
        );
        // +1 +0 +0 = 1
        assert_eq!(
            c.recommendation(&inputs(0.8, 0.001, -1.0, 0.22)),
            TradingRecommendation::Buy
        );
        // 0 0 0
        assert_eq!(
            c.recommendation(&inputs(0.5, 0.001, -1.0, 0.22)),
            TradingRecommendation::Hold
        );
        // +1 -1 +0 = 0
        assert_eq!(
            c.recommendation(&inputs(0.8, 0.001, -1.0, 0.40)),
            TradingRecommendation::Hold
        );
        // -1 +0 +0 = -1
        assert_eq!(
            c.recommendation(&inputs(0.1, 0.001, -1.0, 0.22)),
            TradingRecommendation::Sell
        );
        // -1 -1 +0 = -2
        assert_eq!(
            c.recommendation(&inputs(0.1, 0.001, -1.0, 0.40)),
            TradingRecommendation::StrongSell
        );
    }

    #[test]
    fn test_signal_edges_are_inclusive() {
        let c = classifier();
        let s = c.signals(&inputs(0.7, 0.015, -1.0, 0.15));
        assert_eq!(s.delta, 1);
        assert_eq!(s.implied_volatility, 1);
        assert_eq!(s.gamma, 1);

        let s = c.signals(&inputs(0.2, 0.0, -1.0, 0.30));
        assert_eq!(s.delta, -1);
        assert_eq!(s.implied_volatility, -1);
    }

    #[test]
    fn test_score_on_threshold_resolves_toward_hold() {
        let policy = RecommendationConfig::default();
        assert_eq!(
            recommendation_for_score(&policy, 0.5),
            TradingRecommendation::Hold
        );
        assert_eq!(
            recommendation_for_score(&policy, -0.5),
            TradingRecommendation::Hold
        );
        assert_eq!(
            recommendation_for_score(&policy, 1.5),
            TradingRecommendation::Buy
        );
        assert_eq!(
            recommendation_for_score(&policy, -1.5),
            TradingRecommendation::Sell
        );
    }

    #[test]
    fn test_weights_change_the_outcome() {
        let policy = RecommendationConfig {
            iv_weight: 0.0,
            ..RecommendationConfig::default()
        };
        let c = ContractRiskClassifier::new(RiskBandsConfig::default(), policy);
        // Rich IV no longer cancels the delta conviction
        assert_eq!(
            c.recommendation(&inputs(0.8, 0.001, -1.0, 0.40)),
            TradingRecommendation::Buy
        );
    }

    #[test]
    fn test_gamma_level_bands() {
        let bands = RiskBandsConfig::default();
        assert_eq!(gamma_level(&bands, 0.0), RiskLevel::Low);
        assert_eq!(gamma_level(&bands, 0.02), RiskLevel::Medium);
        assert_eq!(gamma_level(&bands, 0.04), RiskLevel::High);
        assert_eq!(gamma_level(&bands, 0.5), RiskLevel::Extreme);
    }
}
