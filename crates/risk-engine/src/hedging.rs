//! Drawdown estimate and prioritized hedging guidance

use common::{PortfolioGreeksRisk, RiskLevel, VolRegime, DAYS_PER_YEAR};
use config::HedgingConfig;
use serde::{Deserialize, Serialize};

/// Market state the advisor needs beyond the portfolio itself
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketContext {
    /// Direction implied volatility is moving; drives the vega rule
    pub vol_regime: VolRegime,
    /// Current underlying level; the configured reference spot is used when absent
    pub underlying_price: Option<f64>,
}

impl MarketContext {
    pub fn new(vol_regime: VolRegime) -> Self {
        Self {
            vol_regime,
            underlying_price: None,
        }
    }

    pub fn with_underlying_price(mut self, price: f64) -> Self {
        self.underlying_price = Some(price);
        self
    }
}

pub struct HedgingAdvisor {
    policy: HedgingConfig,
}

impl HedgingAdvisor {
    pub fn new(policy: HedgingConfig) -> Self {
        Self { policy }
    }

    pub fn advise(&self, risk: &PortfolioGreeksRisk, context: &MarketContext) -> (f64, Vec<String>) {
        (
            self.max_drawdown(risk, context),
            self.recommendations(risk, context),
        )
    }

    /// One-day loss estimate for an adverse spot move and a volatility shock:
    ///
    /// `|Δ|·m + ½|Γ|·m² + |vega|·shock + max(−θ, 0)/365 + var_pct·value`, `m = move_pct·spot`
    pub fn max_drawdown(&self, risk: &PortfolioGreeksRisk, context: &MarketContext) -> f64 {
        let p = &self.policy;
        let spot = context
            .underlying_price
            .filter(|s| s.is_finite() && *s > 0.0)
            .unwrap_or(p.reference_spot);
        let adverse_move = p.adverse_move_pct * spot;

        let delta_loss = risk.total_delta.abs() * adverse_move;
        let gamma_loss = 0.5 * risk.total_gamma.abs() * adverse_move * adverse_move;
        let vega_loss = risk.total_vega.abs() * p.vol_shock;
        let decay = (-risk.total_theta).max(0.0) / DAYS_PER_YEAR;
        let tail = p.value_at_risk_pct * risk.portfolio_value.abs();

        (delta_loss + gamma_loss + vega_loss + decay + tail).max(0.0)
    }

    /// Each rule contributes at most one message; order is gamma, delta, vega,
    /// theta, then the overall score.
    pub fn recommendations(&self, risk: &PortfolioGreeksRisk, context: &MarketContext) -> Vec<String> {
        [
            self.gamma_rule(risk),
            self.delta_rule(risk),
            self.vega_rule(risk, context.vol_regime),
            self.theta_rule(risk),
            self.score_rule(risk),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn gamma_rule(&self, risk: &PortfolioGreeksRisk) -> Option<String> {
        match risk.gamma_exposure {
            RiskLevel::Extreme => Some(format!(
                "Extreme gamma exposure (net gamma {:.4}): cut short-dated at-the-money positions now",
                risk.total_gamma
            )),
            RiskLevel::High => Some(format!(
                "High gamma exposure (net gamma {:.4}): offset convexity with longer-dated options",
                risk.total_gamma
            )),
            RiskLevel::Medium | RiskLevel::Low => None,
        }
    }

    fn delta_rule(&self, risk: &PortfolioGreeksRisk) -> Option<String> {
        let delta = risk.total_delta;
        if delta.abs() <= self.policy.delta_threshold {
            return None;
        }
        let units = delta.abs().round();
        Some(if delta > 0.0 {
            format!(
                "Net delta {:+.1}: sell {} units of the underlying or buy puts to get delta-neutral",
                delta, units
            )
        } else {
            format!(
                "Net delta {:+.1}: buy {} units of the underlying or buy calls to get delta-neutral",
                delta, units
            )
        })
    }

    /// Long vega only hurts when IV is falling; short vega only when it is rising
    fn vega_rule(&self, risk: &PortfolioGreeksRisk, regime: VolRegime) -> Option<String> {
        let vega = risk.total_vega;
        if vega.abs() <= self.policy.vega_threshold {
            return None;
        }
        match regime {
            VolRegime::Falling if vega > 0.0 => Some(format!(
                "Long vega {:.0} while implied volatility is falling: sell options to reduce vega",
                vega
            )),
            VolRegime::Rising if vega < 0.0 => Some(format!(
                "Short vega {:.0} while implied volatility is rising: buy options to cover vega",
                vega
            )),
            _ => None,
        }
    }

    fn theta_rule(&self, risk: &PortfolioGreeksRisk) -> Option<String> {
        let decay_per_day = -risk.total_theta / DAYS_PER_YEAR;
        if decay_per_day <= self.policy.theta_per_day_threshold {
            return None;
        }
        Some(format!(
            "Time decay costs {:.0} per day: roll long options further out or add short premium",
            decay_per_day
        ))
    }

    fn score_rule(&self, risk: &PortfolioGreeksRisk) -> Option<String> {
        if risk.risk_score < self.policy.risk_score_threshold {
            return None;
        }
        Some(format!(
            "Risk score {}/100: reduce gross exposure across the book",
            risk.risk_score
        ))
    }
}
