//! Quantity-weighted portfolio exposures and the composite risk score

use crate::classifier::gamma_level;
use crate::error::RiskError;
use crate::Result;
use common::{PortfolioGreeksRisk, PortfolioPosition};
use config::{RiskBandsConfig, RiskScoreConfig, ScoreComponent};

pub struct PortfolioAggregator {
    bands: RiskBandsConfig,
    score: RiskScoreConfig,
}

impl PortfolioAggregator {
    pub fn new(bands: RiskBandsConfig, score: RiskScoreConfig) -> Self {
        Self { bands, score }
    }

    /// Sums per-unit Greeks times signed quantity, in caller order.
    ///
    /// Every position is validated before anything is summed. Drawdown and
    /// hedging fields are left at zero/empty; the hedging advisor fills them
    /// from this result.
    pub fn aggregate(&self, positions: &[PortfolioPosition]) -> Result<PortfolioGreeksRisk> {
        if positions.is_empty() {
            return Ok(PortfolioGreeksRisk::default());
        }
        positions.iter().try_for_each(validate_position)?;

        let mut risk = PortfolioGreeksRisk::default();
        for position in positions {
            let qty = position.quantity as f64;
            risk.total_delta += qty * position.greeks.delta;
            risk.total_gamma += qty * position.greeks.gamma;
            risk.total_theta += qty * position.greeks.theta;
            risk.total_vega += qty * position.greeks.vega;
            risk.portfolio_value += qty.abs() * position.price;
        }

        risk.risk_score = risk_score(&self.score, &risk);

        let gamma_per_position = risk.total_gamma.abs() / positions.len() as f64;
        risk.gamma_exposure = gamma_level(&self.bands, gamma_per_position);

        Ok(risk)
    }
}

/// Greeks must be finite; unit prices must also be non-negative
pub fn validate_position(position: &PortfolioPosition) -> Result<()> {
    let invalid = |field, value, reason| RiskError::InvalidPosition {
        symbol: position.symbol.clone(),
        field,
        value,
        reason,
    };

    let g = &position.greeks;
    let finite = [
        ("price", position.price),
        ("greeks.price", g.price),
        ("greeks.delta", g.delta),
        ("greeks.gamma", g.gamma),
        ("greeks.theta", g.theta),
        ("greeks.vega", g.vega),
        ("greeks.rho", g.rho),
    ];
    for (field, value) in finite {
        if !value.is_finite() {
            return Err(invalid(field, value, "must be finite"));
        }
    }

    if position.price < 0.0 {
        return Err(invalid("price", position.price, "must not be negative"));
    }
    if g.price < 0.0 {
        return Err(invalid("greeks.price", g.price, "must not be negative"));
    }
    Ok(())
}

/// `round(100 * Σ w·min(|X| / cap, 1) / Σ w)` with
/// `cap = max(cap_ratio · portfolio_value, min_cap)`.
///
/// Non-decreasing in each `|X|` for a fixed portfolio value and bounded to `0..=100`.
pub fn risk_score(policy: &RiskScoreConfig, risk: &PortfolioGreeksRisk) -> u8 {
    let value = risk.portfolio_value.abs();
    let parts = [
        (&policy.delta, risk.total_delta),
        (&policy.gamma, risk.total_gamma),
        (&policy.theta, risk.total_theta),
        (&policy.vega, risk.total_vega),
    ];

    let total_weight: f64 = parts.iter().map(|(c, _)| c.weight.max(0.0)).sum();
    if total_weight.is_nan() || total_weight <= 0.0 {
        return 0;
    }

    let weighted: f64 = parts
        .iter()
        .map(|(component, exposure)| {
            component.weight.max(0.0) * utilization(component, *exposure, value)
        })
        .sum();

    let score = (100.0 * weighted / total_weight).round();
    if score.is_nan() {
        return 0;
    }
    score.clamp(0.0, 100.0) as u8
}

/// Share of the cap consumed by one exposure, saturating at 1
fn utilization(component: &ScoreComponent, exposure: f64, portfolio_value: f64) -> f64 {
    let cap = (component.cap_ratio * portfolio_value).max(component.min_cap);
    if cap.is_nan() || cap <= 0.0 {
        return if exposure == 0.0 { 0.0 } else { 1.0 };
    }
    (exposure.abs() / cap).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use common::{Greeks, RiskLevel};

    fn aggregator() -> PortfolioAggregator {
        PortfolioAggregator::new(RiskBandsConfig::default(), RiskScoreConfig::default())
    }

    fn position(
        symbol: &str,
        quantity: i64,
        delta: f64,
        gamma: f64,
        theta: f64,
        vega: f64,
    ) -> PortfolioPosition {
        PortfolioPosition {
            symbol: symbol.to_string(),
            quantity,
            greeks: Greeks {
                price: 10.0,
                delta,
                gamma,
                theta,
                vega,
                rho: 0.0,
            },
            price: 10.0,
        }
    }

    #[test]
    fn test_three_position_delta_is_exact() {
        let positions = vec![
            position("A", 100, 0.5, 0.001, -20.0, 5.0),
            position("B", -50, -0.5, 0.001, -20.0, 5.0),
            position("C", 200, 0.7, 0.001, -20.0, 5.0),
        ];

        let risk = aggregator().aggregate(&positions).unwrap();
        assert_eq!(risk.total_delta, 215.0);
        assert_eq!(risk.portfolio_value, 3500.0);
    }

    #[test]
    fn test_empty_portfolio_is_neutral() {
        let risk = aggregator().aggregate(&[]).unwrap();
        assert_eq!(risk, PortfolioGreeksRisk::default());
        assert_eq!(risk.risk_score, 0);
        assert_eq!(risk.gamma_exposure, RiskLevel::Low);
        assert!(risk.hedging_recommendations.is_empty());
    }

    #[test]
    fn test_scaling_quantity_scales_totals() {
        // Dyadic Greeks keep the products exact
        let base = aggregator()
            .aggregate(&[position("A", 3, 0.5, 0.0625, -128.0, 12.25)])
            .unwrap();
        for k in [2_i64, 7, -5] {
            let scaled = aggregator()
                .aggregate(&[position("A", 3 * k, 0.5, 0.0625, -128.0, 12.25)])
                .unwrap();
            let kf = k as f64;
            assert_eq!(scaled.total_delta, base.total_delta * kf);
            assert_eq!(scaled.total_gamma, base.total_gamma * kf);
            assert_eq!(scaled.total_theta, base.total_theta * kf);
            assert_eq!(scaled.total_vega, base.total_vega * kf);
        }
    }

    #[test]
    fn test_concatenation_adds_totals() {
        let a = vec![
            position("A", 10, 0.5, 0.25, -64.0, 8.0),
            position("B", -4, -0.25, 0.125, -32.0, 4.0),
        ];
        let b = vec![position("C", 6, 0.75, 0.5, -16.0, 2.0)];
        let both: Vec<_> = a.iter().chain(b.iter()).cloned().collect();

        let agg = aggregator();
        let ra = agg.aggregate(&a).unwrap();
        let rb = agg.aggregate(&b).unwrap();
        let rab = agg.aggregate(&both).unwrap();

        assert_eq!(rab.total_delta, ra.total_delta + rb.total_delta);
        assert_eq!(rab.total_gamma, ra.total_gamma + rb.total_gamma);
        assert_eq!(rab.total_theta, ra.total_theta + rb.total_theta);
        assert_eq!(rab.total_vega, ra.total_vega + rb.total_vega);
        assert_eq!(rab.portfolio_value, ra.portfolio_value + rb.portfolio_value);
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut bad = position("B", 10, 0.5, 0.0, 0.0, 0.0);
        bad.price = -50.0;

        let err = aggregator()
            .aggregate(&[position("A", 1, 0.5, 0.0, 0.0, 0.0), bad])
            .unwrap_err();
        assert_matches!(
            err,
            RiskError::InvalidPosition { ref symbol, field: "price", .. } if symbol == "B"
        );
    }

    #[test]
    fn test_non_finite_greeks_rejected() {
        let nan_delta = position("A", 10, f64::NAN, 0.0, 0.0, 0.0);
        assert_matches!(
            aggregator().aggregate(&[nan_delta]),
            Err(RiskError::InvalidPosition { field: "greeks.delta", .. })
        );

        let infinite_vega = position("A", 10, 0.5, 0.0, 0.0, f64::INFINITY);
        assert_matches!(
            validate_position(&infinite_vega),
            Err(RiskError::InvalidPosition { field: "greeks.vega", .. })
        );

        let mut negative_model_price = position("A", 10, 0.5, 0.0, 0.0, 0.0);
        negative_model_price.greeks.price = -1.0;
        assert_matches!(
            validate_position(&negative_model_price),
            Err(RiskError::InvalidPosition { field: "greeks.price", .. })
        );
    }

    #[test]
    fn test_zero_price_is_valid() {
        let mut expired = position("A", 10, 0.0, 0.0, 0.0, 0.0);
        expired.price = 0.0;
        expired.greeks.price = 0.0;
        assert!(validate_position(&expired).is_ok());
    }

    #[test]
    fn test_shorts_add_to_value() {
        let risk = aggregator()
            .aggregate(&[position("A", -10, 0.5, 0.0, 0.0, 0.0)])
            .unwrap();
        assert_eq!(risk.portfolio_value, 100.0);
        assert_eq!(risk.total_delta, -5.0);
    }

    #[test]
    fn test_risk_score_monotone_in_gamma() {
        let policy = RiskScoreConfig::default();
        let mut risk = PortfolioGreeksRisk {
            total_delta: 4.0,
            total_theta: -1000.0,
            total_vega: 200.0,
            portfolio_value: 50_000.0,
            ..PortfolioGreeksRisk::default()
        };

        let mut previous = 0;
        for step in 0..200 {
            risk.total_gamma = step as f64 * 0.01;
            let score = risk_score(&policy, &risk);
            assert!(score >= previous, "score fell at gamma {}", risk.total_gamma);
            assert!(score <= 100);
            previous = score;
        }
    }

    #[test]
    fn test_risk_score_sign_does_not_matter() {
        let policy = RiskScoreConfig::default();
        let long = PortfolioGreeksRisk {
            total_delta: 30.0,
            total_gamma: 0.02,
            portfolio_value: 10_000.0,
            ..PortfolioGreeksRisk::default()
        };
        let short = PortfolioGreeksRisk {
            total_delta: -30.0,
            total_gamma: -0.02,
            ..long.clone()
        };
        assert_eq!(risk_score(&policy, &long), risk_score(&policy, &short));
    }

    #[test]
    fn test_risk_score_saturates_at_100() {
        let policy = RiskScoreConfig::default();
        let risk = PortfolioGreeksRisk {
            total_delta: 1e9,
            total_gamma: 1e9,
            total_theta: -1e12,
            total_vega: 1e12,
            portfolio_value: 1_000.0,
            ..PortfolioGreeksRisk::default()
        };
        assert_eq!(risk_score(&policy, &risk), 100);

        let infinite = PortfolioGreeksRisk {
            total_delta: f64::INFINITY,
            ..risk
        };
        assert_eq!(risk_score(&policy, &infinite), 100);
    }

    #[test]
    fn test_risk_score_zero_exposure() {
        let risk = PortfolioGreeksRisk {
            portfolio_value: 5_000.0,
            ..PortfolioGreeksRisk::default()
        };
        assert_eq!(risk_score(&RiskScoreConfig::default(), &risk), 0);
    }

    #[test]
    fn test_risk_score_known_value() {
        // Only delta at half its cap: cap = max(0.005 * 1000, 10) = 10
        let risk = PortfolioGreeksRisk {
            total_delta: 5.0,
            portfolio_value: 1_000.0,
            ..PortfolioGreeksRisk::default()
        };
        // 100 * 0.35 * 0.5 / 1.0 = 17.5, rounds away from zero
        assert_eq!(risk_score(&RiskScoreConfig::default(), &risk), 18);
    }

    #[test]
    fn test_gamma_exposure_is_per_position() {
        let agg = aggregator();
        let one = agg
            .aggregate(&[position("A", 1, 0.5, 0.04, 0.0, 0.0)])
            .unwrap();
        assert_eq!(one.gamma_exposure, RiskLevel::High);

        // Same total gamma spread over four positions averages down to low
        let four = agg
            .aggregate(&[
                position("A", 1, 0.5, 0.01, 0.0, 0.0),
                position("B", 1, 0.5, 0.01, 0.0, 0.0),
                position("C", 1, 0.5, 0.01, 0.0, 0.0),
                position("D", 1, 0.5, 0.01, 0.0, 0.0),
            ])
            .unwrap();
        assert_eq!(four.gamma_exposure, RiskLevel::Low);
    }
}
