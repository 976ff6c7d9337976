use crate::aggregator::PortfolioAggregator;
use crate::classifier::{ContractInputs, ContractRiskClassifier};
use crate::error::RiskError;
use crate::hedging::{HedgingAdvisor, MarketContext};
use crate::scanner::{OpportunityScanner, ScanResult};
use crate::Result;
use common::{
    Greeks, LiveOptionSnapshot, OptionContract, OptionQuote, PortfolioGreeksRisk,
    PortfolioPosition, RiskLevel, TradingRecommendation,
};
use config::EngineConfig;
use pricing::PricingError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A quote that could not be turned into a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedQuote {
    pub symbol: String,
    pub reason: String,
}

/// Result of pricing a whole quote universe
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UniverseSnapshot {
    /// Same order as the quotes that priced successfully
    pub snapshots: Vec<LiveOptionSnapshot>,
    pub rejected: Vec<RejectedQuote>,
}

/// Pricing, classification, aggregation, hedging and scanning behind one value.
///
/// Holds only policy; every call is a pure function of its arguments, so one
/// engine can be shared across threads by reference.
pub struct RiskEngine {
    policy: EngineConfig,
    classifier: ContractRiskClassifier,
    aggregator: PortfolioAggregator,
    advisor: HedgingAdvisor,
    scanner: OpportunityScanner,
}

impl RiskEngine {
    pub fn new(policy: EngineConfig) -> Self {
        Self {
            classifier: ContractRiskClassifier::new(
                policy.risk_bands.clone(),
                policy.recommendation.clone(),
            ),
            aggregator: PortfolioAggregator::new(
                policy.risk_bands.clone(),
                policy.risk_score.clone(),
            ),
            advisor: HedgingAdvisor::new(policy.hedging.clone()),
            scanner: OpportunityScanner::new(policy.scanner.clone()),
            policy,
        }
    }

    pub fn policy(&self) -> &EngineConfig {
        &self.policy
    }

    pub fn price(&self, contract: &OptionContract) -> Result<Greeks> {
        Ok(pricing::price_and_greeks(contract)?)
    }

    pub fn classify(&self, inputs: &ContractInputs) -> (RiskLevel, TradingRecommendation) {
        self.classifier.classify(inputs)
    }

    /// Prices a quote at its implied volatility and classifies the result
    pub fn snapshot(&self, quote: &OptionQuote) -> Result<LiveOptionSnapshot> {
        if !quote.last_price.is_finite() || quote.last_price < 0.0 {
            return Err(RiskError::InvalidQuote {
                symbol: quote.symbol.clone(),
                source: PricingError::InvalidInput {
                    field: "last_price",
                    value: quote.last_price,
                    reason: "must be finite and not negative",
                },
            });
        }

        let greeks = pricing::price_and_greeks(&quote.contract()).map_err(|source| {
            RiskError::InvalidQuote {
                symbol: quote.symbol.clone(),
                source,
            }
        })?;

        let (risk_level, trading_recommendation) = self.classifier.classify(&ContractInputs {
            greeks,
            implied_volatility: quote.implied_volatility,
        });

        Ok(LiveOptionSnapshot {
            symbol: quote.symbol.clone(),
            option_type: quote.option_type,
            strike_price: quote.strike_price,
            spot_price: quote.spot_price,
            last_price: quote.last_price,
            implied_volatility: quote.implied_volatility,
            volume: quote.volume,
            open_interest: quote.open_interest,
            greeks,
            risk_level,
            trading_recommendation,
        })
    }

    /// Bad quotes are reported in `rejected` and never abort the batch
    pub fn snapshot_universe(&self, quotes: &[OptionQuote]) -> UniverseSnapshot {
        let mut universe = UniverseSnapshot {
            snapshots: Vec::with_capacity(quotes.len()),
            rejected: Vec::new(),
        };

        for quote in quotes {
            match self.snapshot(quote) {
                Ok(snapshot) => universe.snapshots.push(snapshot),
                Err(e) => {
                    warn!(symbol = %quote.symbol, error = %e, "Skipping unpriceable quote");
                    universe.rejected.push(RejectedQuote {
                        symbol: quote.symbol.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        debug!(
            priced = universe.snapshots.len(),
            rejected = universe.rejected.len(),
            "Universe priced"
        );
        universe
    }

    /// Validates and aggregates the book, then fills in drawdown and hedging guidance
    pub fn evaluate_portfolio(
        &self,
        positions: &[PortfolioPosition],
        context: &MarketContext,
    ) -> Result<PortfolioGreeksRisk> {
        let mut risk = self.aggregator.aggregate(positions)?;
        if positions.is_empty() {
            return Ok(risk);
        }

        let (max_drawdown_risk, recommendations) = self.advisor.advise(&risk, context);
        risk.max_drawdown_risk = max_drawdown_risk;
        risk.hedging_recommendations = recommendations;

        debug!(
            positions = positions.len(),
            risk_score = risk.risk_score,
            gamma_exposure = %risk.gamma_exposure,
            max_drawdown = risk.max_drawdown_risk,
            "Portfolio evaluated"
        );
        Ok(risk)
    }

    pub fn scan(&self, universe: &[LiveOptionSnapshot]) -> ScanResult {
        self.scanner.scan(universe)
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use common::{OptionType, VolRegime, DAYS_PER_YEAR};

    fn quote(symbol: &str, strike: f64, option_type: OptionType, iv: f64) -> OptionQuote {
        OptionQuote {
            symbol: symbol.to_string(),
            underlying: "NIFTY".to_string(),
            option_type,
            strike_price: strike,
            spot_price: 18000.0,
            last_price: 200.0,
            implied_volatility: iv,
            volume: 1_000,
            open_interest: 10_000,
            time_to_expiry: 10.0 / DAYS_PER_YEAR,
            risk_free_rate: 0.06,
        }
    }

    #[test]
    fn test_snapshot_prices_and_classifies() {
        let engine = RiskEngine::default();
        let snap = engine
            .snapshot(&quote("NIFTY18000CE", 18000.0, OptionType::Call, 0.20))
            .unwrap();

        assert!((snap.greeks.price - 252.589).abs() < 0.05);
        // About -13.4 a day of decay breaches the high band's theta limit
        assert_eq!(snap.risk_level, RiskLevel::High);
        assert_eq!(snap.volume, 1_000);
        assert_eq!(snap.symbol, "NIFTY18000CE");
    }

    #[test]
    fn test_snapshot_rejects_bad_quote() {
        let engine = RiskEngine::default();
        let mut bad = quote("BROKEN", 18000.0, OptionType::Put, 0.2);
        bad.spot_price = -1.0;

        let err = engine.snapshot(&bad).unwrap_err();
        assert_matches!(
            err,
            RiskError::InvalidQuote { ref symbol, source: PricingError::InvalidInput { field: "spot_price", .. } }
                if symbol == "BROKEN"
        );
    }

    #[test]
    fn test_universe_keeps_going_past_rejections() {
        let engine = RiskEngine::default();
        let mut nan_iv = quote("NAN", 18100.0, OptionType::Call, 0.2);
        nan_iv.implied_volatility = f64::NAN;

        let universe = engine.snapshot_universe(&[
            quote("A", 17900.0, OptionType::Put, 0.18),
            nan_iv,
            quote("B", 18100.0, OptionType::Call, 0.22),
        ]);

        let symbols: Vec<&str> = universe.snapshots.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["A", "B"]);
        assert_eq!(universe.rejected.len(), 1);
        assert_eq!(universe.rejected[0].symbol, "NAN");
    }

    #[test]
    fn test_evaluate_portfolio_fills_hedging_fields() {
        let engine = RiskEngine::default();
        let call = engine
            .snapshot(&quote("C", 18000.0, OptionType::Call, 0.2))
            .unwrap();

        let positions = vec![PortfolioPosition {
            symbol: call.symbol.clone(),
            quantity: 200,
            greeks: call.greeks,
            price: call.last_price,
        }];

        let risk = engine
            .evaluate_portfolio(&positions, &MarketContext::new(VolRegime::Stable))
            .unwrap();
        assert!((risk.total_delta - 200.0 * call.greeks.delta).abs() < 1e-9);
        assert!(risk.max_drawdown_risk > 0.0);
        // ~103 delta is well past the 50 threshold
        assert!(risk
            .hedging_recommendations
            .iter()
            .any(|r| r.starts_with("Net delta")));
    }

    #[test]
    fn test_universe_serializes_with_labels() {
        let engine = RiskEngine::default();
        let universe = engine.snapshot_universe(&[quote("A", 18000.0, OptionType::Call, 0.2)]);
        let json = serde_json::to_value(&universe).unwrap();

        assert_eq!(json["snapshots"][0]["option_type"], "call");
        assert_eq!(json["snapshots"][0]["risk_level"], "high");
        assert!(json["rejected"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_evaluate_empty_portfolio() {
        let engine = RiskEngine::default();
        let risk = engine
            .evaluate_portfolio(&[], &MarketContext::default())
            .unwrap();
        assert_eq!(risk, PortfolioGreeksRisk::default());
    }

    #[test]
    fn test_evaluate_rejects_invalid_positions() {
        let engine = RiskEngine::default();
        let call = engine
            .snapshot(&quote("C", 18000.0, OptionType::Call, 0.2))
            .unwrap();
        let valid = PortfolioPosition {
            symbol: "C".to_string(),
            quantity: 10,
            greeks: call.greeks,
            price: call.last_price,
        };

        let mut negative = valid.clone();
        negative.price = -50.0;
        assert_matches!(
            engine.evaluate_portfolio(&[valid.clone(), negative], &MarketContext::default()),
            Err(RiskError::InvalidPosition { field: "price", .. })
        );

        let mut nan_delta = valid;
        nan_delta.greeks.delta = f64::NAN;
        assert_matches!(
            engine.evaluate_portfolio(&[nan_delta], &MarketContext::default()),
            Err(RiskError::InvalidPosition { field: "greeks.delta", .. })
        );
    }

    #[test]
    fn test_snapshot_rejects_bad_last_price() {
        let engine = RiskEngine::default();
        let mut bad = quote("NEG", 18000.0, OptionType::Call, 0.2);
        bad.last_price = -1.0;

        assert_matches!(
            engine.snapshot(&bad),
            Err(RiskError::InvalidQuote {
                source: PricingError::InvalidInput { field: "last_price", .. },
                ..
            })
        );
    }

    #[test]
    fn test_engine_is_shareable_across_threads() {
        let engine = RiskEngine::default();
        let quotes: Vec<OptionQuote> = (0..8)
            .map(|i| {
                quote(
                    &format!("S{}", i),
                    17800.0 + 50.0 * i as f64,
                    OptionType::Call,
                    0.2,
                )
            })
            .collect();

        let serial = engine.snapshot_universe(&quotes);
        let shared = &engine;
        let parallel: Vec<LiveOptionSnapshot> = std::thread::scope(|scope| {
            let handles: Vec<_> = quotes
                .iter()
                .map(|q| scope.spawn(move || shared.snapshot(q)))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap().unwrap())
                .collect()
        });

        assert_eq!(serial.snapshots, parallel);
    }
}
