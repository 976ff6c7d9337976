use common::VolRegime;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod defaults;
pub mod parser;
pub mod substitution;
pub mod validator;

pub use defaults::*;
pub use parser::*;
pub use substitution::*;
pub use validator::*;

// ==================================================================================
// DESK METADATA
// ==================================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeskConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub version: String,
}

// ==================================================================================
// ENGINE POLICY
// ==================================================================================

/// Every tunable constant the risk engine uses.
///
/// The algorithms read these values; none of them are literals in code.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct EngineConfig {
    #[serde(rename = "risk_bands")]
    #[serde(default)]
    pub risk_bands: RiskBandsConfig,
    #[serde(default)]
    pub recommendation: RecommendationConfig,
    #[serde(rename = "risk_score")]
    #[serde(default)]
    pub risk_score: RiskScoreConfig,
    #[serde(default)]
    pub hedging: HedgingConfig,
    #[serde(default)]
    pub scanner: ScannerConfig,
}

/// Thresholds for the three elevated bands; anything below `medium` is low
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RiskBandsConfig {
    pub extreme: RiskBand,
    pub high: RiskBand,
    pub medium: RiskBand,
}

impl Default for RiskBandsConfig {
    fn default() -> Self {
        Self {
            extreme: RiskBand {
                gamma: 0.05,
                theta_per_day: Some(-15.0),
                implied_volatility: 0.35,
            },
            high: RiskBand {
                gamma: 0.03,
                theta_per_day: Some(-10.0),
                implied_volatility: 0.25,
            },
            medium: RiskBand {
                gamma: 0.015,
                theta_per_day: None,
                implied_volatility: 0.18,
            },
        }
    }
}

/// A band triggers when any one of its limits is breached
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RiskBand {
    /// Triggers when `|gamma|` is strictly above this
    pub gamma: f64,
    /// Triggers when daily theta is strictly below this (a negative number)
    #[serde(rename = "theta_per_day")]
    #[serde(default)]
    pub theta_per_day: Option<f64>,
    /// Triggers when implied volatility is strictly above this
    #[serde(rename = "implied_volatility")]
    pub implied_volatility: f64,
}

/// Weights and cut-offs for the per-contract trade signal
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RecommendationConfig {
    /// `|delta|` at or above this is a directional conviction (+1)
    #[serde(default = "default_strong_delta")]
    pub strong_delta: f64,
    /// `|delta|` at or below this is a lottery ticket (-1)
    #[serde(default = "default_weak_delta")]
    pub weak_delta: f64,
    /// Implied volatility at or below this is cheap optionality (+1)
    #[serde(default = "default_cheap_iv")]
    pub cheap_iv: f64,
    /// Implied volatility at or above this is expensive optionality (-1)
    #[serde(default = "default_rich_iv")]
    pub rich_iv: f64,
    /// Gamma at or above this is a convexity opportunity (+1)
    #[serde(default = "default_convexity_gamma")]
    pub convexity_gamma: f64,
    #[serde(default = "default_signal_weight")]
    pub delta_weight: f64,
    #[serde(default = "default_signal_weight")]
    pub iv_weight: f64,
    #[serde(default = "default_signal_weight")]
    pub gamma_weight: f64,
    /// Score strictly beyond this is buy/sell
    #[serde(default = "default_buy_threshold")]
    pub buy_threshold: f64,
    /// Score strictly beyond this is strong buy/strong sell
    #[serde(default = "default_strong_threshold")]
    pub strong_threshold: f64,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            strong_delta: default_strong_delta(),
            weak_delta: default_weak_delta(),
            cheap_iv: default_cheap_iv(),
            rich_iv: default_rich_iv(),
            convexity_gamma: default_convexity_gamma(),
            delta_weight: default_signal_weight(),
            iv_weight: default_signal_weight(),
            gamma_weight: default_signal_weight(),
            buy_threshold: default_buy_threshold(),
            strong_threshold: default_strong_threshold(),
        }
    }
}

/// Normalization of the four portfolio exposures into the 0-100 score
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RiskScoreConfig {
    pub delta: ScoreComponent,
    pub gamma: ScoreComponent,
    pub theta: ScoreComponent,
    pub vega: ScoreComponent,
}

impl Default for RiskScoreConfig {
    fn default() -> Self {
        Self {
            delta: ScoreComponent {
                weight: 0.35,
                cap_ratio: 0.005,
                min_cap: 10.0,
            },
            gamma: ScoreComponent {
                weight: 0.30,
                cap_ratio: 0.00001,
                min_cap: 0.05,
            },
            theta: ScoreComponent {
                weight: 0.15,
                cap_ratio: 40.0,
                min_cap: 5000.0,
            },
            vega: ScoreComponent {
                weight: 0.20,
                cap_ratio: 10.0,
                min_cap: 1000.0,
            },
        }
    }
}

/// One exposure saturates at `max(cap_ratio * portfolio_value, min_cap)`
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ScoreComponent {
    pub weight: f64,
    #[serde(rename = "cap_ratio")]
    pub cap_ratio: f64,
    #[serde(rename = "min_cap")]
    pub min_cap: f64,
}

/// Drawdown shock sizes and hedging rule triggers
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct HedgingConfig {
    /// One-day adverse underlying move as a fraction of spot
    #[serde(default = "default_adverse_move_pct")]
    pub adverse_move_pct: f64,
    /// Underlying level used when the caller supplies none
    #[serde(default = "default_reference_spot")]
    pub reference_spot: f64,
    /// Adverse implied volatility shift, in volatility units (0.05 = 5 points)
    #[serde(default = "default_vol_shock")]
    pub vol_shock: f64,
    /// Share of portfolio value assumed at risk regardless of Greeks
    #[serde(default = "default_value_at_risk_pct")]
    pub value_at_risk_pct: f64,
    #[serde(default = "default_delta_threshold")]
    pub delta_threshold: f64,
    #[serde(default = "default_vega_threshold")]
    pub vega_threshold: f64,
    /// Daily decay (positive money amount) beyond which a theta warning fires
    #[serde(default = "default_theta_per_day_threshold")]
    pub theta_per_day_threshold: f64,
    #[serde(default = "default_risk_score_threshold")]
    pub risk_score_threshold: u8,
}

impl Default for HedgingConfig {
    fn default() -> Self {
        Self {
            adverse_move_pct: default_adverse_move_pct(),
            reference_spot: default_reference_spot(),
            vol_shock: default_vol_shock(),
            value_at_risk_pct: default_value_at_risk_pct(),
            delta_threshold: default_delta_threshold(),
            vega_threshold: default_vega_threshold(),
            theta_per_day_threshold: default_theta_per_day_threshold(),
            risk_score_threshold: default_risk_score_threshold(),
        }
    }
}

/// Liquidity floor applied to trading opportunities
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ScannerConfig {
    #[serde(default = "default_min_volume")]
    pub min_volume: u64,
    #[serde(default = "default_min_open_interest")]
    pub min_open_interest: u64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            min_volume: default_min_volume(),
            min_open_interest: default_min_open_interest(),
        }
    }
}

// ==================================================================================
// DATA SOURCES
// ==================================================================================

/// Where quotes come from. Each variant carries exactly the fields it needs,
/// so a missing field fails at load time rather than on first fetch.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DataSourceConfig {
    /// Seeded synthetic quotes; never real market data
    Synthetic(SyntheticSourceConfig),
    /// Recorded quotes read from a JSON or YAML file on every fetch
    File(FileSourceConfig),
}

impl DataSourceConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            DataSourceConfig::Synthetic(_) => "synthetic",
            DataSourceConfig::File(_) => "file",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SyntheticSourceConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    pub underlyings: Vec<SyntheticUnderlying>,
    #[serde(rename = "days_to_expiry")]
    #[serde(default = "default_days_to_expiry")]
    pub days_to_expiry: f64,
    #[serde(rename = "risk_free_rate")]
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
    /// At-the-money implied volatility around which quotes are drawn
    #[serde(rename = "base_volatility")]
    #[serde(default = "default_base_volatility")]
    pub base_volatility: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct SyntheticUnderlying {
    pub symbol: String,
    pub spot: f64,
    #[serde(rename = "strike_step")]
    pub strike_step: f64,
    #[serde(rename = "strikes_each_side")]
    #[serde(default = "default_strikes_each_side")]
    pub strikes_each_side: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct FileSourceConfig {
    pub path: PathBuf,
}

// ==================================================================================
// MONITOR
// ==================================================================================

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct MonitorConfig {
    #[serde(rename = "refresh_interval_seconds")]
    #[serde(default)]
    pub refresh_interval_seconds: Option<u64>,
    #[serde(rename = "vol_regime")]
    #[serde(default)]
    pub vol_regime: VolRegime,
    #[serde(default)]
    pub holdings: Vec<HoldingConfig>,
}

impl MonitorConfig {
    pub fn refresh_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(
            self.refresh_interval_seconds
                .unwrap_or_else(default_refresh_interval_seconds),
        )
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct HoldingConfig {
    pub symbol: String,
    pub quantity: i64,
}

// ==================================================================================
// OBSERVABILITY
// ==================================================================================

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ObservabilityConfig {
    #[serde(rename = "log_format")]
    #[serde(default = "default_log_format")]
    pub log_format: String,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: default_log_format(),
            metrics: MetricsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct MetricsConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_metrics_port")]
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: default_metrics_port(),
        }
    }
}

// ==================================================================================
// MASTER CONFIG
// ==================================================================================

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MasterConfig {
    pub desk: DeskConfig,
    #[serde(default)]
    pub engine: Option<EngineConfig>,
    #[serde(rename = "data_source")]
    pub data_source: DataSourceConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub observability: Option<ObservabilityConfig>,
}

impl MasterConfig {
    /// Engine policy, falling back to the built-in defaults
    pub fn engine(&self) -> EngineConfig {
        self.engine.clone().unwrap_or_default()
    }

    /// Observability settings, falling back to the built-in defaults
    pub fn observability(&self) -> ObservabilityConfig {
        self.observability.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
desk:
  name: Nifty Desk
  version: 1.0.0
data_source:
  type: synthetic
  underlyings:
    - symbol: NIFTY
      spot: 18000
      strike_step: 50
"#;

    #[test]
    fn test_parse_minimal_config_applies_defaults() {
        let cfg: MasterConfig = serde_yaml::from_str(MINIMAL).unwrap();

        assert_eq!(cfg.desk.name, "Nifty Desk");
        assert!(cfg.engine.is_none());
        assert_eq!(cfg.engine(), EngineConfig::default());
        assert_eq!(cfg.monitor.refresh_interval().as_secs(), 5);
        assert_eq!(cfg.monitor.vol_regime, VolRegime::Stable);
        assert_eq!(cfg.observability().log_format, "pretty");

        match cfg.data_source {
            DataSourceConfig::Synthetic(ref synthetic) => {
                assert_eq!(synthetic.seed, 42);
                assert_eq!(synthetic.underlyings[0].strikes_each_side, 5);
                assert_eq!(synthetic.risk_free_rate, 0.06);
            }
            DataSourceConfig::File(_) => panic!("expected synthetic source"),
        }
    }

    #[test]
    fn test_file_source_requires_path() {
        let yaml = r#"
desk:
  name: Desk
  version: 1.0.0
data_source:
  type: file
"#;
        let err = serde_yaml::from_str::<MasterConfig>(yaml).unwrap_err();
        assert!(err.to_string().contains("path"));
    }

    #[test]
    fn test_unknown_source_type_rejected() {
        let yaml = r#"
desk:
  name: Desk
  version: 1.0.0
data_source:
  type: carrier_pigeon
"#;
        assert!(serde_yaml::from_str::<MasterConfig>(yaml).is_err());
    }

    #[test]
    fn test_partial_engine_section_keeps_other_defaults() {
        let yaml = r#"
desk:
  name: Desk
  version: 1.0.0
engine:
  scanner:
    min_volume: 0
data_source:
  type: file
  path: quotes.json
monitor:
  vol_regime: rising
  holdings:
    - symbol: NIFTY18000CE
      quantity: -50
"#;
        let cfg: MasterConfig = serde_yaml::from_str(yaml).unwrap();
        let engine = cfg.engine();

        assert_eq!(engine.scanner.min_volume, 0);
        assert_eq!(engine.scanner.min_open_interest, 500);
        assert_eq!(engine.risk_bands, RiskBandsConfig::default());
        assert_eq!(cfg.monitor.vol_regime, VolRegime::Rising);
        assert_eq!(cfg.monitor.holdings[0].quantity, -50);
        assert_eq!(cfg.data_source.kind(), "file");
    }
}
