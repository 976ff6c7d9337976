//! Common types used across GreekDesk
//!
//! Every type here is a plain value: cloned, serialized and compared freely.
//! Nothing in this module holds state between engine calls.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Calendar days per year used for per-day conversions of annual figures
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    /// Right to buy the underlying at the strike
    Call,
    /// Right to sell the underlying at the strike
    Put,
}

impl OptionType {
    /// Sign of the payoff slope: +1 for calls, -1 for puts
    pub fn sign(&self) -> f64 {
        match self {
            OptionType::Call => 1.0,
            OptionType::Put => -1.0,
        }
    }
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionType::Call => write!(f, "call"),
            OptionType::Put => write!(f, "put"),
        }
    }
}

impl FromStr for OptionType {
    type Err = Error;

    /// Accepts `call`/`put` as well as the exchange suffixes `CE`/`PE`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "call" | "c" | "ce" => Ok(OptionType::Call),
            "put" | "p" | "pe" => Ok(OptionType::Put),
            _ => Err(Error::unknown_label("option type", s)),
        }
    }
}

/// Inputs for pricing a single European contract
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    /// Spot price of the underlying
    pub spot_price: f64,
    /// Strike price
    pub strike_price: f64,
    /// Time to expiry in years; 0 means the contract is expiring now
    pub time_to_expiry: f64,
    /// Annualized risk-free rate (may be zero or negative)
    pub risk_free_rate: f64,
    /// Annualized volatility as a decimal (0.2 = 20%)
    pub volatility: f64,
    /// Call or put
    pub option_type: OptionType,
}

impl OptionContract {
    /// Intrinsic value at the current spot
    pub fn intrinsic_value(&self) -> f64 {
        match self.option_type {
            OptionType::Call => (self.spot_price - self.strike_price).max(0.0),
            OptionType::Put => (self.strike_price - self.spot_price).max(0.0),
        }
    }
}

/// Theoretical price and first-order sensitivities of one contract.
///
/// Units are fixed at the engine boundary: theta is per year and vega is per
/// 1.00 of volatility. Use [`Greeks::theta_per_day`] and
/// [`Greeks::vega_per_vol_point`] for display figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Theoretical price
    pub price: f64,
    /// Delta: ∂V/∂S
    pub delta: f64,
    /// Gamma: ∂²V/∂S²
    pub gamma: f64,
    /// Theta: ∂V/∂t, per year
    pub theta: f64,
    /// Vega: ∂V/∂σ, per 1.00 of volatility
    pub vega: f64,
    /// Rho: ∂V/∂r
    pub rho: f64,
}

impl Greeks {
    /// Theta expressed per calendar day
    pub fn theta_per_day(&self) -> f64 {
        self.theta / DAYS_PER_YEAR
    }

    /// Vega expressed per one volatility point (1%)
    pub fn vega_per_vol_point(&self) -> f64 {
        self.vega / 100.0
    }
}

/// Discrete risk band, ordered from least to most risky
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
    Extreme,
}

impl RiskLevel {
    /// True for the bands that warrant attention (high and extreme)
    pub fn is_elevated(&self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::Extreme)
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
            RiskLevel::Extreme => write!(f, "extreme"),
        }
    }
}

/// Trade signal for one contract, ordered from most bearish to most bullish
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradingRecommendation {
    StrongSell,
    Sell,
    Hold,
    Buy,
    StrongBuy,
}

impl TradingRecommendation {
    /// Anything other than hold is actionable
    pub fn is_actionable(&self) -> bool {
        !matches!(self, TradingRecommendation::Hold)
    }
}

impl std::fmt::Display for TradingRecommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradingRecommendation::StrongSell => write!(f, "strong_sell"),
            TradingRecommendation::Sell => write!(f, "sell"),
            TradingRecommendation::Hold => write!(f, "hold"),
            TradingRecommendation::Buy => write!(f, "buy"),
            TradingRecommendation::StrongBuy => write!(f, "strong_buy"),
        }
    }
}

/// Direction implied volatility has been moving in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolRegime {
    Falling,
    #[default]
    Stable,
    Rising,
}

impl FromStr for VolRegime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "falling" => Ok(VolRegime::Falling),
            "stable" => Ok(VolRegime::Stable),
            "rising" => Ok(VolRegime::Rising),
            _ => Err(Error::unknown_label("vol regime", s)),
        }
    }
}

/// One priced row of a monitored option universe.
///
/// Rebuilt from scratch every refresh; only `symbol` is stable across ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveOptionSnapshot {
    pub symbol: String,
    pub option_type: OptionType,
    pub strike_price: f64,
    pub spot_price: f64,
    pub last_price: f64,
    pub implied_volatility: f64,
    pub volume: u64,
    pub open_interest: u64,
    pub greeks: Greeks,
    pub risk_level: RiskLevel,
    pub trading_recommendation: TradingRecommendation,
}

/// One quoted contract as delivered by a market-data source.
///
/// Carries everything needed to price the contract and fill a
/// [`LiveOptionSnapshot`]; nothing here is derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    pub symbol: String,
    pub underlying: String,
    pub option_type: OptionType,
    pub strike_price: f64,
    pub spot_price: f64,
    pub last_price: f64,
    pub implied_volatility: f64,
    #[serde(default)]
    pub volume: u64,
    #[serde(default)]
    pub open_interest: u64,
    /// Years until expiry
    pub time_to_expiry: f64,
    pub risk_free_rate: f64,
}

impl OptionQuote {
    /// Pricing inputs, using the quoted implied volatility
    pub fn contract(&self) -> OptionContract {
        OptionContract {
            spot_price: self.spot_price,
            strike_price: self.strike_price,
            time_to_expiry: self.time_to_expiry,
            risk_free_rate: self.risk_free_rate,
            volatility: self.implied_volatility,
            option_type: self.option_type,
        }
    }
}

/// A signed holding of one contract with its per-unit Greeks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioPosition {
    pub symbol: String,
    /// Contract units; positive is long, negative is short
    pub quantity: i64,
    /// Greeks of a single unit
    pub greeks: Greeks,
    /// Price of a single unit
    pub price: f64,
}

/// Portfolio-level exposures, recomputed in full on every evaluation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioGreeksRisk {
    pub total_delta: f64,
    pub total_gamma: f64,
    /// Per year, like the per-unit theta it sums
    pub total_theta: f64,
    pub total_vega: f64,
    pub portfolio_value: f64,
    /// Composite score in `0..=100`
    pub risk_score: u8,
    pub gamma_exposure: RiskLevel,
    /// Money-denominated one-day loss estimate
    pub max_drawdown_risk: f64,
    /// Most urgent first
    pub hedging_recommendations: Vec<String>,
}
