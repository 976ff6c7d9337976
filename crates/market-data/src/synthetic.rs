//! Seeded synthetic quotes.
//!
//! Not market data: a reproducible stand-in for demos and tests. Each
//! underlying gets a fixed call/put strike ladder around its starting spot;
//! every fetch moves the spot a little, redraws the volatility smile and marks
//! last prices at model value plus noise.

use crate::source::MarketDataSource;
use crate::Result;
use async_trait::async_trait;
use common::{OptionContract, OptionQuote, OptionType, DAYS_PER_YEAR};
use config::SyntheticSourceConfig;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Largest per-fetch relative spot move
const SPOT_STEP: f64 = 0.002;
/// Smile curvature in ln-moneyness
const SMILE_CURVATURE: f64 = 0.8;
/// Extra volatility per unit of downside ln-moneyness
const PUT_SKEW: f64 = 0.1;
const IV_NOISE: f64 = 0.01;
const IV_FLOOR: f64 = 0.05;
/// Largest relative gap between last price and model value
const PRICE_NOISE: f64 = 0.02;
const MAX_VOLUME: u64 = 5_000;
const MAX_OPEN_INTEREST: u64 = 60_000;

struct Ladder {
    underlying: String,
    spot: f64,
    strikes: Vec<f64>,
}

struct State {
    rng: StdRng,
    ladders: Vec<Ladder>,
}

pub struct SyntheticMarketData {
    config: SyntheticSourceConfig,
    state: Mutex<State>,
}

impl SyntheticMarketData {
    pub fn new(config: SyntheticSourceConfig) -> Self {
        let ladders = config
            .underlyings
            .iter()
            .map(|u| {
                let atm = (u.spot / u.strike_step).round() * u.strike_step;
                let side = i64::from(u.strikes_each_side);
                let strikes = (-side..=side)
                    .map(|i| atm + i as f64 * u.strike_step)
                    .filter(|k| *k > 0.0)
                    .collect();
                Ladder {
                    underlying: u.symbol.clone(),
                    spot: u.spot,
                    strikes,
                }
            })
            .collect();

        Self {
            state: Mutex::new(State {
                rng: StdRng::seed_from_u64(config.seed),
                ladders,
            }),
            config,
        }
    }

    /// Exchange-style symbol, e.g. `NIFTY18000CE`
    pub fn symbol(underlying: &str, strike: f64, option_type: OptionType) -> String {
        let suffix = match option_type {
            OptionType::Call => "CE",
            OptionType::Put => "PE",
        };
        format!("{}{}{}", underlying, strike.round() as i64, suffix)
    }

    fn implied_volatility(&self, rng: &mut StdRng, spot: f64, strike: f64) -> f64 {
        let m = (strike / spot).ln();
        let skew = if m < 0.0 { -m * PUT_SKEW } else { 0.0 };
        let iv = self.config.base_volatility
            + SMILE_CURVATURE * m * m
            + skew
            + rng.gen_range(-IV_NOISE..=IV_NOISE);
        iv.max(IV_FLOOR)
    }

    fn generate(&self) -> Vec<OptionQuote> {
        let mut guard = self.state.lock();
        let State { rng, ladders } = &mut *guard;
        let time_to_expiry = self.config.days_to_expiry / DAYS_PER_YEAR;
        let mut quotes = Vec::new();

        for ladder in ladders.iter_mut() {
            ladder.spot *= 1.0 + rng.gen_range(-SPOT_STEP..=SPOT_STEP);

            for &strike in &ladder.strikes {
                for option_type in [OptionType::Call, OptionType::Put] {
                    let iv = self.implied_volatility(rng, ladder.spot, strike);
                    let contract = OptionContract {
                        spot_price: ladder.spot,
                        strike_price: strike,
                        time_to_expiry,
                        risk_free_rate: self.config.risk_free_rate,
                        volatility: iv,
                        option_type,
                    };
                    // Validated config keeps every input in range; skip anything that is not
                    let Ok(model) = pricing::price_and_greeks(&contract) else {
                        continue;
                    };
                    let noise = 1.0 + rng.gen_range(-PRICE_NOISE..=PRICE_NOISE);

                    quotes.push(OptionQuote {
                        symbol: Self::symbol(&ladder.underlying, strike, option_type),
                        underlying: ladder.underlying.clone(),
                        option_type,
                        strike_price: strike,
                        spot_price: ladder.spot,
                        last_price: (model.price * noise).max(0.05),
                        implied_volatility: iv,
                        volume: rng.gen_range(0..=MAX_VOLUME),
                        open_interest: rng.gen_range(0..=MAX_OPEN_INTEREST),
                        time_to_expiry,
                        risk_free_rate: self.config.risk_free_rate,
                    });
                }
            }
        }

        quotes
    }
}

#[async_trait]
impl MarketDataSource for SyntheticMarketData {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    async fn fetch_quotes(&self) -> Result<Vec<OptionQuote>> {
        let quotes = self.generate();
        debug!(quotes = quotes.len(), "Generated synthetic quotes");
        Ok(quotes)
    }
}
