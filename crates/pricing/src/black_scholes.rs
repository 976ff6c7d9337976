use crate::error::PricingError;
use crate::Result;
use common::{Greeks, OptionContract, OptionType};
use std::f64::consts::PI;

/// Standard normal probability density
pub fn norm_pdf(x: f64) -> f64 {
    (1.0 / (2.0 * PI).sqrt()) * (-0.5 * x * x).exp()
}

/// Standard normal cumulative distribution.
///
/// Abramowitz & Stegun 26.2.17, absolute error below 7.5e-8. Evaluated on
/// `|x|` and reflected, so the tails are symmetric.
pub fn norm_cdf(x: f64) -> f64 {
    let k = 1.0 / (1.0 + 0.2316419 * x.abs());
    let poly = k * (0.319381530
        + k * (-0.356563782
        + k * (1.781477937
        + k * (-1.821255978
        + k * 1.330274429))));

    let approx = 1.0 - norm_pdf(x) * poly;

    if x >= 0.0 {
        approx
    } else {
        1.0 - approx
    }
}

/// `d1` and `d2` for a contract with strictly positive `σ√T`
pub fn d1_d2(contract: &OptionContract) -> (f64, f64) {
    let s = contract.spot_price;
    let k = contract.strike_price;
    let t = contract.time_to_expiry;
    let v = contract.volatility;
    let r = contract.risk_free_rate;

    let vol_sqrt_t = v * t.sqrt();
    let d1 = ((s / k).ln() + (r + 0.5 * v * v) * t) / vol_sqrt_t;
    let d2 = d1 - vol_sqrt_t;

    (d1, d2)
}

/// Reject contracts the closed form cannot price
pub fn validate_contract(contract: &OptionContract) -> Result<()> {
    let checks = [
        ("spot_price", contract.spot_price),
        ("strike_price", contract.strike_price),
        ("time_to_expiry", contract.time_to_expiry),
        ("risk_free_rate", contract.risk_free_rate),
        ("volatility", contract.volatility),
    ];
    for (field, value) in checks {
        if !value.is_finite() {
            return Err(PricingError::invalid(field, value, "must be finite"));
        }
    }

    if contract.spot_price <= 0.0 {
        return Err(PricingError::invalid(
            "spot_price",
            contract.spot_price,
            "must be positive",
        ));
    }
    if contract.strike_price <= 0.0 {
        return Err(PricingError::invalid(
            "strike_price",
            contract.strike_price,
            "must be positive",
        ));
    }
    if contract.time_to_expiry < 0.0 {
        return Err(PricingError::invalid(
            "time_to_expiry",
            contract.time_to_expiry,
            "must not be negative",
        ));
    }
    if contract.volatility < 0.0 {
        return Err(PricingError::invalid(
            "volatility",
            contract.volatility,
            "must not be negative",
        ));
    }

    Ok(())
}

/// Theoretical price and Greeks of one European contract.
///
/// Fails only on invalid input. At expiry or with zero volatility the
/// contract is worth its intrinsic value and only delta is non-zero.
pub fn price_and_greeks(contract: &OptionContract) -> Result<Greeks> {
    validate_contract(contract)?;

    let sqrt_t = contract.time_to_expiry.sqrt();
    let vol_sqrt_t = contract.volatility * sqrt_t;
    if vol_sqrt_t == 0.0 {
        return Ok(intrinsic_greeks(contract));
    }

    let (d1, d2) = d1_d2(contract);
    let s = contract.spot_price;
    let k = contract.strike_price;
    let t = contract.time_to_expiry;
    let v = contract.volatility;
    let r = contract.risk_free_rate;

    let pdf = norm_pdf(d1);
    let discounted_strike = k * (-r * t).exp();

    let gamma = pdf / (s * vol_sqrt_t);
    let vega = s * pdf * sqrt_t;
    let decay = -(s * pdf * v) / (2.0 * sqrt_t);

    let greeks = match contract.option_type {
        OptionType::Call => {
            let nd1 = norm_cdf(d1);
            let nd2 = norm_cdf(d2);
            Greeks {
                price: (s * nd1 - discounted_strike * nd2).max(0.0),
                delta: nd1,
                gamma,
                theta: decay - r * discounted_strike * nd2,
                vega,
                rho: discounted_strike * t * nd2,
            }
        }
        OptionType::Put => {
            let n_minus_d1 = norm_cdf(-d1);
            let n_minus_d2 = norm_cdf(-d2);
            Greeks {
                price: (discounted_strike * n_minus_d2 - s * n_minus_d1).max(0.0),
                delta: norm_cdf(d1) - 1.0,
                gamma,
                theta: decay + r * discounted_strike * n_minus_d2,
                vega,
                rho: -discounted_strike * t * n_minus_d2,
            }
        }
    };

    Ok(greeks)
}

fn intrinsic_greeks(contract: &OptionContract) -> Greeks {
    let moneyness = contract.spot_price - contract.strike_price;
    let delta = if moneyness == 0.0 {
        0.5
    } else if moneyness * contract.option_type.sign() > 0.0 {
        1.0
    } else {
        0.0
    };

    Greeks {
        price: contract.intrinsic_value(),
        delta: delta * contract.option_type.sign(),
        ..Greeks::default()
    }
}
