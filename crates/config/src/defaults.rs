// Recommendation signal

pub fn default_strong_delta() -> f64 {
    0.7
}

pub fn default_weak_delta() -> f64 {
    0.2
}

pub fn default_cheap_iv() -> f64 {
    0.15
}

pub fn default_rich_iv() -> f64 {
    0.30
}

pub fn default_convexity_gamma() -> f64 {
    0.015
}

pub fn default_signal_weight() -> f64 {
    1.0
}

pub fn default_buy_threshold() -> f64 {
    0.5
}

pub fn default_strong_threshold() -> f64 {
    1.5
}

// Hedging and drawdown

pub fn default_adverse_move_pct() -> f64 {
    0.02
}

pub fn default_reference_spot() -> f64 {
    18000.0
}

pub fn default_vol_shock() -> f64 {
    0.05
}

pub fn default_value_at_risk_pct() -> f64 {
    0.05
}

pub fn default_delta_threshold() -> f64 {
    50.0
}

pub fn default_vega_threshold() -> f64 {
    5000.0
}

pub fn default_theta_per_day_threshold() -> f64 {
    2000.0
}

pub fn default_risk_score_threshold() -> u8 {
    80
}

// Scanner

pub fn default_min_volume() -> u64 {
    100
}

pub fn default_min_open_interest() -> u64 {
    500
}

// Synthetic data source

pub fn default_seed() -> u64 {
    42
}

pub fn default_days_to_expiry() -> f64 {
    7.0
}

pub fn default_risk_free_rate() -> f64 {
    0.06
}

pub fn default_base_volatility() -> f64 {
    0.18
}

pub fn default_strikes_each_side() -> u32 {
    5
}

// Monitor and observability

pub fn default_refresh_interval_seconds() -> u64 {
    5
}

pub fn default_log_format() -> String {
    "pretty".to_string()
}

pub fn default_metrics_port() -> u16 {
    9090
}
