use crate::*;
use std::collections::HashSet;
use thiserror::Error;

const LOG_FORMATS: [&str; 3] = ["pretty", "json", "compact"];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Desk name is required")]
    MissingDeskName,

    #[error("Invalid version format: {0}. Must be in format X.Y.Z (e.g., 1.0.0)")]
    InvalidVersionFormat(String),

    #[error("Risk band '{band}': {message}")]
    InvalidRiskBand { band: String, message: String },

    #[error("Recommendation: {message}")]
    InvalidRecommendation { message: String },

    #[error("Risk score component '{component}': {message}")]
    InvalidScoreComponent { component: String, message: String },

    #[error("Hedging: {message}")]
    InvalidHedging { message: String },

    #[error("Data source '{kind}': {message}")]
    InvalidDataSource { kind: String, message: String },

    #[error("Holding '{symbol}': {message}")]
    InvalidHolding { symbol: String, message: String },

    #[error("Invalid log format: {0}. Must be one of: pretty, json, compact")]
    InvalidLogFormat(String),

    #[error("{field} must be a positive integer")]
    InvalidPositiveInteger { field: String },

    #[error("{field} must be a positive float")]
    InvalidPositiveFloat { field: String },

    #[error("{field} must be between 0 and 1")]
    InvalidFractionRange { field: String },

    #[error("Environment variable '{var}' is missing or invalid: {message}")]
    InvalidEnvVar { var: String, message: String },
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct DefaultApplied {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub defaults_applied: Vec<DefaultApplied>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            defaults_applied: Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_default(&mut self, field: &str, value: &str) {
        self.defaults_applied.push(DefaultApplied {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

pub fn validate_config(config: &MasterConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    validate_desk(&config.desk, &mut report);

    match &config.engine {
        Some(engine) => validate_engine(engine, &mut report),
        None => report.add_default("engine", "built-in policy"),
    }

    validate_data_source(&config.data_source, &mut report);
    validate_monitor(&config.monitor, &mut report);

    match &config.observability {
        Some(observability) => validate_observability(observability, &mut report),
        None => report.add_default("observability.log_format", &default_log_format()),
    }

    report
}

fn validate_desk(desk: &DeskConfig, report: &mut ValidationReport) {
    if desk.name.trim().is_empty() {
        report.add_error(ValidationError::MissingDeskName);
    }

    if !is_semver(&desk.version) {
        report.add_error(ValidationError::InvalidVersionFormat(desk.version.clone()));
    }

    if desk.description.is_empty() {
        report.add_warning("desk.description", "Description is empty");
    }
}

fn is_semver(version: &str) -> bool {
    let parts: Vec<&str> = version.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn fraction(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

// ==================================================================================
// ENGINE
// ==================================================================================

fn validate_engine(engine: &EngineConfig, report: &mut ValidationReport) {
    validate_risk_bands(&engine.risk_bands, report);
    validate_recommendation(&engine.recommendation, report);
    validate_risk_score(&engine.risk_score, report);
    validate_hedging(&engine.hedging, report);

    if engine.scanner.min_volume == 0 {
        report.add_warning(
            "engine.scanner.min_volume",
            "Zero volume floor lets untraded contracts into opportunities",
        );
    }
    if engine.scanner.min_open_interest == 0 {
        report.add_warning(
            "engine.scanner.min_open_interest",
            "Zero open interest floor lets illiquid contracts into opportunities",
        );
    }
}

fn validate_risk_bands(bands: &RiskBandsConfig, report: &mut ValidationReport) {
    let named = [
        ("extreme", &bands.extreme),
        ("high", &bands.high),
        ("medium", &bands.medium),
    ];

    for (name, band) in named {
        if !positive(band.gamma) {
            report.add_error(ValidationError::InvalidRiskBand {
                band: name.to_string(),
                message: "gamma must be a positive number".to_string(),
            });
        }
        if !positive(band.implied_volatility) {
            report.add_error(ValidationError::InvalidRiskBand {
                band: name.to_string(),
                message: "implied_volatility must be a positive number".to_string(),
            });
        }
        if let Some(theta) = band.theta_per_day {
            if !theta.is_finite() || theta >= 0.0 {
                report.add_error(ValidationError::InvalidRiskBand {
                    band: name.to_string(),
                    message: "theta_per_day must be negative".to_string(),
                });
            }
        }
    }

    // Bands must nest: every breach of a higher band is also a breach of a lower one
    for (upper_name, upper, lower_name, lower) in [
        ("extreme", &bands.extreme, "high", &bands.high),
        ("high", &bands.high, "medium", &bands.medium),
    ] {
        if upper.gamma <= lower.gamma || upper.implied_volatility <= lower.implied_volatility {
            report.add_error(ValidationError::InvalidRiskBand {
                band: upper_name.to_string(),
                message: format!("limits must be stricter than the '{}' band", lower_name),
            });
        }
        if let (Some(upper_theta), Some(lower_theta)) = (upper.theta_per_day, lower.theta_per_day)
        {
            if upper_theta > lower_theta {
                report.add_error(ValidationError::InvalidRiskBand {
                    band: upper_name.to_string(),
                    message: format!(
                        "theta_per_day must not be above the '{}' band",
                        lower_name
                    ),
                });
            }
        }
    }
}

fn validate_recommendation(rec: &RecommendationConfig, report: &mut ValidationReport) {
    if !fraction(rec.weak_delta) || !fraction(rec.strong_delta) || rec.weak_delta >= rec.strong_delta
    {
        report.add_error(ValidationError::InvalidRecommendation {
            message: "weak_delta and strong_delta must satisfy 0 <= weak < strong <= 1".to_string(),
        });
    }

    if !positive(rec.cheap_iv) || !positive(rec.rich_iv) || rec.cheap_iv >= rec.rich_iv {
        report.add_error(ValidationError::InvalidRecommendation {
            message: "cheap_iv must be positive and below rich_iv".to_string(),
        });
    }

    if !positive(rec.convexity_gamma) {
        report.add_error(ValidationError::InvalidPositiveFloat {
            field: "engine.recommendation.convexity_gamma".to_string(),
        });
    }

    for (field, weight) in [
        ("delta_weight", rec.delta_weight),
        ("iv_weight", rec.iv_weight),
        ("gamma_weight", rec.gamma_weight),
    ] {
        if !weight.is_finite() || weight < 0.0 {
            report.add_error(ValidationError::InvalidRecommendation {
                message: format!("{} must be a non-negative number", field),
            });
        }
    }

    if !positive(rec.buy_threshold) || rec.buy_threshold >= rec.strong_threshold {
        report.add_error(ValidationError::InvalidRecommendation {
            message: "thresholds must satisfy 0 < buy_threshold < strong_threshold".to_string(),
        });
    }

    let max_score = rec.delta_weight + rec.iv_weight + rec.gamma_weight;
    if rec.strong_threshold >= max_score {
        report.add_warning(
            "engine.recommendation.strong_threshold",
            "Threshold is unreachable with the configured weights; strong signals never fire",
        );
    }
}

fn validate_risk_score(score: &RiskScoreConfig, report: &mut ValidationReport) {
    let components = [
        ("delta", &score.delta),
        ("gamma", &score.gamma),
        ("theta", &score.theta),
        ("vega", &score.vega),
    ];

    for (name, component) in components {
        if !component.weight.is_finite() || component.weight < 0.0 {
            report.add_error(ValidationError::InvalidScoreComponent {
                component: name.to_string(),
                message: "weight must be a non-negative number".to_string(),
            });
        }
        if !component.cap_ratio.is_finite() || component.cap_ratio < 0.0 {
            report.add_error(ValidationError::InvalidScoreComponent {
                component: name.to_string(),
                message: "cap_ratio must be a non-negative number".to_string(),
            });
        }
        if !positive(component.min_cap) {
            report.add_error(ValidationError::InvalidScoreComponent {
                component: name.to_string(),
                message: "min_cap must be positive".to_string(),
            });
        }
    }

    let total_weight: f64 = components.iter().map(|(_, c)| c.weight).sum();
    if total_weight <= 0.0 {
        report.add_error(ValidationError::InvalidScoreComponent {
            component: "all".to_string(),
            message: "at least one weight must be positive".to_string(),
        });
    }
}

fn validate_hedging(hedging: &HedgingConfig, report: &mut ValidationReport) {
    if !positive(hedging.adverse_move_pct) || hedging.adverse_move_pct >= 1.0 {
        report.add_error(ValidationError::InvalidHedging {
            message: "adverse_move_pct must be in (0, 1)".to_string(),
        });
    }

    if !positive(hedging.reference_spot) {
        report.add_error(ValidationError::InvalidPositiveFloat {
            field: "engine.hedging.reference_spot".to_string(),
        });
    }

    if !hedging.vol_shock.is_finite() || hedging.vol_shock < 0.0 {
        report.add_error(ValidationError::InvalidHedging {
            message: "vol_shock must be a non-negative number".to_string(),
        });
    }

    if !fraction(hedging.value_at_risk_pct) {
        report.add_error(ValidationError::InvalidFractionRange {
            field: "engine.hedging.value_at_risk_pct".to_string(),
        });
    }

    for (field, value) in [
        ("engine.hedging.delta_threshold", hedging.delta_threshold),
        ("engine.hedging.vega_threshold", hedging.vega_threshold),
        (
            "engine.hedging.theta_per_day_threshold",
            hedging.theta_per_day_threshold,
        ),
    ] {
        if !positive(value) {
            report.add_error(ValidationError::InvalidPositiveFloat {
                field: field.to_string(),
            });
        }
    }

    if hedging.risk_score_threshold > 100 {
        report.add_error(ValidationError::InvalidHedging {
            message: format!(
                "risk_score_threshold must be at most 100, got {}",
                hedging.risk_score_threshold
            ),
        });
    }
}

// ==================================================================================
// DATA SOURCE
// ==================================================================================

fn validate_data_source(source: &DataSourceConfig, report: &mut ValidationReport) {
    match source {
        DataSourceConfig::Synthetic(synthetic) => validate_synthetic(synthetic, report),
        DataSourceConfig::File(file) => validate_file_source(file, report),
    }
}

fn validate_synthetic(synthetic: &SyntheticSourceConfig, report: &mut ValidationReport) {
    let invalid = |message: String| ValidationError::InvalidDataSource {
        kind: "synthetic".to_string(),
        message,
    };

    if synthetic.underlyings.is_empty() {
        report.add_error(invalid("at least one underlying is required".to_string()));
    }

    let mut seen = HashSet::new();
    for underlying in &synthetic.underlyings {
        if underlying.symbol.trim().is_empty() {
            report.add_error(invalid("underlying symbol is required".to_string()));
        } else if !seen.insert(underlying.symbol.as_str()) {
            report.add_error(invalid(format!(
                "duplicate underlying '{}'",
                underlying.symbol
            )));
        }

        if !positive(underlying.spot) {
            report.add_error(invalid(format!(
                "underlying '{}' spot must be positive",
                underlying.symbol
            )));
        }

        if !positive(underlying.strike_step) {
            report.add_error(invalid(format!(
                "underlying '{}' strike_step must be positive",
                underlying.symbol
            )));
        } else if underlying.spot - underlying.strike_step * underlying.strikes_each_side as f64
            <= 0.0
        {
            report.add_error(invalid(format!(
                "underlying '{}' strike ladder reaches zero or below",
                underlying.symbol
            )));
        }
    }

    if !positive(synthetic.days_to_expiry) {
        report.add_error(ValidationError::InvalidPositiveFloat {
            field: "data_source.days_to_expiry".to_string(),
        });
    }

    if !synthetic.risk_free_rate.is_finite() {
        report.add_error(invalid("risk_free_rate must be finite".to_string()));
    }

    if !positive(synthetic.base_volatility) {
        report.add_error(ValidationError::InvalidPositiveFloat {
            field: "data_source.base_volatility".to_string(),
        });
    }
}

fn validate_file_source(file: &FileSourceConfig, report: &mut ValidationReport) {
    let path = file.path.to_string_lossy();

    if path.trim().is_empty() {
        report.add_error(ValidationError::InvalidDataSource {
            kind: "file".to_string(),
            message: "path is required".to_string(),
        });
        return;
    }

    if has_unresolved_env_vars(&path) {
        report.add_error(ValidationError::InvalidEnvVar {
            var: path.to_string(),
            message: "quote file path still contains a placeholder".to_string(),
        });
        return;
    }

    if !file.path.exists() {
        report.add_warning(
            "data_source.path",
            "Quote file does not exist yet; fetches fail until it is written",
        );
    }
}

// ==================================================================================
// MONITOR / OBSERVABILITY
// ==================================================================================

fn validate_monitor(monitor: &MonitorConfig, report: &mut ValidationReport) {
    match monitor.refresh_interval_seconds {
        None => report.add_default(
            "monitor.refresh_interval_seconds",
            &default_refresh_interval_seconds().to_string(),
        ),
        Some(0) => report.add_error(ValidationError::InvalidPositiveInteger {
            field: "monitor.refresh_interval_seconds".to_string(),
        }),
        Some(1) => report.add_warning(
            "monitor.refresh_interval_seconds",
            "One-second refresh reprices the whole universe every second",
        ),
        Some(_) => {}
    }

    if monitor.holdings.is_empty() {
        report.add_warning(
            "monitor.holdings",
            "No holdings configured; portfolio risk will be empty",
        );
    }

    let mut seen = HashSet::new();
    for holding in &monitor.holdings {
        if holding.symbol.trim().is_empty() {
            report.add_error(ValidationError::InvalidHolding {
                symbol: holding.symbol.clone(),
                message: "symbol is required".to_string(),
            });
            continue;
        }
        if !seen.insert(holding.symbol.as_str()) {
            report.add_error(ValidationError::InvalidHolding {
                symbol: holding.symbol.clone(),
                message: "listed more than once; combine the quantities".to_string(),
            });
        }
        if holding.quantity == 0 {
            report.add_warning(
                &format!("monitor.holdings.{}", holding.symbol),
                "Zero quantity contributes nothing",
            );
        }
    }
}

fn validate_observability(observability: &ObservabilityConfig, report: &mut ValidationReport) {
    if !LOG_FORMATS.contains(&observability.log_format.to_lowercase().as_str()) {
        report.add_error(ValidationError::InvalidLogFormat(
            observability.log_format.clone(),
        ));
    }

    if observability.metrics.enabled && observability.metrics.port == 0 {
        report.add_error(ValidationError::InvalidPositiveInteger {
            field: "observability.metrics.port".to_string(),
        });
    }
}
