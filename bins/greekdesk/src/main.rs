//! GreekDesk command line
//!
//! Prices single contracts, evaluates portfolio files and runs the live risk
//! monitor against the configured quote source.

mod report;
mod shutdown;

use anyhow::{Context, Result};
use cli::{Cli, Commands, OptionKind, RegimeArg};
use common::{OptionContract, PortfolioPosition, DAYS_PER_YEAR};
use config::{generate_default_config, load_config, save_config, validate_config, MasterConfig};
use market_data::{build_source, Holding, RiskMonitor};
use observability::{init_logging, init_metrics, EngineMetrics, LogFormat};
use report::PriceReport;
use risk_engine::{ContractInputs, MarketContext, RiskEngine};
use shutdown::ShutdownController;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let log_format = match cli.log_format {
        Some(arg) => LogFormat::parse(arg.as_str()).unwrap_or_default(),
        None => cli
            .command
            .config_path()
            .and_then(configured_log_format)
            .unwrap_or_default(),
    };
    init_logging("greekdesk", log_format)?;
    debug!(?cli, "CLI arguments parsed");

    match cli.command {
        Commands::Price {
            spot,
            strike,
            days,
            rate,
            vol,
            option_type,
            json,
        } => price_command(spot, strike, days, rate, vol, option_type, json),
        Commands::Evaluate {
            config,
            portfolio,
            vol_regime,
            spot,
            json,
        } => evaluate_command(config, portfolio, vol_regime, spot, json).await,
        Commands::Watch {
            config,
            ticks,
            interval_seconds,
            json,
        } => watch_command(config, ticks, interval_seconds, json).await,
        Commands::Validate { config } => {
            info!("Executing 'validate' command");
            validate_command(config).await
        }
        Commands::Init { output } => {
            info!("Executing 'init' command");
            init_command(output).await
        }
    }
}

/// Log format named in the config file, if it loads and names a known one
fn configured_log_format(path: &Path) -> Option<LogFormat> {
    if !path.exists() {
        return None;
    }
    let config = load_config(path).ok()?;
    LogFormat::parse(&config.observability().log_format)
}

/// Load the config and refuse to continue on validation errors
fn load_validated(config_path: &Path) -> Result<MasterConfig> {
    let config = load_config(config_path)?;
    let report = validate_config(&config);

    for warning in &report.warnings {
        warn!(field = %warning.field, message = %warning.message, "Configuration warning");
    }

    if !report.is_valid() {
        error!(
            error_count = report.errors.len(),
            "Configuration validation failed"
        );
        for err in &report.errors {
            error!("{}", err);
        }
        anyhow::bail!(
            "Configuration has errors, run 'greekdesk validate --config {:?}' for details",
            config_path
        );
    }

    Ok(config)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn price_command(
    spot: f64,
    strike: f64,
    days: f64,
    rate: f64,
    vol: f64,
    option_type: OptionKind,
    json: bool,
) -> Result<()> {
    let contract = OptionContract {
        spot_price: spot,
        strike_price: strike,
        time_to_expiry: days / DAYS_PER_YEAR,
        risk_free_rate: rate,
        volatility: vol,
        option_type: option_type.into(),
    };

    let engine = RiskEngine::default();
    let greeks = engine.price(&contract)?;
    let (risk_level, recommendation) = engine.classify(&ContractInputs {
        greeks,
        implied_volatility: vol,
    });

    info!(
        option_type = %contract.option_type,
        spot,
        strike,
        price = greeks.price,
        %risk_level,
        "Contract priced"
    );

    let report = PriceReport::new(contract, greeks, risk_level, recommendation);
    if json {
        print_json(&report)
    } else {
        report::print_price(&report);
        Ok(())
    }
}

/// Positions from a JSON or YAML file, picked by extension
fn read_positions(path: &Path) -> Result<Vec<PortfolioPosition>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read portfolio file: {:?}", path))?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let positions = match extension.as_deref() {
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse portfolio JSON: {:?}", path))?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse portfolio YAML: {:?}", path))?,
        _ => anyhow::bail!("Portfolio file must be .json, .yaml or .yml: {:?}", path),
    };
    Ok(positions)
}

async fn evaluate_command<P: AsRef<Path>>(
    config_path: P,
    portfolio_path: P,
    vol_regime: Option<RegimeArg>,
    spot: Option<f64>,
    json: bool,
) -> Result<()> {
    let config = load_validated(config_path.as_ref())?;
    let positions = read_positions(portfolio_path.as_ref())?;

    let regime = vol_regime
        .map(Into::into)
        .unwrap_or(config.monitor.vol_regime);
    let mut context = MarketContext::new(regime);
    context.underlying_price = spot;

    let engine = RiskEngine::new(config.engine());
    let risk = engine
        .evaluate_portfolio(&positions, &context)
        .with_context(|| format!("Invalid portfolio file: {:?}", portfolio_path.as_ref()))?;

    info!(
        positions = positions.len(),
        risk_score = risk.risk_score,
        hedges = risk.hedging_recommendations.len(),
        "Portfolio evaluated"
    );

    if json {
        print_json(&risk)
    } else {
        report::print_portfolio(&risk);
        Ok(())
    }
}

async fn watch_command<P: AsRef<Path>>(
    config_path: P,
    max_ticks: Option<u64>,
    interval_override: Option<u64>,
    json: bool,
) -> Result<()> {
    let config = load_validated(config_path.as_ref())?;
    let obs = config.observability();

    let source = build_source(&config.data_source);
    let engine = Arc::new(RiskEngine::new(config.engine()));
    let holdings = config.monitor.holdings.iter().map(Holding::from).collect();

    let mut monitor = RiskMonitor::new(source, engine, holdings, config.monitor.vol_regime);
    if obs.metrics.enabled {
        init_metrics(obs.metrics.port)?;
        monitor = monitor.with_metrics(EngineMetrics::new(&config.desk.name));
    }
    let monitor = Arc::new(monitor);

    let interval = interval_override
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.monitor.refresh_interval());

    info!(
        desk = %config.desk.name,
        source = config.data_source.kind(),
        interval_secs = interval.as_secs(),
        holdings = config.monitor.holdings.len(),
        "Starting risk monitor"
    );

    let controller = ShutdownController::with_ctrl_c();
    let token = controller.child_token();
    let mut reports = monitor.subscribe();

    let task = tokio::spawn({
        let monitor = Arc::clone(&monitor);
        let token = controller.child_token();
        async move { monitor.run(interval, token).await }
    });

    let mut seen = 0u64;
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            received = reports.recv() => match received {
                Ok(tick) => {
                    if json {
                        println!("{}", serde_json::to_string(tick.as_ref())?);
                    } else {
                        report::print_tick(&tick);
                    }
                    seen += 1;
                    if max_ticks.is_some_and(|max| seen >= max) {
                        info!(ticks = seen, "Tick limit reached");
                        controller.shutdown();
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Output fell behind, ticks dropped");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    if !controller.is_cancelled() {
        controller.shutdown();
    }
    task.await.context("Risk monitor task failed")?;
    info!(ticks = seen, "Risk monitor stopped");
    Ok(())
}

async fn validate_command<P: AsRef<Path>>(config_path: P) -> Result<()> {
    info!(path = ?config_path.as_ref(), "Validating configuration");

    let config = match load_config(&config_path) {
        Ok(c) => c,
        Err(e) => {
            error!(%e, "Failed to load configuration");
            anyhow::bail!(e);
        }
    };

    let report = validate_config(&config);

    println!("\n=== Configuration Validation Report ===\n");

    if !report.defaults_applied.is_empty() {
        println!("Defaults Applied ({}):", report.defaults_applied.len());
        for default in &report.defaults_applied {
            println!("  [info] {} = {}", default.field, default.value);
        }
        println!();
    }

    if !report.warnings.is_empty() {
        println!("Warnings ({}):", report.warnings.len());
        for warning in &report.warnings {
            println!("  [warn] [{}] {}", warning.field, warning.message);
        }
        println!();
    }

    if !report.errors.is_empty() {
        println!("Errors ({}):", report.errors.len());
        for err in &report.errors {
            println!("  [error] {}", err);
        }
        println!();
        anyhow::bail!("Configuration validation failed");
    }

    println!("[ok] Configuration is valid!");
    println!();
    println!("Desk: {}", config.desk.name);
    println!("Version: {}", config.desk.version);
    println!("Data source: {}", config.data_source.kind());
    println!("Holdings: {}", config.monitor.holdings.len());
    println!(
        "Refresh interval: {}s",
        config.monitor.refresh_interval().as_secs()
    );

    Ok(())
}

async fn init_command<P: AsRef<Path>>(output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    info!(?output_path, "Initializing new configuration file");

    let config = generate_default_config();

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    save_config(&config, output_path)?;

    println!("[ok] Configuration file created successfully!");
    println!();
    println!("Location: {:?}", output_path);
    println!();
    println!("This configuration includes:");
    println!("  - Desk metadata (name, description, version)");
    println!("  - Engine thresholds (risk bands, signals, risk score, hedging, scanner)");
    println!("  - A seeded synthetic source for NIFTY and BANKNIFTY");
    println!("  - A two-leg sample book");
    println!();
    println!("Next steps:");
    println!("  1. Edit the holdings and thresholds to match your book");
    println!(
        "  2. Run 'greekdesk validate --config {:?}' to check configuration",
        output_path
    );
    println!(
        "  3. Run 'greekdesk watch --config {:?}' to start the monitor",
        output_path
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_positions_yaml() {
        let file = write_temp(
            ".yaml",
            r#"
- symbol: NIFTY18000CE
  quantity: 50
  price: 250.0
  greeks: { price: 250.0, delta: 0.52, gamma: 0.0008, theta: -4900.0, vega: 1186.0, rho: 250.0 }
- symbol: NIFTY17900PE
  quantity: -50
  price: 120.0
  greeks: { price: 120.0, delta: -0.35, gamma: 0.0007, theta: -4000.0, vega: 1000.0, rho: -150.0 }
"#,
        );

        let positions = read_positions(file.path()).unwrap();
        assert_eq!(positions.len(), 2);
        assert_eq!(positions[1].quantity, -50);
        assert_eq!(positions[0].greeks.delta, 0.52);
    }

    #[test]
    fn test_read_positions_rejects_unknown_extension() {
        let file = write_temp(".txt", "[]");
        assert!(read_positions(file.path()).is_err());
    }

    #[test]
    fn test_configured_log_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("desk.yaml");
        let mut config = generate_default_config();
        if let Some(obs) = config.observability.as_mut() {
            obs.log_format = "json".to_string();
        }
        save_config(&config, &path).unwrap();

        assert_eq!(configured_log_format(&path), Some(LogFormat::Json));
        assert_eq!(configured_log_format(&dir.path().join("missing.yaml")), None);
    }

    #[tokio::test]
    async fn test_evaluate_surfaces_invalid_position() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("greekdesk.yaml");
        save_config(&generate_default_config(), &config_path).unwrap();

        let portfolio = write_temp(
            ".json",
            r#"[{"symbol": "NIFTY18000CE", "quantity": 10, "price": -50.0,
                "greeks": {"price": 250.0, "delta": 0.5, "gamma": 0.0008,
                           "theta": -4900.0, "vega": 1186.0, "rho": 250.0}}]"#,
        );

        let err = evaluate_command(
            config_path.as_path(),
            portfolio.path(),
            None,
            None,
            true,
        )
        .await
        .unwrap_err();
        assert!(format!("{:#}", err).contains("price"));
    }

    #[tokio::test]
    async fn test_init_then_validate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("greekdesk.yaml");

        init_command(&path).await.unwrap();
        assert!(path.exists());
        validate_command(&path).await.unwrap();
        assert!(load_validated(&path).is_ok());
    }
}
