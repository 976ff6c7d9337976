use crate::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

#[instrument(skip(path))]
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<MasterConfig> {
    let path = path.as_ref();
    info!("Loading configuration from: {:?}", path);

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    debug!("Config file content length: {} bytes", content.len());

    let substituted = substitution::substitute_env_vars(&content)?;
    debug!("Environment variable substitution completed");

    let config: MasterConfig = serde_yaml::from_str(&substituted)
        .with_context(|| "Failed to parse YAML configuration")?;

    info!(
        desk = %config.desk.name,
        data_source = config.data_source.kind(),
        holdings = config.monitor.holdings.len(),
        "Configuration loaded successfully"
    );
    Ok(config)
}

/// A runnable starting point: a synthetic NIFTY ladder with a small book
#[instrument]
pub fn generate_default_config() -> MasterConfig {
    MasterConfig {
        desk: DeskConfig {
            name: "My Options Desk".to_string(),
            description: "Index options Greeks and portfolio risk".to_string(),
            version: "1.0.0".to_string(),
        },
        engine: Some(EngineConfig::default()),
        data_source: DataSourceConfig::Synthetic(SyntheticSourceConfig {
            seed: default_seed(),
            underlyings: vec![
                SyntheticUnderlying {
                    symbol: "NIFTY".to_string(),
                    spot: 18000.0,
                    strike_step: 50.0,
                    strikes_each_side: default_strikes_each_side(),
                },
                SyntheticUnderlying {
                    symbol: "BANKNIFTY".to_string(),
                    spot: 42000.0,
                    strike_step: 100.0,
                    strikes_each_side: default_strikes_each_side(),
                },
            ],
            days_to_expiry: default_days_to_expiry(),
            risk_free_rate: default_risk_free_rate(),
            base_volatility: default_base_volatility(),
        }),
        monitor: MonitorConfig {
            refresh_interval_seconds: Some(default_refresh_interval_seconds()),
            vol_regime: common::VolRegime::Stable,
            holdings: vec![
                HoldingConfig {
                    symbol: "NIFTY18000CE".to_string(),
                    quantity: 50,
                },
                HoldingConfig {
                    symbol: "NIFTY17900PE".to_string(),
                    quantity: -50,
                },
            ],
        },
        observability: Some(ObservabilityConfig::default()),
    }
}

#[instrument]
pub fn save_config<P: AsRef<Path> + std::fmt::Debug>(config: &MasterConfig, path: P) -> Result<()> {
    let path = path.as_ref();
    info!("Saving configuration to: {:?}", path);

    let yaml = serde_yaml::to_string(config)
        .with_context(|| "Failed to serialize configuration to YAML")?;

    fs::write(path, yaml)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    info!("Configuration saved successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_generated_config_survives_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("greekdesk.yaml");

        let generated = generate_default_config();
        save_config(&generated, &path).unwrap();
        let loaded = load_config(&path).unwrap();

        assert_eq!(loaded.desk.name, generated.desk.name);
        assert_eq!(loaded.engine(), EngineConfig::default());
        assert_eq!(loaded.data_source, generated.data_source);
        assert_eq!(loaded.monitor, generated.monitor);
    }

    #[test]
    fn test_load_substitutes_env_vars() {
        std::env::set_var("GREEKDESK_PARSER_TEST_PATH", "/tmp/quotes.yaml");
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "desk:\n  name: Desk\n  version: 1.0.0\ndata_source:\n  type: file\n  path: ${{GREEKDESK_PARSER_TEST_PATH}}\n"
        )
        .unwrap();

        let cfg = load_config(file.path()).unwrap();
        match cfg.data_source {
            DataSourceConfig::File(file_cfg) => {
                assert_eq!(file_cfg.path, std::path::PathBuf::from("/tmp/quotes.yaml"))
            }
            other => panic!("unexpected source {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_config("/definitely/not/here.yaml").unwrap_err();
        assert!(format!("{:#}", err).contains("/definitely/not/here.yaml"));
    }

    #[test]
    fn test_malformed_yaml_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "desk: [unterminated").unwrap();
        assert!(load_config(file.path()).is_err());
    }
}
