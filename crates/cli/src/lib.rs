use clap::{Parser, Subcommand, ValueEnum};
use common::{OptionType, VolRegime};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG: &str = "greekdesk.yaml";

#[derive(Parser, Debug)]
#[command(name = "greekdesk")]
#[command(about = "GreekDesk - options Greeks and portfolio risk")]
#[command(version)]
pub struct Cli {
    /// Log output format; falls back to the config file, then pretty
    #[arg(long, global = true, value_enum, env = "GREEKDESK_LOG_FORMAT")]
    pub log_format: Option<LogFormatArg>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Price one European option and show its Greeks
    Price {
        /// Underlying spot price
        #[arg(long)]
        spot: f64,

        /// Strike price
        #[arg(long)]
        strike: f64,

        /// Calendar days to expiry (0 = expiring now)
        #[arg(long)]
        days: f64,

        /// Annualized risk-free rate as a decimal
        #[arg(long, default_value_t = 0.06)]
        rate: f64,

        /// Annualized volatility as a decimal (0.2 = 20%)
        #[arg(long)]
        vol: f64,

        #[arg(long = "type", value_enum, default_value = "call")]
        option_type: OptionKind,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Risk report for a portfolio file of priced positions
    Evaluate {
        /// Path to the configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        /// JSON or YAML list of positions (symbol, quantity, greeks, price)
        #[arg(short, long)]
        portfolio: PathBuf,

        /// Implied volatility direction; defaults to the configured regime
        #[arg(long, value_enum)]
        vol_regime: Option<RegimeArg>,

        /// Underlying level for the drawdown estimate
        #[arg(long)]
        spot: Option<f64>,

        #[arg(long)]
        json: bool,
    },

    /// Run the live monitor and print every tick
    Watch {
        /// Path to the configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        /// Stop after this many ticks (runs until Ctrl+C otherwise)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        ticks: Option<u64>,

        /// Override the configured refresh interval
        #[arg(long)]
        interval_seconds: Option<u64>,

        /// Print each tick as one JSON line
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration without running anything
    Validate {
        /// Path to the configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },

    /// Initialize a new configuration file with all defaults
    Init {
        /// Output path for the new configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG)]
        output: PathBuf,
    },
}

impl Commands {
    /// The configuration file this command reads, if any
    pub fn config_path(&self) -> Option<&Path> {
        match self {
            Commands::Evaluate { config, .. }
            | Commands::Watch { config, .. }
            | Commands::Validate { config } => Some(config),
            Commands::Price { .. } | Commands::Init { .. } => None,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionKind {
    Call,
    Put,
}

impl From<OptionKind> for OptionType {
    fn from(kind: OptionKind) -> Self {
        match kind {
            OptionKind::Call => OptionType::Call,
            OptionKind::Put => OptionType::Put,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegimeArg {
    Falling,
    Stable,
    Rising,
}

impl From<RegimeArg> for VolRegime {
    fn from(regime: RegimeArg) -> Self {
        match regime {
            RegimeArg::Falling => VolRegime::Falling,
            RegimeArg::Stable => VolRegime::Stable,
            RegimeArg::Rising => VolRegime::Rising,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormatArg {
    Pretty,
    Json,
    Compact,
}

impl LogFormatArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormatArg::Pretty => "pretty",
            LogFormatArg::Json => "json",
            LogFormatArg::Compact => "compact",
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
