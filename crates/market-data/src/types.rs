use chrono::{DateTime, Utc};
use common::OptionQuote;
use config::HoldingConfig;
use serde::{Deserialize, Serialize};

/// A signed quantity of one contract, identified by symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,
    pub quantity: i64,
}

impl Holding {
    pub fn new(symbol: impl Into<String>, quantity: i64) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
        }
    }
}

impl From<&HoldingConfig> for Holding {
    fn from(cfg: &HoldingConfig) -> Self {
        Self::new(cfg.symbol.clone(), cfg.quantity)
    }
}

/// On-disk layout of a recorded quote snapshot.
///
/// Either a bare list of quotes or an object with a `quotes` list and an
/// optional capture time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuoteFile {
    Recorded {
        #[serde(default)]
        captured_at: Option<DateTime<Utc>>,
        quotes: Vec<OptionQuote>,
    },
    Bare(Vec<OptionQuote>),
}

impl QuoteFile {
    pub fn into_quotes(self) -> Vec<OptionQuote> {
        match self {
            QuoteFile::Recorded { quotes, .. } => quotes,
            QuoteFile::Bare(quotes) => quotes,
        }
    }
}
