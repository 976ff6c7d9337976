//! Recorded quotes read from disk on every fetch

use crate::error::MarketDataError;
use crate::source::MarketDataSource;
use crate::types::QuoteFile;
use crate::Result;
use async_trait::async_trait;
use common::OptionQuote;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

/// Re-reads the file each fetch, so an external recorder can keep it current
pub struct FileMarketData {
    path: PathBuf,
}

impl FileMarketData {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn format(&self) -> Result<Format> {
        match self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Ok(Format::Json),
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            _ => Err(MarketDataError::UnsupportedFormat(self.path.clone())),
        }
    }

    fn parse(&self, content: &str, format: Format) -> Result<Vec<OptionQuote>> {
        let parsed: std::result::Result<QuoteFile, String> = match format {
            Format::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            Format::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        };
        parsed
            .map(QuoteFile::into_quotes)
            .map_err(|message| MarketDataError::Parse {
                path: self.path.clone(),
                message,
            })
    }
}

#[async_trait]
impl MarketDataSource for FileMarketData {
    fn name(&self) -> &'static str {
        "file"
    }

    #[instrument(skip(self), fields(path = ?self.path))]
    async fn fetch_quotes(&self) -> Result<Vec<OptionQuote>> {
        let format = self.format()?;
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| MarketDataError::Io {
                path: self.path.clone(),
                source,
            })?;

        let quotes = self.parse(&content, format)?;
        debug!(quotes = quotes.len(), "Loaded recorded quotes");
        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use common::OptionType;
    use std::io::Write;

    const JSON_QUOTES: &str = r#"[
        {
            "symbol": "NIFTY18000CE",
            "underlying": "NIFTY",
            "option_type": "call",
            "strike_price": 18000.0,
            "spot_price": 18025.5,
            "last_price": 240.0,
            "implied_volatility": 0.19,
            "volume": 15000,
            "open_interest": 120000,
            "time_to_expiry": 0.0274,
            "risk_free_rate": 0.06
        }
    ]"#;

    const YAML_QUOTES: &str = r#"
captured_at: 2024-03-01T09:30:00Z
quotes:
  - symbol: NIFTY17900PE
    underlying: NIFTY
    option_type: put
    strike_price: 17900
    spot_price: 18025.5
    last_price: 85.5
    implied_volatility: 0.21
    time_to_expiry: 0.0274
    risk_free_rate: 0.06
"#;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_reads_bare_json_list() {
        let file = write_temp(".json", JSON_QUOTES);
        let quotes = FileMarketData::new(file.path()).fetch_quotes().await.unwrap();

        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].option_type, OptionType::Call);
        assert_eq!(quotes[0].open_interest, 120_000);
    }

    #[tokio::test]
    async fn test_reads_recorded_yaml_with_defaults() {
        let file = write_temp(".yaml", YAML_QUOTES);
        let quotes = FileMarketData::new(file.path()).fetch_quotes().await.unwrap();

        assert_eq!(quotes[0].symbol, "NIFTY17900PE");
        assert_eq!(quotes[0].volume, 0);
        assert_eq!(quotes[0].strike_price, 17900.0);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let source = FileMarketData::new("/no/such/dir/quotes.json");
        assert_matches!(source.fetch_quotes().await, Err(MarketDataError::Io { .. }));
    }

    #[tokio::test]
    async fn test_unknown_extension_rejected() {
        let file = write_temp(".csv", "symbol,strike");
        let source = FileMarketData::new(file.path());
        assert_matches!(
            source.fetch_quotes().await,
            Err(MarketDataError::UnsupportedFormat(_))
        );
    }

    #[tokio::test]
    async fn test_malformed_content_is_parse_error() {
        let file = write_temp(".json", "{\"quotes\": 42}");
        let source = FileMarketData::new(file.path());
        assert_matches!(source.fetch_quotes().await, Err(MarketDataError::Parse { .. }));
    }
}
