//! The seam between quote providers and the risk monitor

use crate::file::FileMarketData;
use crate::synthetic::SyntheticMarketData;
use crate::Result;
use async_trait::async_trait;
use common::OptionQuote;
use config::DataSourceConfig;
use std::sync::Arc;

/// Anything that can produce the current quote universe
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Short label for logs and reports
    fn name(&self) -> &'static str;

    /// One full snapshot of the quoted universe
    async fn fetch_quotes(&self) -> Result<Vec<OptionQuote>>;
}

/// Build the source a configuration asks for
pub fn build_source(config: &DataSourceConfig) -> Arc<dyn MarketDataSource> {
    match config {
        DataSourceConfig::Synthetic(synthetic) => {
            Arc::new(SyntheticMarketData::new(synthetic.clone()))
        }
        DataSourceConfig::File(file) => Arc::new(FileMarketData::new(file.path.clone())),
    }
}
