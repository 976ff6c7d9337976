//! Periodic refresh loop: fetch, price, evaluate, publish

use crate::positions::build_positions;
use crate::source::MarketDataSource;
use crate::types::Holding;
use crate::Result;
use chrono::{DateTime, Utc};
use common::{LiveOptionSnapshot, PortfolioGreeksRisk, VolRegime};
use observability::EngineMetrics;
use parking_lot::RwLock;
use risk_engine::{MarketContext, RejectedQuote, RiskEngine, ScanResult};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

const EVENT_CAPACITY: usize = 64;

/// Everything one refresh produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick_id: Uuid,
    /// Monotonic per monitor, starting at 1
    pub sequence: u64,
    pub as_of: DateTime<Utc>,
    pub source: String,
    pub vol_regime: VolRegime,
    pub snapshots: Vec<LiveOptionSnapshot>,
    pub rejected: Vec<RejectedQuote>,
    pub scan: ScanResult,
    pub portfolio: PortfolioGreeksRisk,
    /// Holdings with no quote this tick
    pub missing_holdings: Vec<String>,
}

/// Owns a quote source and the current book, and publishes a [`TickReport`]
/// to subscribers after every refresh.
pub struct RiskMonitor {
    source: Arc<dyn MarketDataSource>,
    engine: Arc<RiskEngine>,
    holdings: RwLock<Vec<Holding>>,
    vol_regime: RwLock<VolRegime>,
    events: broadcast::Sender<Arc<TickReport>>,
    metrics: Option<EngineMetrics>,
    sequence: AtomicU64,
}

impl RiskMonitor {
    pub fn new(
        source: Arc<dyn MarketDataSource>,
        engine: Arc<RiskEngine>,
        holdings: Vec<Holding>,
        vol_regime: VolRegime,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            source,
            engine,
            holdings: RwLock::new(holdings),
            vol_regime: RwLock::new(vol_regime),
            events,
            metrics: None,
            sequence: AtomicU64::new(0),
        }
    }

    pub fn with_metrics(mut self, metrics: EngineMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Receives every report published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<TickReport>> {
        self.events.subscribe()
    }

    pub fn holdings(&self) -> Vec<Holding> {
        self.holdings.read().clone()
    }

    /// Replaces the book used from the next refresh on
    pub fn set_holdings(&self, holdings: Vec<Holding>) {
        info!(holdings = holdings.len(), "Holdings replaced");
        *self.holdings.write() = holdings;
    }

    pub fn vol_regime(&self) -> VolRegime {
        *self.vol_regime.read()
    }

    pub fn set_vol_regime(&self, regime: VolRegime) {
        info!(?regime, "Vol regime updated");
        *self.vol_regime.write() = regime;
    }

    /// Run one fetch-price-evaluate cycle and publish the result
    #[instrument(skip(self), fields(source = self.source.name()))]
    pub async fn refresh(&self) -> Result<Arc<TickReport>> {
        let timer = self.metrics.as_ref().map(EngineMetrics::start_tick);

        let quotes = self.source.fetch_quotes().await?;
        let universe = self.engine.snapshot_universe(&quotes);

        let holdings = self.holdings();
        let vol_regime = self.vol_regime();
        let book = build_positions(&holdings, &universe.snapshots);

        let mut context = MarketContext::new(vol_regime);
        context.underlying_price = book.common_spot(&universe.snapshots);

        let portfolio = self.engine.evaluate_portfolio(&book.positions, &context)?;
        let scan = self.engine.scan(&universe.snapshots);

        if let Some(metrics) = &self.metrics {
            metrics.record_universe(universe.snapshots.len(), universe.rejected.len());
            metrics.record_portfolio(portfolio.risk_score, portfolio.max_drawdown_risk);
            metrics.record_scan(scan.high_risk.len(), scan.opportunities.len());
        }

        let report = Arc::new(TickReport {
            tick_id: Uuid::new_v4(),
            sequence: self.sequence.fetch_add(1, Ordering::Relaxed) + 1,
            as_of: Utc::now(),
            source: self.source.name().to_string(),
            vol_regime,
            snapshots: universe.snapshots,
            rejected: universe.rejected,
            scan,
            portfolio,
            missing_holdings: book.missing,
        });

        info!(
            sequence = report.sequence,
            contracts = report.snapshots.len(),
            rejected = report.rejected.len(),
            high_risk = report.scan.high_risk.len(),
            opportunities = report.scan.opportunities.len(),
            risk_score = report.portfolio.risk_score,
            "Tick complete"
        );

        // No subscribers is fine
        let _ = self.events.send(Arc::clone(&report));

        if let Some(timer) = timer {
            timer.succeed();
        }
        Ok(report)
    }

    /// Refresh on `interval` until `shutdown` is cancelled.
    ///
    /// A failed refresh is logged and the loop carries on with the next tick.
    pub async fn run(&self, interval: Duration, shutdown: CancellationToken) {
        info!(interval_ms = interval.as_millis() as u64, "Risk monitor started");

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Risk monitor stopping");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.refresh().await {
                        warn!(error = %e, "Refresh failed");
                    }
                }
            }
        }

        debug!(
            ticks = self.sequence.load(Ordering::Relaxed),
            "Risk monitor stopped"
        );
    }
}
