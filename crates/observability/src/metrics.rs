//! Prometheus metrics
//!
//! Exporter setup plus the metric set the risk monitor records on every tick.

use metrics::{counter, gauge, histogram, Counter, Gauge, Histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus exporter; metrics are served at `/metrics` on `port`
///
/// ```ignore
/// observability::metrics::init_metrics(9090)?;
/// ```
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    tracing::info!(%addr, "Metrics server listening");
    Ok(())
}

/// Metrics for one monitored desk
///
/// * `greekdesk_contracts_priced_total` - quotes turned into snapshots
/// * `greekdesk_pricing_rejections_total` - quotes that failed validation
/// * `greekdesk_ticks_total` / `greekdesk_tick_failures_total` - refresh outcomes
/// * `greekdesk_tick_duration_seconds` - refresh latency
/// * `greekdesk_portfolio_risk_score`, `greekdesk_portfolio_max_drawdown` - latest book risk
/// * `greekdesk_high_risk_contracts`, `greekdesk_opportunities` - latest scan sizes
///
/// Recording without an installed exporter is a no-op.
#[derive(Clone)]
pub struct EngineMetrics {
    contracts_priced: Counter,
    pricing_rejections: Counter,
    ticks: Counter,
    tick_failures: Counter,
    tick_duration: Histogram,
    risk_score: Gauge,
    max_drawdown: Gauge,
    high_risk_contracts: Gauge,
    opportunities: Gauge,
    desk: String,
}

impl EngineMetrics {
    pub fn new(desk: &str) -> Self {
        let name = desk.to_string();

        Self {
            contracts_priced: counter!("greekdesk_contracts_priced_total", "desk" => name.clone()),
            pricing_rejections: counter!("greekdesk_pricing_rejections_total", "desk" => name.clone()),
            ticks: counter!("greekdesk_ticks_total", "desk" => name.clone()),
            tick_failures: counter!("greekdesk_tick_failures_total", "desk" => name.clone()),
            tick_duration: histogram!("greekdesk_tick_duration_seconds", "desk" => name.clone()),
            risk_score: gauge!("greekdesk_portfolio_risk_score", "desk" => name.clone()),
            max_drawdown: gauge!("greekdesk_portfolio_max_drawdown", "desk" => name.clone()),
            high_risk_contracts: gauge!("greekdesk_high_risk_contracts", "desk" => name.clone()),
            opportunities: gauge!("greekdesk_opportunities", "desk" => name.clone()),
            desk: name,
        }
    }

    pub fn record_universe(&self, priced: usize, rejected: usize) {
        self.contracts_priced.increment(priced as u64);
        self.pricing_rejections.increment(rejected as u64);
    }

    pub fn record_portfolio(&self, risk_score: u8, max_drawdown: f64) {
        self.risk_score.set(f64::from(risk_score));
        self.max_drawdown.set(max_drawdown);
    }

    pub fn record_scan(&self, high_risk: usize, opportunities: usize) {
        self.high_risk_contracts.set(high_risk as f64);
        self.opportunities.set(opportunities as f64);
    }

    /// Start timing a refresh; see [`TickTimer`]
    pub fn start_tick(&self) -> TickTimer<'_> {
        TickTimer::new(self)
    }

    pub fn desk(&self) -> &str {
        &self.desk
    }
}

/// Records tick duration and outcome when dropped.
///
/// A timer dropped without [`TickTimer::succeed`] counts as a failed tick.
///
/// ```ignore
/// let timer = metrics.start_tick();
/// let report = refresh().await?;   // early return counts as a failure
/// timer.succeed();
/// ```
pub struct TickTimer<'a> {
    metrics: &'a EngineMetrics,
    start: Instant,
    succeeded: bool,
}

impl<'a> TickTimer<'a> {
    pub fn new(metrics: &'a EngineMetrics) -> Self {
        Self {
            metrics,
            start: Instant::now(),
            succeeded: false,
        }
    }

    pub fn succeed(mut self) {
        self.succeeded = true;
    }
}

impl Drop for TickTimer<'_> {
    fn drop(&mut self) {
        self.metrics
            .tick_duration
            .record(self.start.elapsed().as_secs_f64());
        if self.succeeded {
            self.metrics.ticks.increment(1);
        } else {
            self.metrics.tick_failures.increment(1);
        }
    }
}
