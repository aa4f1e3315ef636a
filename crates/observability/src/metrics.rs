//! Prometheus metrics for the chain refresh loop

use metrics::{counter, gauge, histogram, Counter, Gauge, Histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

/// Start the Prometheus exporter on `0.0.0.0:<port>/metrics`.
///
/// Must be called from inside a tokio runtime.
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    tracing::info!(%addr, "Metrics server listening");
    Ok(())
}

/// Metrics recorded by a chain service.
///
/// * `chain_refresh_total` - Chains regenerated (ticks and selections)
/// * `chain_generation_duration_seconds` - Time to build one chain
/// * `chain_ignored_selections_total` - Selections of unknown symbols/expiries
/// * `chain_spot_price` - Latest spot per symbol
/// * `chain_rows` - Rows in the latest chain
#[derive(Clone)]
pub struct ChainMetrics {
    refresh_total: Counter,
    generation_duration: Histogram,
    ignored_selections: Counter,
    rows: Gauge,
    spot_price: fn(&str) -> Gauge,
    source: String,
}

impl ChainMetrics {
    /// `source` labels every series (e.g. "worker", "snapshot").
    pub fn new(source: &str) -> Self {
        let name = source.to_string();

        Self {
            refresh_total: counter!("chain_refresh_total", "source" => name.clone()),
            generation_duration: histogram!(
                "chain_generation_duration_seconds",
                "source" => name.clone()
            ),
            ignored_selections: counter!(
                "chain_ignored_selections_total",
                "source" => name.clone()
            ),
            rows: gauge!("chain_rows", "source" => name.clone()),
            spot_price: |symbol| gauge!("chain_spot_price", "symbol" => symbol.to_string()),
            source: name,
        }
    }

    /// Record a regenerated chain.
    pub fn record_refresh(&self, symbol: &str, spot: f64, rows: usize, duration: Duration) {
        self.refresh_total.increment(1);
        self.generation_duration.record(duration.as_secs_f64());
        self.rows.set(rows as f64);
        (self.spot_price)(symbol).set(spot);
    }

    pub fn record_ignored_selection(&self) {
        self.ignored_selections.increment(1);
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl std::fmt::Debug for ChainMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainMetrics")
            .field("source", &self.source)
            .finish()
    }
}
