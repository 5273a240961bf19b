//! Prometheus metrics

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

/// Latency metric types
#[derive(Debug, Clone, Copy)]
pub enum LatencyMetric {
    /// Any read against the backend REST API
    BackendRequest,
    /// Purchase POST round trip
    PurchaseSubmission,
}

/// Counter metric types
#[derive(Debug, Clone, Copy)]
pub enum CounterMetric {
    /// Update events applied to a feed snapshot
    FeedUpdates,
    /// Update events dropped because they did not parse
    FeedRejectedUpdates,
    /// Bulk reads that replaced a snapshot
    FeedResyncs,
    /// Orders accepted by the backend
    PurchasesSucceeded,
    /// Orders rejected by the backend or failed in transit
    PurchasesFailed,
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Items currently in the feed snapshot
    SnapshotSize,
}

fn latency_name(metric: LatencyMetric) -> &'static str {
    match metric {
        LatencyMetric::BackendRequest => "tradinghub_http_request_latency_ms",
        LatencyMetric::PurchaseSubmission => "tradinghub_purchase_submission_latency_ms",
    }
}

fn counter_name(metric: CounterMetric) -> &'static str {
    match metric {
        CounterMetric::FeedUpdates => "tradinghub_feed_updates_total",
        CounterMetric::FeedRejectedUpdates => "tradinghub_feed_rejected_updates_total",
        CounterMetric::FeedResyncs => "tradinghub_feed_resyncs_total",
        CounterMetric::PurchasesSucceeded => "tradinghub_purchases_succeeded_total",
        CounterMetric::PurchasesFailed => "tradinghub_purchases_failed_total",
    }
}

fn gauge_name(metric: GaugeMetric) -> &'static str {
    match metric {
        GaugeMetric::SnapshotSize => "tradinghub_feed_snapshot_size",
    }
}

/// Record a latency measurement
pub fn record_latency(metric: LatencyMetric, duration: Duration) {
    let name = latency_name(metric);
    let value_ms = duration.as_secs_f64() * 1000.0;
    metrics::histogram!(name).record(value_ms);
    tracing::trace!(metric = name, value_ms, "Recording latency");
}

/// Increment a counter by one
pub fn increment(metric: CounterMetric) {
    metrics::counter!(counter_name(metric)).increment(1);
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    metrics::gauge!(gauge_name(metric)).set(value);
}

/// Serve metrics for Prometheus scraping on `0.0.0.0:{port}`
pub fn install_exporter(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to start metrics exporter: {}", e))?;
    tracing::info!(%addr, "Prometheus exporter listening");
    Ok(())
}
