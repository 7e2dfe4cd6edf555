// src/metrics.rs

#[cfg(feature = "observability")]
pub use metrics::{describe_counter, increment_counter, Unit};

// NOTE: When observability feature is disabled, provide stub implementations
#[cfg(not(feature = "observability"))]
pub enum Unit {}

#[cfg(not(feature = "observability"))]
#[macro_export]
macro_rules! increment_counter {
    ($name:expr $(, $label:expr => $label_value:expr)* $(,)?) => {};
}

#[cfg(not(feature = "observability"))]
#[macro_export]
macro_rules! describe_counter {
    ($name:expr, $unit:expr, $desc:expr) => {};
    ($name:expr, $desc:expr) => {};
}

#[cfg(not(feature = "observability"))]
use crate::{describe_counter, increment_counter};

/// Initializes the descriptions for all the metrics in the crate.
/// This should be called once at startup.
pub fn describe_metrics() {
    describe_counter!(
        "snapshot_written_total",
        Unit::Count,
        "Snapshots persisted, labeled by entity."
    );
    describe_counter!(
        "contract_call_reverted_total",
        Unit::Count,
        "Contract reads that reverted and were replaced by a field default, labeled by call."
    );
    describe_counter!(
        "snapshot_dispatch_unknown_variant_total",
        Unit::Count,
        "Pool events whose pool type matched no known contract shape."
    );
}

/// Install the Prometheus exporter listening on `addr`.
#[cfg(feature = "observability")]
pub fn install_prometheus_exporter(addr: std::net::SocketAddr) -> anyhow::Result<()> {
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    describe_metrics();
    Ok(())
}

#[allow(unused_variables)]
pub fn increment_snapshot_written(entity: &'static str) {
    increment_counter!("snapshot_written_total", "entity" => entity);
}

#[allow(unused_variables)]
pub fn increment_call_reverted(call: &'static str) {
    increment_counter!("contract_call_reverted_total", "call" => call);
}

pub fn increment_unknown_variant() {
    increment_counter!("snapshot_dispatch_unknown_variant_total");
}
