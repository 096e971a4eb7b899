//! Prometheus metrics for the wallet core.
//!
//! Naming convention: `wallet_<area>_<metric>_<unit>`.

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Encoder, Opts, Registry, TextEncoder};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Fetch actions by module and outcome
    pub static ref FETCHES: CounterVec = CounterVec::new(
        Opts::new("wallet_fetches_total", "Fetch actions by module and outcome"),
        &["module", "outcome"]  // outcome: loaded/skipped/superseded/failed
    ).expect("metric creation failed");

    /// Block metadata lookups sent to the node
    pub static ref HEIGHT_LOOKUPS: Counter = Counter::new(
        "wallet_history_height_lookups_total",
        "Block metadata lookups issued for transaction times"
    ).expect("metric creation failed");

    /// Block metadata lookups answered from cache
    pub static ref BLOCK_CACHE_HITS: Counter = Counter::new(
        "wallet_history_block_cache_hits_total",
        "Block metadata lookups answered from the local cache"
    ).expect("metric creation failed");

    /// Deposit transactions accepted by the node
    pub static ref DEPOSITS_SUBMITTED: Counter = Counter::new(
        "wallet_deposits_submitted_total",
        "Deposit transactions accepted by the node"
    ).expect("metric creation failed");

    /// Errors handed to the diagnostics reporter
    pub static ref ERRORS_CAPTURED: CounterVec = CounterVec::new(
        Opts::new("wallet_errors_captured_total", "Errors captured by module"),
        &["module"]
    ).expect("metric creation failed");
}

/// Handle on the registry the metrics were registered with.
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
///
/// Registering twice is not an error.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(FETCHES.clone()),
        Box::new(HEIGHT_LOOKUPS.clone()),
        Box::new(BLOCK_CACHE_HITS.clone()),
        Box::new(DEPOSITS_SUBMITTED.clone()),
        Box::new(ERRORS_CAPTURED.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_twice() {
        assert!(register_metrics().is_ok());
        assert!(register_metrics().is_ok());
    }

    #[test]
    fn test_encode_contains_registered_metric() {
        register_metrics().unwrap();
        DEPOSITS_SUBMITTED.inc();
        let text = encode_metrics().unwrap();
        assert!(text.contains("wallet_deposits_submitted_total"));
    }

    #[test]
    fn test_counter_vec_labels() {
        ERRORS_CAPTURED.with_label_values(&["deposits"]).inc();
        assert!(ERRORS_CAPTURED.with_label_values(&["deposits"]).get() >= 1.0);
    }
}
