//! # Wallet Telemetry
//!
//! Observability for the wallet core.
//!
//! ## Components
//!
//! - **Logs**: `tracing` subscriber with env filter, pretty or JSON output
//! - **Metrics**: Prometheus counters for fetches, lookups and captured errors
//! - **Diagnostics**: [`ErrorReporter`] receives every failure a module
//!   surfaces to the user
//!
//! ## Usage
//!
//! ```rust,ignore
//! use wallet_telemetry::{TelemetryConfig, init_telemetry};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     let _guard = init_telemetry(config).expect("Failed to init telemetry");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `wallet-core` | Service name in logs |
//! | `WALLET_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `WALLET_JSON_LOGS` | `false` | JSON formatted logs |
//! | `WALLET_CONSOLE_OUTPUT` | `true` | Write logs to stderr |
//! | `WALLET_NETWORK` | `testnet` | Network label |

#![warn(missing_docs)]

mod config;
mod logging;
pub mod metrics;
mod reporter;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{
    encode_metrics, register_metrics, MetricsHandle, BLOCK_CACHE_HITS, DEPOSITS_SUBMITTED,
    ERRORS_CAPTURED, FETCHES, HEIGHT_LOOKUPS,
};
pub use reporter::{ErrorReport, ErrorReporter, MemoryReporter, TracingErrorReporter};
pub use tracing_setup::TracingGuard;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The tracing subscriber could not be installed.
    #[error("Failed to initialize tracing: {0}")]
    TracerInit(String),

    /// Prometheus registration failed.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// A configuration value was unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and metrics.
///
/// Returns a guard that must be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics_handle = register_metrics()?;
    let tracing_guard = tracing_setup::init_tracing(&config)?;

    Ok(TelemetryGuard {
        _tracing: tracing_guard,
        _metrics: metrics_handle,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _tracing: TracingGuard,
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::debug!("Shutting down telemetry");
    }
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_service_name() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "wallet-core");
    }

    #[test]
    fn test_metric_inc_macro() {
        let before = HEIGHT_LOOKUPS.get();
        metric_inc!(HEIGHT_LOOKUPS);
        assert!(HEIGHT_LOOKUPS.get() >= before + 1.0);

        metric_inc!(FETCHES, &["transactions", "loaded"]);
        assert!(FETCHES.with_label_values(&["transactions", "loaded"]).get() >= 1.0);
    }
}
