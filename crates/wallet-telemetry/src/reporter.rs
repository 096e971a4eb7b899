//! Diagnostics reporting.
//!
//! Modules hand every failure they surface to the user to an
//! [`ErrorReporter`] as well, so crashes in the field can be investigated.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

use crate::metrics::ERRORS_CAPTURED;

/// One captured failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    /// Module that captured the error.
    pub module: String,
    /// Rendered error, including its source chain.
    pub message: String,
    /// Capture time.
    pub captured_at: DateTime<Utc>,
}

/// Sink for diagnostic error reports.
pub trait ErrorReporter: Send + Sync {
    /// Capture an error raised inside `module`.
    fn capture(&self, module: &str, error: &(dyn std::error::Error + 'static));
}

fn render_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Reporter that writes captured errors to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn capture(&self, module: &str, error: &(dyn std::error::Error + 'static)) {
        ERRORS_CAPTURED.with_label_values(&[module]).inc();
        tracing::error!(module = module, error = %render_chain(error), "Captured error");
    }
}

/// Reporter that keeps reports in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    reports: Mutex<Vec<ErrorReport>>,
}

impl MemoryReporter {
    /// Create an empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// All reports captured so far.
    pub fn reports(&self) -> Vec<ErrorReport> {
        self.reports.lock().clone()
    }

    /// Number of reports captured so far.
    pub fn count(&self) -> usize {
        self.reports.lock().len()
    }
}

impl ErrorReporter for MemoryReporter {
    fn capture(&self, module: &str, error: &(dyn std::error::Error + 'static)) {
        ERRORS_CAPTURED.with_label_values(&[module]).inc();
        self.reports.lock().push(ErrorReport {
            module: module.to_string(),
            message: render_chain(error),
            captured_at: Utc::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("outer failure")]
    struct Outer(#[source] Inner);

    #[derive(Debug, Error)]
    #[error("connection refused")]
    struct Inner;

    #[test]
    fn test_memory_reporter_records_chain() {
        let reporter = MemoryReporter::new();
        reporter.capture("transactions", &Outer(Inner));

        let reports = reporter.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].module, "transactions");
        assert_eq!(reports[0].message, "outer failure: connection refused");
    }

    #[test]
    fn test_tracing_reporter_counts() {
        let before = ERRORS_CAPTURED.with_label_values(&["reporter-test"]).get();
        TracingErrorReporter.capture("reporter-test", &Inner);
        let after = ERRORS_CAPTURED.with_label_values(&["reporter-test"]).get();
        assert_eq!(after, before + 1.0);
    }
}
