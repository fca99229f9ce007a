//! Observability module for the Pasis client.
//!
//! Provides `tracing` subscriber setup, log redaction, and request metrics.

mod logging;
mod metrics;

pub use logging::{init_tracing, redact, LogConfig, LogFormat, LogLevel};
pub use metrics::{DefaultMetricsCollector, MetricsCollector, RequestMetrics};
