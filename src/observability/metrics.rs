//! Metrics collection for the Pasis client.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Duration;

/// Metrics collector interface.
pub trait MetricsCollector: Send + Sync {
    /// Records one logical request, after all of its attempts.
    fn record_request(&self, operation: &str, success: bool, duration: Duration);

    /// Records a retry attempt.
    fn record_retry(&self, operation: &str);

    /// Records a token exchange (`authenticate` or `refresh`).
    fn record_token_exchange(&self, exchange: &str, success: bool);

    /// Records an error by kind.
    fn record_error(&self, kind: &str);

    /// Gets current metrics.
    fn get_metrics(&self) -> RequestMetrics;

    /// Resets all metrics.
    fn reset(&self);
}

/// Request metrics snapshot.
#[derive(Debug, Clone, Default)]
pub struct RequestMetrics {
    /// Total logical requests.
    pub total_requests: u64,
    /// Successful requests.
    pub successful_requests: u64,
    /// Failed requests.
    pub failed_requests: u64,
    /// Total latency in milliseconds.
    pub total_latency_ms: u64,
    /// Retry attempts across all requests.
    pub retries: u64,
    /// Failed token exchanges.
    pub failed_token_exchanges: u64,
    /// Requests per operation.
    pub operations: HashMap<String, u64>,
    /// Token exchanges per kind.
    pub token_exchanges: HashMap<String, u64>,
    /// Error counts by kind.
    pub errors: HashMap<String, u64>,
}

impl RequestMetrics {
    /// Calculates average latency in milliseconds.
    pub fn average_latency_ms(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.total_latency_ms as f64 / self.total_requests as f64
        }
    }

    /// Calculates success rate as a percentage.
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            100.0
        } else {
            (self.successful_requests as f64 / self.total_requests as f64) * 100.0
        }
    }
}

/// Default metrics collector implementation.
pub struct DefaultMetricsCollector {
    total_requests: AtomicU64,
    successful_requests: AtomicU64,
    failed_requests: AtomicU64,
    total_latency_ms: AtomicU64,
    retries: AtomicU64,
    failed_token_exchanges: AtomicU64,
    operations: RwLock<HashMap<String, u64>>,
    token_exchanges: RwLock<HashMap<String, u64>>,
    errors: RwLock<HashMap<String, u64>>,
}

impl DefaultMetricsCollector {
    /// Creates a new metrics collector.
    pub fn new() -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            successful_requests: AtomicU64::new(0),
            failed_requests: AtomicU64::new(0),
            total_latency_ms: AtomicU64::new(0),
            retries: AtomicU64::new(0),
            failed_token_exchanges: AtomicU64::new(0),
            operations: RwLock::new(HashMap::new()),
            token_exchanges: RwLock::new(HashMap::new()),
            errors: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for DefaultMetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

fn increment(map: &RwLock<HashMap<String, u64>>, key: &str) {
    if let Ok(mut map) = map.write() {
        *map.entry(key.to_string()).or_insert(0) += 1;
    }
}

fn snapshot(map: &RwLock<HashMap<String, u64>>) -> HashMap<String, u64> {
    map.read().map(|m| m.clone()).unwrap_or_default()
}

fn clear(map: &RwLock<HashMap<String, u64>>) {
    if let Ok(mut map) = map.write() {
        map.clear();
    }
}

impl MetricsCollector for DefaultMetricsCollector {
    fn record_request(&self, operation: &str, success: bool, duration: Duration) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);

        if success {
            self.successful_requests.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_requests.fetch_add(1, Ordering::Relaxed);
        }

        self.total_latency_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);

        increment(&self.operations, operation);
    }

    fn record_retry(&self, _operation: &str) {
        self.retries.fetch_add(1, Ordering::Relaxed);
    }

    fn record_token_exchange(&self, exchange: &str, success: bool) {
        if !success {
            self.failed_token_exchanges.fetch_add(1, Ordering::Relaxed);
        }
        increment(&self.token_exchanges, exchange);
    }

    fn record_error(&self, kind: &str) {
        increment(&self.errors, kind);
    }

    fn get_metrics(&self) -> RequestMetrics {
        RequestMetrics {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            successful_requests: self.successful_requests.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            total_latency_ms: self.total_latency_ms.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            failed_token_exchanges: self.failed_token_exchanges.load(Ordering::Relaxed),
            operations: snapshot(&self.operations),
            token_exchanges: snapshot(&self.token_exchanges),
            errors: snapshot(&self.errors),
        }
    }

    fn reset(&self) {
        self.total_requests.store(0, Ordering::Relaxed);
        self.successful_requests.store(0, Ordering::Relaxed);
        self.failed_requests.store(0, Ordering::Relaxed);
        self.total_latency_ms.store(0, Ordering::Relaxed);
        self.retries.store(0, Ordering::Relaxed);
        self.failed_token_exchanges.store(0, Ordering::Relaxed);

        clear(&self.operations);
        clear(&self.token_exchanges);
        clear(&self.errors);
    }
}

impl std::fmt::Debug for DefaultMetricsCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultMetricsCollector")
            .field("total_requests", &self.total_requests.load(Ordering::Relaxed))
            .field(
                "successful_requests",
                &self.successful_requests.load(Ordering::Relaxed),
            )
            .field("failed_requests", &self.failed_requests.load(Ordering::Relaxed))
            .field("retries", &self.retries.load(Ordering::Relaxed))
            .finish()
    }
}
