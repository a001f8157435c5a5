//! Internal metrics collection.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// A counter metric.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_by(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Collected metrics for the intake engine.
#[derive(Debug, Default)]
pub struct Metrics {
    // Submission metrics
    pub submissions_received: Counter,
    pub submissions_rejected: Counter,
    pub records_appended: Counter,

    // Analytics metrics
    pub pageviews_tracked: Counter,
    pub events_tracked: Counter,

    // Store metrics
    pub store_lock_retries: Counter,
    pub store_write_errors: Counter,
    pub store_corrupt_reads: Counter,

    // Boundary metrics
    pub rate_limited_requests: Counter,
    pub admin_auth_failures: Counter,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            submissions_received: self.submissions_received.get(),
            submissions_rejected: self.submissions_rejected.get(),
            records_appended: self.records_appended.get(),
            pageviews_tracked: self.pageviews_tracked.get(),
            events_tracked: self.events_tracked.get(),
            store_lock_retries: self.store_lock_retries.get(),
            store_write_errors: self.store_write_errors.get(),
            store_corrupt_reads: self.store_corrupt_reads.get(),
            rate_limited_requests: self.rate_limited_requests.get(),
            admin_auth_failures: self.admin_auth_failures.get(),
        }
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub submissions_received: u64,
    pub submissions_rejected: u64,
    pub records_appended: u64,
    pub pageviews_tracked: u64,
    pub events_tracked: u64,
    pub store_lock_retries: u64,
    pub store_write_errors: u64,
    pub store_corrupt_reads: u64,
    pub rate_limited_requests: u64,
    pub admin_auth_failures: u64,
}

/// Global metrics registry.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}
