//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use intake_core::IdGenerator;
use store::RecordStore;

use crate::middleware::rate_limit::{RateLimitConfig, RateLimiter, SharedRateLimiter};

/// Stale rate-limit buckets older than this are dropped by the cleanup task.
const RATE_BUCKET_MAX_AGE: Duration = Duration::from_secs(600);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Record store (file-backed in production, in-memory in tests)
    pub store: Arc<dyn RecordStore>,
    /// Id source for new records
    pub ids: Arc<IdGenerator>,
    /// Token the admin endpoints are gated on; `None` disables them
    pub admin_token: Option<String>,
    /// Per-client-IP rate limiter for public write endpoints
    pub rate_limiter: SharedRateLimiter,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, admin_token: Option<String>) -> Self {
        Self {
            store,
            ids: Arc::new(IdGenerator::new()),
            admin_token,
            rate_limiter: Arc::new(RateLimiter::new(RateLimitConfig::default())),
        }
    }

    /// Create with custom rate limit config.
    pub fn with_rate_limit(
        store: Arc<dyn RecordStore>,
        admin_token: Option<String>,
        rate_config: RateLimitConfig,
    ) -> Self {
        Self {
            store,
            ids: Arc::new(IdGenerator::new()),
            admin_token,
            rate_limiter: Arc::new(RateLimiter::new(rate_config)),
        }
    }

    /// Start the rate limiter cleanup background task.
    /// Returns a handle that can be used to cancel the task.
    pub fn start_rate_limiter_cleanup(&self) -> tokio::task::JoinHandle<()> {
        let rate_limiter = self.rate_limiter.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(300));
            loop {
                interval.tick().await;
                rate_limiter.cleanup(RATE_BUCKET_MAX_AGE);
            }
        })
    }
}
