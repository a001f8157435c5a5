//! Common test setup functions.

use std::sync::Arc;

use api::middleware::rate_limit::RateLimitConfig;
use api::{router, AppState};
use axum::Router;
use store::{FileStore, MemoryStore, RecordStore};
use tempfile::TempDir;

use crate::fixtures;

/// Rate limit budget generous enough that only the dedicated rate-limit
/// test can exhaust it.
fn test_rate_config() -> RateLimitConfig {
    RateLimitConfig {
        rate: 1000,
        burst: 1000,
    }
}

/// Test context over the production code paths: the real router with the
/// real middleware stack, backed by a `FileStore` in a temp directory.
pub struct TestContext {
    /// Keeps the data directory alive for the duration of the test.
    pub data_dir: TempDir,
    pub store: Arc<FileStore>,
    pub router: Router,
}

impl TestContext {
    pub async fn new() -> Self {
        let data_dir = TempDir::new().expect("Failed to create temp dir");
        let store = Arc::new(
            FileStore::open(data_dir.path())
                .await
                .expect("Failed to open file store"),
        );
        telemetry::health().store.set_healthy();

        let state = AppState::with_rate_limit(
            store.clone() as Arc<dyn RecordStore>,
            Some(fixtures::admin_token()),
            test_rate_config(),
        );

        Self {
            data_dir,
            store: store.clone(),
            router: router(state),
        }
    }

    /// Same router, but rejecting after `burst` requests from one client.
    pub async fn with_burst(burst: u32) -> Self {
        let data_dir = TempDir::new().expect("Failed to create temp dir");
        let store = Arc::new(
            FileStore::open(data_dir.path())
                .await
                .expect("Failed to open file store"),
        );
        telemetry::health().store.set_healthy();

        let state = AppState::with_rate_limit(
            store.clone() as Arc<dyn RecordStore>,
            Some(fixtures::admin_token()),
            RateLimitConfig { rate: 1, burst },
        );

        Self {
            data_dir,
            store,
            router: router(state),
        }
    }
}

/// Context over a `MemoryStore`, for failure injection.
pub struct MemoryContext {
    pub store: Arc<MemoryStore>,
    pub router: Router,
}

impl MemoryContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::with_rate_limit(
            store.clone() as Arc<dyn RecordStore>,
            Some(fixtures::admin_token()),
            test_rate_config(),
        );

        Self {
            store: store.clone(),
            router: router(state),
        }
    }
}

impl Default for MemoryContext {
    fn default() -> Self {
        Self::new()
    }
}
