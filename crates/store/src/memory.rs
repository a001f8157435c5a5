//! In-memory store implementation.
//!
//! Satisfies the same [`RecordStore`] contract as [`FileStore`](crate::FileStore)
//! so tests, and deployments that do not need durability, can swap it in
//! without touching the HTTP layer.

use std::collections::HashMap;

use async_trait::async_trait;
use intake_core::{AnalyticsDoc, Collection, Record};
use parking_lot::Mutex;

use crate::error::{Result, StoreError};
use crate::{AnalyticsUpdate, RecordStore};

#[derive(Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<Collection, Vec<Record>>>,
    analytics: Mutex<AnalyticsDoc>,
    /// Simulate write failures in error-path tests.
    should_fail: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail, for error-path testing.
    pub fn set_should_fail(&self, fail: bool) {
        *self.should_fail.lock() = fail;
    }

    pub fn record_count(&self, collection: Collection) -> usize {
        self.collections
            .lock()
            .get(&collection)
            .map(Vec::len)
            .unwrap_or(0)
    }

    fn check_failure(&self) -> Result<()> {
        if *self.should_fail.lock() {
            return Err(StoreError::Internal("simulated store failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn read_all(&self, collection: Collection) -> Result<Vec<Record>> {
        Ok(self
            .collections
            .lock()
            .get(&collection)
            .cloned()
            .unwrap_or_default())
    }

    async fn append(&self, collection: Collection, record: Record) -> Result<()> {
        self.check_failure()?;
        self.collections
            .lock()
            .entry(collection)
            .or_default()
            .push(record);
        Ok(())
    }

    async fn read_analytics(&self) -> Result<AnalyticsDoc> {
        Ok(self.analytics.lock().clone())
    }

    async fn mutate_analytics(&self, update: AnalyticsUpdate) -> Result<()> {
        self.check_failure()?;
        let mut analytics = self.analytics.lock();
        let next = update(std::mem::take(&mut *analytics));
        *analytics = next;
        Ok(())
    }
}
