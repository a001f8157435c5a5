//! Durable persistence for intake records and the analytics document.
//!
//! The store is a dumb, trusted sink: sanitization and validation happen at
//! the HTTP boundary before anything reaches it. Its one job is to keep the
//! on-disk JSON files consistent under logically-concurrent writers.
//!
//! Two implementations share the [`RecordStore`] contract: [`FileStore`]
//! (one JSON array file per collection plus `analytics.json`, guarded by
//! per-file locking) and [`MemoryStore`] (tests and in-memory deployments).

pub mod error;
pub mod file;
pub mod memory;

use async_trait::async_trait;
use intake_core::{AnalyticsDoc, Collection, Record};

pub use error::{Result, StoreError};
pub use file::FileStore;
pub use memory::MemoryStore;

/// Transformation applied to the analytics document under the store's lock.
///
/// Boxed so the trait stays object-safe; the closure must be pure in the
/// sense that it only derives the next document from the current one.
pub type AnalyticsUpdate = Box<dyn FnOnce(AnalyticsDoc) -> AnalyticsDoc + Send>;

/// Contract shared by the file-backed and in-memory stores.
///
/// Guarantees (per collection):
/// - `append` is atomic relative to other appends: no interleaved or
///   partially-written state is ever observable, in-process or on disk.
/// - append order need not match request-arrival order; each successful
///   append is durable once it returns.
/// - `read_all` never blocks on writers and has no side effects.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Read every record in a collection, in insertion order.
    ///
    /// A collection that was never written to reads as empty. Malformed
    /// data is surfaced as [`StoreError::Corrupt`], never coerced to empty;
    /// the caller decides the fallback policy.
    async fn read_all(&self, collection: Collection) -> Result<Vec<Record>>;

    /// Append one fully-formed record to a collection.
    ///
    /// On any error the record must be treated as not persisted; there is
    /// no partial-success state.
    async fn append(&self, collection: Collection, record: Record) -> Result<()>;

    /// Read the analytics document.
    async fn read_analytics(&self) -> Result<AnalyticsDoc>;

    /// Apply a read-modify-write transformation to the analytics document,
    /// with the same exclusivity guarantees as `append`.
    async fn mutate_analytics(&self, update: AnalyticsUpdate) -> Result<()>;
}
