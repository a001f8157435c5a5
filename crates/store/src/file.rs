//! File-backed store: one JSON array per collection, one analytics object.
//!
//! Concurrency discipline, per file:
//! - a `tokio::sync::Mutex` serializes logically-concurrent writers inside
//!   this process (request handling can interleave at any await point);
//! - an `fs2` exclusive advisory lock on a `.lock` sidecar keeps a second
//!   process on the same host out of the read-modify-write cycle, with a
//!   bounded retry budget before the write is reported failed;
//! - the new content is written to a temp file and renamed into place, so
//!   readers always observe a complete document and a crash mid-write
//!   leaves the previous contents intact.
//!
//! Different collections never contend; the file is the locking granule.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use fs2::FileExt;
use intake_core::{AnalyticsDoc, Collection, Record};
use serde::de::DeserializeOwned;
use serde::Serialize;
use telemetry::metrics;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::{AnalyticsUpdate, RecordStore};

/// File name of the analytics document within the data directory.
pub const ANALYTICS_FILE: &str = "analytics.json";

/// Advisory lock retry budget.
const LOCK_ATTEMPTS: u32 = 5;

/// First backoff, doubled after every failed attempt.
const LOCK_INITIAL_BACKOFF: Duration = Duration::from_millis(10);

/// The production store.
pub struct FileStore {
    data_dir: PathBuf,
    /// In-process writer serialization, one mutex per file.
    write_serial: HashMap<&'static str, Mutex<()>>,
}

impl FileStore {
    /// Open a store rooted at `data_dir`, initializing any missing files to
    /// an empty array/object.
    pub async fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        tokio::fs::create_dir_all(&data_dir).await?;

        let mut write_serial = HashMap::new();
        for collection in Collection::ALL {
            let path = data_dir.join(collection.file_name());
            init_file(&path, b"[]").await?;
            write_serial.insert(collection.file_name(), Mutex::new(()));
        }
        let analytics_path = data_dir.join(ANALYTICS_FILE);
        init_file(&analytics_path, b"{}").await?;
        write_serial.insert(ANALYTICS_FILE, Mutex::new(()));

        debug!(data_dir = %data_dir.display(), "Opened file store");

        Ok(Self {
            data_dir,
            write_serial,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path_for(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }

    /// Read and parse one file. Missing file reads as `fallback`; anything
    /// unparseable is surfaced as `Corrupt`, never masked.
    async fn load<T: DeserializeOwned>(&self, file_name: &str, fallback: T) -> Result<T> {
        let path = self.path_for(file_name);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(fallback),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&bytes).map_err(|e| StoreError::corrupt(file_name, e))
    }

    /// The whole read-modify-write cycle for one file, mutually exclusive
    /// against every other writer touching the same file.
    async fn modify<T, F>(&self, file_name: &'static str, fallback: T, apply: F) -> Result<()>
    where
        T: Serialize + DeserializeOwned + Send,
        F: FnOnce(T) -> T + Send,
    {
        // Serialize against in-process writers first, then against other
        // processes. The guards release on every exit path.
        let _serial = self
            .write_serial
            .get(file_name)
            .ok_or_else(|| StoreError::Internal(format!("unregistered file: {}", file_name)))?
            .lock()
            .await;
        let _file_lock = FileLock::acquire(self.path_for(file_name), file_name).await?;

        let current = self.load(file_name, fallback).await?;
        let next = apply(current);

        let bytes = serde_json::to_vec_pretty(&next).map_err(StoreError::Serialize)?;
        write_atomic(&self.path_for(file_name), &bytes).await?;

        Ok(())
    }
}

#[async_trait]
impl RecordStore for FileStore {
    async fn read_all(&self, collection: Collection) -> Result<Vec<Record>> {
        // Readers are not gated by the write lock; the rename-into-place
        // write path guarantees they still see a complete document.
        self.load(collection.file_name(), Vec::new()).await
    }

    async fn append(&self, collection: Collection, record: Record) -> Result<()> {
        let record_id = record.id;
        let result = self
            .modify(collection.file_name(), Vec::new(), move |mut records: Vec<Record>| {
                records.push(record);
                records
            })
            .await;

        match &result {
            Ok(()) => {
                metrics().records_appended.inc();
                debug!(collection = %collection, record_id, "Appended record");
            }
            Err(e) => {
                metrics().store_write_errors.inc();
                warn!(collection = %collection, error = %e, "Append failed");
            }
        }
        result
    }

    async fn read_analytics(&self) -> Result<AnalyticsDoc> {
        self.load(ANALYTICS_FILE, AnalyticsDoc::default()).await
    }

    async fn mutate_analytics(&self, update: AnalyticsUpdate) -> Result<()> {
        let result = self
            .modify(ANALYTICS_FILE, AnalyticsDoc::default(), update)
            .await;
        if result.is_err() {
            metrics().store_write_errors.inc();
        }
        result
    }
}

/// RAII guard over an `fs2` exclusive advisory lock.
///
/// The lock lives on a `.lock` sidecar rather than the data file itself so
/// the rename-into-place write path never replaces the locked inode.
struct FileLock {
    file: std::fs::File,
}

impl FileLock {
    /// The file open, the lock attempts, and the backoff sleeps all run on
    /// the blocking pool; a contended lock never ties up a runtime thread.
    async fn acquire(data_path: PathBuf, collection: &str) -> Result<Self> {
        let lock_path = lock_path_for(&data_path);
        let collection = collection.to_string();
        tokio::task::spawn_blocking(move || {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .truncate(false)
                .write(true)
                .open(&lock_path)?;

            let mut backoff = LOCK_INITIAL_BACKOFF;
            for attempt in 1..=LOCK_ATTEMPTS {
                match file.try_lock_exclusive() {
                    Ok(()) => return Ok(Self { file }),
                    Err(_) if attempt < LOCK_ATTEMPTS => {
                        metrics().store_lock_retries.inc();
                        debug!(
                            collection = %collection,
                            attempt,
                            backoff_ms = backoff.as_millis() as u64,
                            "Advisory lock busy, backing off"
                        );
                        std::thread::sleep(backoff);
                        backoff *= 2;
                    }
                    Err(_) => break,
                }
            }

            Err(StoreError::LockContended {
                collection,
                attempts: LOCK_ATTEMPTS,
            })
        })
        .await
        .map_err(|e| StoreError::Internal(format!("lock acquisition task failed: {}", e)))?
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
    }
}

fn lock_path_for(data_path: &Path) -> PathBuf {
    let mut name = data_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".lock");
    data_path.with_file_name(name)
}

async fn init_file(path: &Path, initial: &[u8]) -> Result<()> {
    if tokio::fs::try_exists(path).await? {
        return Ok(());
    }
    write_atomic(path, initial).await
}

/// Write to a temp file in the same directory, then rename into place.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    tokio::fs::write(&tmp_path, bytes).await?;
    tokio::fs::rename(&tmp_path, path).await?;
    Ok(())
}
