//! High-level `IndexStore` handle over backend implementations.

use std::path::Path;
use std::sync::Arc;

use super::backend::IndexBackend;
use super::query::SearchParams;
use super::sqlite::SqliteBackend;
use super::types::{EntryRecord, IndexStats, SearchPage};
use crate::error::Result;

/// Shared handle to the durable index.
///
/// Opened once at startup and handed to both the rebuild coordinator and
/// the query service. The underlying database is closed when the last
/// clone is dropped.
///
/// # Thread Safety
///
/// `IndexStore` is `Clone` and can be shared across threads. The backend
/// handles concurrent access safely.
///
/// # Example
///
/// ```no_run
/// use fidx::index::{IndexStore, SearchParams};
///
/// let store = IndexStore::file("index.db")?;
/// let page = store.search(&SearchParams::new().term("report"))?;
/// println!("{} matches", page.total);
/// # Ok::<(), fidx::Error>(())
/// ```
#[derive(Clone)]
pub struct IndexStore {
    backend: Arc<dyn IndexBackend>,
}

impl IndexStore {
    /// Opens (or creates) a file-backed SQLite index.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let backend = SqliteBackend::open(path)?;
        Ok(Self {
            backend: Arc::new(backend),
        })
    }

    /// Creates an in-memory SQLite index, for tests and one-shot use.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn memory() -> Result<Self> {
        let backend = SqliteBackend::memory()?;
        Ok(Self {
            backend: Arc::new(backend),
        })
    }

    /// Wraps a custom backend.
    pub fn custom<B: IndexBackend>(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Removes all records.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the delete fails.
    pub fn clear(&self) -> Result<()> {
        self.backend.clear()
    }

    /// Writes records, overwriting any with a colliding `full_path`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the write fails.
    pub fn insert_or_replace(&self, records: &[EntryRecord], now: i64) -> Result<usize> {
        self.backend.insert_or_replace(records, now)
    }

    /// Runs a search. Pagination is normalized before it reaches the backend.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the query fails.
    pub fn search(&self, params: &SearchParams) -> Result<SearchPage> {
        self.backend.search(&params.clone().normalized())
    }

    /// Aggregate statistics over all records.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the query fails.
    pub fn stats(&self) -> Result<IndexStats> {
        self.backend.stats()
    }

    /// Number of stored records.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the query fails.
    pub fn count(&self) -> Result<u64> {
        self.backend.count()
    }
}
