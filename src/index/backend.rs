//! Backend trait for the index store.
//!
//! Defines the operations every index backend must provide, so the rebuild
//! and query layers can run against SQLite or a test double.

use super::query::SearchParams;
use super::types::{EntryRecord, IndexStats, SearchPage};
use crate::error::Result;

/// Backend trait for index storage.
///
/// All backends must be thread-safe (`Send + Sync`): the HTTP layer shares
/// one backend between concurrent requests and a running rebuild. Calls are
/// blocking; async callers go through `spawn_blocking`.
pub trait IndexBackend: Send + Sync + 'static {
    /// Removes every record unconditionally.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the delete fails.
    fn clear(&self) -> Result<()>;

    /// Writes each record, fully overwriting any record with the same
    /// `full_path`. `now` (unix seconds) becomes `updated_at`, and
    /// `created_at` for paths not yet present.
    ///
    /// Returns the number of records written.
    ///
    /// # Errors
    ///
    /// Returns a storage error if any write fails; no record of the batch
    /// is kept in that case.
    fn insert_or_replace(&self, records: &[EntryRecord], now: i64) -> Result<usize>;

    /// Returns one page of matches ordered by name, plus the total match
    /// count ignoring limit and offset. `params` are already normalized.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the query fails.
    fn search(&self, params: &SearchParams) -> Result<SearchPage>;

    /// Returns file/directory counts, total file size and per-type counts.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the query fails.
    fn stats(&self) -> Result<IndexStats>;

    /// Number of records currently stored.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the query fails.
    fn count(&self) -> Result<u64>;
}
