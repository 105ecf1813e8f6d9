//! Filesystem indexing engine.
//!
//! Walks a root directory, records metadata for every file and directory
//! in a SQLite table, and answers paginated search and statistics queries
//! against that table.
//!
//! - [`classify`] maps a file name to a coarse [`FileType`]
//! - [`DirectoryWalker`] produces one [`EntryRecord`] per entry, pre-order
//! - [`IndexStore`] persists records behind the [`IndexBackend`] trait
//! - [`RebuildCoordinator`] runs clear, walk and bulk write as one operation
//! - [`QueryService`] formats search results and statistics for display
//!
//! # Async Usage
//!
//! All store operations are blocking. From async contexts use
//! [`rebuild_async`], [`QueryService::search_async`] and
//! [`QueryService::stats_async`], which run on the blocking pool.

mod async_ops;
mod backend;
mod classify;
mod query;
mod rebuild;
mod service;
mod sqlite;
mod store;
mod types;
mod walker;

#[cfg(test)]
mod tests;

pub use async_ops::rebuild_async;
pub use backend::IndexBackend;
pub use classify::{FileType, classify};
pub use query::{SearchParams, SqlFilter};
pub use rebuild::{RebuildCoordinator, RebuildReport};
pub use service::{FormattedEntry, QueryService, RebuildSummary, SearchResponse, StatsResponse};
pub use sqlite::SqliteBackend;
pub use store::IndexStore;
pub use types::{EntryKind, EntryRecord, IndexStats, IndexedEntry, SearchPage, TypeCount};
pub use walker::{DirectoryWalker, Exclusions, WalkOutput};
