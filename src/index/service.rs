//! Query service: the search and statistics surface handed to the boundary
//! layers, with sizes and timestamps already formatted for display.

use serde::Serialize;

use super::query::SearchParams;
use super::rebuild::RebuildReport;
use super::store::IndexStore;
use super::types::{IndexedEntry, TypeCount};
use crate::error::Result;
use crate::utils::{format_duration_ms, format_size, format_timestamp};

/// An indexed entry plus display strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedEntry {
    #[serde(flatten)]
    pub entry: IndexedEntry,
    pub size_formatted: String,
    pub modified_formatted: String,
}

impl From<IndexedEntry> for FormattedEntry {
    fn from(entry: IndexedEntry) -> Self {
        Self {
            size_formatted: format_size(entry.size_bytes),
            modified_formatted: format_timestamp(entry.modified_at),
            entry,
        }
    }
}

/// One page of search results.
///
/// `limit` and `offset` echo the values actually applied, after clamping.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub files: Vec<FormattedEntry>,
    pub total: u64,
    pub limit: i64,
    pub offset: i64,
}

/// Index-wide statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsResponse {
    pub total_files: u64,
    pub total_directories: u64,
    pub total_size_bytes: u64,
    pub total_size_formatted: String,
    pub file_types: Vec<TypeCount>,
}

/// Successful rebuild, as reported to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RebuildSummary {
    pub success: bool,
    pub count: u64,
    pub skipped: u64,
    pub duration_ms: u64,
    pub duration_formatted: String,
}

impl From<RebuildReport> for RebuildSummary {
    fn from(report: RebuildReport) -> Self {
        Self {
            success: true,
            count: report.count,
            skipped: report.skipped,
            duration_ms: report.duration_ms(),
            duration_formatted: format_duration_ms(report.duration),
        }
    }
}

/// Read-side facade over an [`IndexStore`].
#[derive(Clone)]
pub struct QueryService {
    store: IndexStore,
}

impl QueryService {
    pub fn new(store: IndexStore) -> Self {
        Self { store }
    }

    /// Search by term and type label with pagination.
    ///
    /// Out-of-range pagination is clamped, never rejected.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the index cannot be queried.
    pub fn search(&self, params: SearchParams) -> Result<SearchResponse> {
        let params = params.normalized();
        let page = self.store.search(&params)?;
        Ok(SearchResponse {
            files: page.entries.into_iter().map(FormattedEntry::from).collect(),
            total: page.total,
            limit: params.limit,
            offset: params.offset,
        })
    }

    /// Counts, total size and the per-type breakdown.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the index cannot be queried.
    pub fn stats(&self) -> Result<StatsResponse> {
        let stats = self.store.stats()?;
        Ok(StatsResponse {
            total_size_formatted: format_size(stats.total_size_bytes),
            total_files: stats.total_files,
            total_directories: stats.total_directories,
            total_size_bytes: stats.total_size_bytes,
            file_types: stats.file_types,
        })
    }
}
