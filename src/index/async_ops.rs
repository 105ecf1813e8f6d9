//! Async wrappers for index operations.
//!
//! These methods wrap the synchronous operations in `spawn_blocking` to
//! avoid blocking the async runtime. Use these when calling from async
//! contexts (HTTP handlers, etc.).

use std::sync::Arc;

use super::query::SearchParams;
use super::rebuild::{RebuildCoordinator, RebuildReport};
use super::service::{QueryService, SearchResponse, StatsResponse};
use crate::error::{Error, Result};

/// Maps a join failure (panic or cancellation) onto the crate error.
fn join_error(e: tokio::task::JoinError) -> Error {
    Error::Task(format!("Task join error: {e}"))
}

/// Runs a rebuild on the blocking pool.
///
/// Takes the coordinator by `Arc` so the walk can outlive the caller's
/// borrow.
pub async fn rebuild_async(coordinator: Arc<RebuildCoordinator>) -> Result<RebuildReport> {
    tokio::task::spawn_blocking(move || coordinator.rebuild())
        .await
        .map_err(join_error)?
}

impl QueryService {
    /// Searches asynchronously.
    ///
    /// Async version of `search` that uses `spawn_blocking`.
    pub async fn search_async(&self, params: SearchParams) -> Result<SearchResponse> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.search(params))
            .await
            .map_err(join_error)?
    }

    /// Computes statistics asynchronously.
    ///
    /// Async version of `stats` that uses `spawn_blocking`.
    pub async fn stats_async(&self) -> Result<StatsResponse> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.stats())
            .await
            .map_err(join_error)?
    }
}
