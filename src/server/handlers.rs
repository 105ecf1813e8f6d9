//! HTTP API handlers.
//!
//! Store work runs on the blocking pool; no handler holds a lock across
//! an `.await`, so searches keep answering while a rebuild walks the tree.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use tracing::debug;

use super::types::{HealthResponse, SearchQuery};
use super::{AppError, AppState};
use crate::constants::HEALTH_STATUS_OK;
use crate::index::{RebuildSummary, SearchResponse, StatsResponse, rebuild_async};

/// GET /health - Liveness probe.
pub(crate) async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HEALTH_STATUS_OK,
    })
}

/// POST /api/rebuild - Clear and rebuild the whole index.
pub(crate) async fn rebuild(
    State(state): State<AppState>,
) -> Result<Json<RebuildSummary>, AppError> {
    let report = rebuild_async(Arc::clone(&state.coordinator)).await?;
    Ok(Json(RebuildSummary::from(report)))
}

/// GET /api/search - Search by term and type with pagination.
pub(crate) async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    let params = query.into_params();
    debug!(
        term = ?params.term,
        file_type = ?params.type_filter,
        limit = params.limit,
        offset = params.offset,
        "Search request"
    );
    let response = state.query.search_async(params).await?;
    Ok(Json(response))
}

/// GET /api/stats - Counts, total size and per-type breakdown.
pub(crate) async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let response = state.query.stats_async().await?;
    Ok(Json(response))
}
