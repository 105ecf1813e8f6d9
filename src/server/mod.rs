//! HTTP boundary for the indexer.
//!
//! Routes:
//! - `GET /health`
//! - `POST /api/rebuild`
//! - `GET /api/search?q=&type=&limit=&offset=`
//! - `GET /api/stats`
//!
//! The two read endpoints carry permissive CORS headers so a browser page
//! served from elsewhere can query them.

mod error;
mod handlers;
mod types;


use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    http::{Method, header},
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

pub use error::AppError;
pub use types::{ErrorResponse, HealthResponse, SearchQuery};

use crate::index::{DirectoryWalker, IndexStore, QueryService, RebuildCoordinator};

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<RebuildCoordinator>,
    pub query: QueryService,
}

impl AppState {
    /// Wire one store into both the rebuild and the query side.
    pub fn new(store: IndexStore, walker: DirectoryWalker) -> Self {
        Self {
            query: QueryService::new(store.clone()),
            coordinator: Arc::new(RebuildCoordinator::new(store, walker)),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([header::RANGE, header::CONTENT_TYPE]);

    let read_api = Router::new()
        .route("/api/search", get(handlers::search))
        .route("/api/stats", get(handlers::stats))
        .layer(cors);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/rebuild", post(handlers::rebuild))
        .merge(read_api)
        .with_state(state)
}

/// Serve until Ctrl-C or SIGTERM, then drain in-flight requests.
///
/// # Errors
///
/// Returns an error if the listener address cannot be read or the server
/// fails while running.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let addr = listener
        .local_addr()
        .context("Failed to read listener address")?;
    info!(%addr, root = %state.coordinator.root().display(), "HTTP server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
