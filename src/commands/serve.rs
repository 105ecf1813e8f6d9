//! `fidx serve` - run the HTTP API.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use super::{ServeArgs, init_logging, load_config, open_store, validate, walker};
use fidx::index::rebuild_async;
use fidx::server::{self, AppState};

pub async fn execute(config_path: Option<&Path>, args: ServeArgs) -> Result<()> {
    let mut config = load_config(config_path, &args.index)?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if args.rebuild {
        config.index.rebuild_on_start = true;
    }

    init_logging(config.logging.format);
    validate(&config)?;

    let walker = walker(&config)?;
    let store = open_store(&config)?;
    let state = AppState::new(store, walker);

    if config.index.rebuild_on_start {
        let report = rebuild_async(Arc::clone(&state.coordinator))
            .await
            .context("Initial rebuild failed")?;
        info!(count = report.count, duration_ms = report.duration_ms(), "Initial rebuild complete");
    }

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    server::serve(listener, state).await
}
