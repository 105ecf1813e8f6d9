//! `fidx rebuild` - one-shot full rebuild.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use super::{IndexArgs, init_logging, load_config, open_store, validate, walker};
use fidx::index::{RebuildCoordinator, RebuildSummary, rebuild_async};

pub async fn execute(config_path: Option<&Path>, args: &IndexArgs, json: bool) -> Result<()> {
    let config = load_config(config_path, args)?;
    init_logging(config.logging.format);
    validate(&config)?;

    let walker = walker(&config)?;
    let root = walker.root().to_path_buf();
    let coordinator = Arc::new(RebuildCoordinator::new(open_store(&config)?, walker));

    let report = rebuild_async(coordinator)
        .await
        .with_context(|| format!("Failed to rebuild index for {}", root.display()))?;
    let summary = RebuildSummary::from(report);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Indexed {} entries under {} in {}",
            summary.count,
            root.display(),
            summary.duration_formatted
        );
        if summary.skipped > 0 {
            println!("Skipped {} unreadable entries (see log)", summary.skipped);
        }
    }
    Ok(())
}
