//! `fidx stats` - index statistics.

use std::path::Path;

use anyhow::{Context, Result};

use super::{IndexArgs, init_logging, load_config, open_store};
use fidx::index::QueryService;

pub fn execute(config_path: Option<&Path>, args: &IndexArgs, json: bool) -> Result<()> {
    let config = load_config(config_path, args)?;
    init_logging(config.logging.format);

    let stats = QueryService::new(open_store(&config)?)
        .stats()
        .context("Failed to read index statistics")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Files:       {}", stats.total_files);
    println!("Directories: {}", stats.total_directories);
    println!("Total size:  {}", stats.total_size_formatted);
    if !stats.file_types.is_empty() {
        println!("\nBy type:");
        for entry in &stats.file_types {
            println!("  {:<12} {}", entry.type_label, entry.count);
        }
    }
    Ok(())
}
