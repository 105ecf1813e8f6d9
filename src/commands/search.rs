//! `fidx search` - query the index from the terminal.

use std::path::Path;

use anyhow::{Context, Result};

use super::{IndexArgs, init_logging, load_config, open_store};
use fidx::index::{QueryService, SearchParams, SearchResponse};

pub fn execute(
    config_path: Option<&Path>,
    args: &IndexArgs,
    params: SearchParams,
    json: bool,
) -> Result<()> {
    let config = load_config(config_path, args)?;
    init_logging(config.logging.format);

    let service = QueryService::new(open_store(&config)?);
    let response = service.search(params).context("Search failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_table(&response);
    }
    Ok(())
}

fn print_table(response: &SearchResponse) {
    if response.files.is_empty() {
        println!("No matches ({} total)", response.total);
        return;
    }

    println!(
        "{:<11} {:>10}  {:<19}  PATH",
        "TYPE", "SIZE", "MODIFIED"
    );
    for file in &response.files {
        let path = if file.entry.is_directory {
            format!("{}/", file.entry.relative_path)
        } else {
            file.entry.relative_path.clone()
        };
        println!(
            "{:<11} {:>10}  {:<19}  {}",
            file.entry.type_label, file.size_formatted, file.modified_formatted, path
        );
    }

    let first = response.offset + 1;
    let last = response.offset + response.files.len() as i64;
    println!("\nShowing {first}-{last} of {}", response.total);
}
