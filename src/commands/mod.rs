//! CLI command implementations for fidx.
//!
//! - [`serve`] - HTTP API over the index (default command)
//! - [`rebuild`] - One-shot full rebuild
//! - [`search`] - Query the index from the terminal
//! - [`stats`] - Index statistics

pub mod rebuild;
pub mod search;
pub mod serve;
pub mod stats;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::warn;

use fidx::config::{Config, LogFormat};
use fidx::constants::PORT_ENV_VAR;
use fidx::index::{DirectoryWalker, IndexStore};

/// Options shared by every command that touches the index.
#[derive(Args, Debug, Clone, Default)]
pub struct IndexArgs {
    /// Directory to index [default: current directory]
    #[arg(long, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Index database file [default: ./index.db]
    #[arg(long, value_name = "FILE")]
    pub db: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    #[command(flatten)]
    pub index: IndexArgs,

    /// Port to listen on [default: 3002]
    #[arg(short, long, env = PORT_ENV_VAR)]
    pub port: Option<u16>,

    /// Address to bind [default: 0.0.0.0]
    #[arg(long)]
    pub host: Option<String>,

    /// Rebuild the index before accepting requests
    #[arg(long)]
    pub rebuild: bool,
}

/// Load the config file and apply command-line overrides.
pub(crate) fn load_config(path: Option<&Path>, args: &IndexArgs) -> Result<Config> {
    let mut config = Config::load(path)?;
    if let Some(root) = &args.path {
        config.index.root = Some(root.clone());
    }
    if let Some(db) = &args.db {
        config.index.database = db.clone();
    }
    Ok(config)
}

/// Validate and log warnings; errors abort the command.
pub(crate) fn validate(config: &Config) -> Result<()> {
    let result = config.validate()?;
    for warning in &result.warnings {
        warn!("{warning}");
    }
    Ok(())
}

pub(crate) fn open_store(config: &Config) -> Result<IndexStore> {
    IndexStore::file(&config.index.database).with_context(|| {
        format!(
            "Failed to open index database: {}",
            config.index.database.display()
        )
    })
}

pub(crate) fn walker(config: &Config) -> Result<DirectoryWalker> {
    Ok(DirectoryWalker::new(
        config.resolve_root()?,
        config.exclusions(),
    ))
}

/// Initialize logging on stderr, so stdout stays clean for command output.
pub(crate) fn init_logging(format: LogFormat) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}
