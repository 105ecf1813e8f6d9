//! fidx - filesystem indexer CLI.
//!
//! `fidx` with no subcommand starts the HTTP server over the current
//! directory; the other subcommands work against the same database
//! without a server.

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

mod commands;

use commands::{IndexArgs, ServeArgs};
use fidx::constants::DEFAULT_SEARCH_LIMIT;

#[derive(Parser)]
#[command(name = "fidx")]
#[command(version, about = "Index a directory tree into SQLite and search it")]
struct Cli {
    /// Configuration file [default: ./fidx.toml if present]
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API (default)
    Serve(ServeArgs),

    /// Rebuild the index once and exit
    Rebuild {
        #[command(flatten)]
        index: IndexArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Search the index
    Search {
        /// Substring matched against file name or relative path
        term: Option<String>,

        /// Only entries with this type label (e.g. json, image, directory)
        #[arg(long = "type", value_name = "TYPE")]
        file_type: Option<String>,

        /// Page size
        #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT, allow_negative_numbers = true)]
        limit: i64,

        /// Results to skip
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i64,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        index: IndexArgs,
    },

    /// Show index statistics
    Stats {
        /// Print statistics as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        index: IndexArgs,
    },
}

/// Parse the command line, treating a bare invocation as `serve` so that
/// serve's flags and environment variables still go through clap.
fn parse_args(args: Vec<OsString>) -> Result<(Option<PathBuf>, Commands), clap::Error> {
    let cli = Cli::try_parse_from(&args)?;
    if let Some(command) = cli.command {
        return Ok((cli.config, command));
    }

    // Only global flags were given; appending the subcommand keeps them valid.
    let cli = Cli::try_parse_from(args.into_iter().chain([OsString::from("serve")]))?;
    match cli.command {
        Some(command) => Ok((cli.config, command)),
        None => Err(Cli::command().error(
            clap::error::ErrorKind::MissingSubcommand,
            "no subcommand given",
        )),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let (config, command) = parse_args(std::env::args_os().collect()).unwrap_or_else(|e| e.exit());
    let config = config.as_deref();

    match command {
        Commands::Serve(args) => commands::serve::execute(config, args).await,
        Commands::Rebuild { index, json } => commands::rebuild::execute(config, &index, json).await,
        Commands::Search {
            term,
            file_type,
            limit,
            offset,
            json,
            index,
        } => {
            let params = fidx::index::SearchParams {
                term,
                type_filter: file_type,
                limit,
                offset,
            };
            commands::search::execute(config, &index, params, json)
        },
        Commands::Stats { json, index } => commands::stats::execute(config, &index, json),
    }
}
