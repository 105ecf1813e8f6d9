//! fidx - index a directory tree into SQLite and search it.
//!
//! The [`index`] module holds the engine: type classification, directory
//! walking, the SQLite store, rebuild orchestration and the query service.
//! [`server`] exposes it over HTTP; [`config`] loads `fidx.toml`.
//!
//! ```no_run
//! use std::sync::Arc;
//! use fidx::index::{DirectoryWalker, Exclusions, IndexStore, QueryService, RebuildCoordinator, SearchParams};
//!
//! let store = IndexStore::file("index.db")?;
//! let exclusions = Exclusions::new().with_database("index.db".as_ref());
//! let coordinator = Arc::new(RebuildCoordinator::new(
//!     store.clone(),
//!     DirectoryWalker::new("/srv/files", exclusions),
//! ));
//! let report = coordinator.rebuild()?;
//! println!("indexed {} entries", report.count);
//!
//! let results = QueryService::new(store).search(SearchParams::new().type_filter("json"))?;
//! println!("{} json files", results.total);
//! # Ok::<(), fidx::Error>(())
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod index;
pub mod server;
pub mod utils;

pub use error::{Error, ErrorKind, Result};
