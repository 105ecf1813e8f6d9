//! Full-rebuild orchestration: clear, walk, bulk write.
//!
//! Rebuilds are serialized. A rebuild requested while another is running is
//! rejected with [`Error::RebuildInProgress`] instead of interleaving its
//! clear and insert with the running one.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{error, info, warn};

use super::store::IndexStore;
use super::walker::DirectoryWalker;
use crate::error::{Error, Result};

/// Outcome of a completed rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebuildReport {
    /// Records written to the index.
    pub count: u64,
    /// Entries or subtrees the walker had to skip.
    pub skipped: u64,
    /// Wall-clock time for the whole rebuild.
    pub duration: Duration,
}

impl RebuildReport {
    /// Elapsed time in whole milliseconds.
    pub fn duration_ms(&self) -> u64 {
        u64::try_from(self.duration.as_millis()).unwrap_or(u64::MAX)
    }
}

/// Owns the rebuild procedure for one root and one store.
pub struct RebuildCoordinator {
    store: IndexStore,
    walker: DirectoryWalker,
    in_flight: AtomicBool,
}

impl RebuildCoordinator {
    pub fn new(store: IndexStore, walker: DirectoryWalker) -> Self {
        Self {
            store,
            walker,
            in_flight: AtomicBool::new(false),
        }
    }

    /// The directory this coordinator indexes.
    pub fn root(&self) -> &Path {
        self.walker.root()
    }

    pub fn store(&self) -> &IndexStore {
        &self.store
    }

    /// Whether a rebuild is currently running.
    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Replace the index with a fresh snapshot of the root.
    ///
    /// Validates the root, clears the store, walks the tree and writes every
    /// record. Unreadable entries below the root only lower the count.
    ///
    /// # Errors
    ///
    /// - [`Error::RebuildInProgress`] if another rebuild is running
    /// - a filesystem error if the root is missing, not a directory or unreadable
    /// - a storage error if the clear or the bulk write fails
    pub fn rebuild(&self) -> Result<RebuildReport> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            warn!(root = %self.root().display(), "Rebuild rejected: another rebuild is in progress");
            return Err(Error::RebuildInProgress);
        };

        let start = Instant::now();
        info!(root = %self.root().display(), "Rebuilding file index");

        let result = self.run(start);
        match &result {
            Ok(report) => info!(
                count = report.count,
                skipped = report.skipped,
                duration_ms = report.duration_ms(),
                "File index rebuilt"
            ),
            Err(e) => error!(
                error = %e,
                duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
                "File index rebuild failed"
            ),
        }
        result
    }

    fn run(&self, start: Instant) -> Result<RebuildReport> {
        check_root(self.root())?;

        self.store.clear()?;

        let output = self.walker.walk()?;
        info!(
            entries = output.entries.len(),
            skipped = output.skipped,
            "Directory walk finished"
        );

        let written = self
            .store
            .insert_or_replace(&output.entries, Utc::now().timestamp())?;

        Ok(RebuildReport {
            count: written as u64,
            skipped: output.skipped,
            duration: start.elapsed(),
        })
    }
}

/// Fail before touching the store if the root cannot be walked at all.
fn check_root(root: &Path) -> Result<()> {
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(Error::RootNotDirectory {
            path: root.to_path_buf(),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::RootNotFound {
            path: root.to_path_buf(),
        }),
        Err(e) => Err(Error::filesystem(root, e)),
    }
}

/// Holds the in-flight flag for the lifetime of one rebuild.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
