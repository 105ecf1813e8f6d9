//! Error types for the indexing and query engine.
//!
//! Per-entry and per-directory traversal problems never reach this type:
//! the walker logs and skips them. What remains here are the failures a
//! caller must see as a failed operation rather than a partial success.

use std::path::PathBuf;

/// Result type for index operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`], used by the boundary layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The root is missing or cannot be listed.
    FileSystem,
    /// The durable store cannot be opened, cleared, read or written.
    Storage,
    /// Another rebuild is already running.
    Conflict,
    /// Invalid configuration.
    Config,
    /// Anything else (background task failures).
    Internal,
}

/// Index errors with structured context.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The configured root does not exist.
    #[error("root path not found: {path:?}")]
    RootNotFound { path: PathBuf },

    /// The configured root exists but is not a directory.
    #[error("root path is not a directory: {path:?}")]
    RootNotDirectory { path: PathBuf },

    /// Filesystem failure that affects the whole walk.
    #[error("filesystem error at {path:?}: {source}")]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// SQLite failure with the operation that triggered it.
    #[error("storage error in {context}: {source}")]
    Storage {
        context: String,
        #[source]
        source: rusqlite::Error,
    },

    /// A second rebuild was requested while one is in flight.
    #[error("a rebuild is already in progress")]
    RebuildInProgress,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A blocking task panicked or was cancelled.
    #[error("background task failed: {0}")]
    Task(String),
}

impl Error {
    /// Create a filesystem error for `path`.
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileSystem {
            path: path.into(),
            source,
        }
    }

    /// Create a storage error with the failing operation as context.
    pub fn storage(context: impl Into<String>, source: rusqlite::Error) -> Self {
        Self::Storage {
            context: context.into(),
            source,
        }
    }

    /// The kind of failure, for callers that only branch on categories.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RootNotFound { .. } | Self::RootNotDirectory { .. } | Self::FileSystem { .. } => {
                ErrorKind::FileSystem
            },
            Self::Storage { .. } => ErrorKind::Storage,
            Self::RebuildInProgress => ErrorKind::Conflict,
            Self::Config(_) => ErrorKind::Config,
            Self::Task(_) => ErrorKind::Internal,
        }
    }

    /// Get the appropriate HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Conflict => 409,
            ErrorKind::FileSystem | ErrorKind::Storage | ErrorKind::Config | ErrorKind::Internal => {
                500
            },
        }
    }
}

/// Extension for attaching operation context to `rusqlite` results.
pub(crate) trait StorageContext<T> {
    fn storage_context(self, context: &str) -> Result<T>;
}

impl<T> StorageContext<T> for std::result::Result<T, rusqlite::Error> {
    fn storage_context(self, context: &str) -> Result<T> {
        self.map_err(|source| Error::storage(context, source))
    }
}
