//! Shared constants for the indexer, query layer and HTTP server.

/// Default HTTP port for `fidx serve`.
pub const DEFAULT_PORT: u16 = 3002;

/// Default bind address for `fidx serve`.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Environment variable that overrides the HTTP port.
pub const PORT_ENV_VAR: &str = "FILE_INDEXER_PORT";

/// Default configuration file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "fidx.toml";

/// Default database file name, created in the working directory.
pub const DEFAULT_DATABASE_FILE: &str = "index.db";

/// Side files SQLite may create next to the database file.
pub const DATABASE_SIDE_SUFFIXES: [&str; 3] = ["-wal", "-shm", "-journal"];

/// Page size used when a search does not specify a limit.
pub const DEFAULT_SEARCH_LIMIT: i64 = 100;

/// Upper bound for a single search page.
pub const MAX_SEARCH_LIMIT: i64 = 10_000;

/// Type label stored for directory entries.
pub const DIRECTORY_TYPE_LABEL: &str = "directory";

/// Health status reported by `GET /health`.
pub const HEALTH_STATUS_OK: &str = "ok";
