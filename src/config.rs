//! Configuration for the fidx indexer and server.
//!
//! Settings come from an optional `fidx.toml`:
//!
//! - [`Config`] - Root configuration struct
//! - [`IndexConfig`] - root directory, database file, extra exclusions
//! - [`ServerConfig`] - HTTP bind address
//! - [`LoggingConfig`] - log output format
//!
//! Every field has a default, so an absent file or an empty one yields a
//! working configuration that indexes the current directory.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::index::Exclusions;

/// Result of configuration validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Non-fatal warnings that should be logged but don't prevent operation.
    pub warnings: Vec<String>,
}

/// fidx.toml configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub index: IndexConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// What to index and where to keep the index.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Directory to index. `None` means the working directory.
    pub root: Option<PathBuf>,
    /// SQLite database file.
    pub database: PathBuf,
    /// Extra base names skipped at every level.
    pub exclude: Vec<String>,
    /// Rebuild once before the server starts accepting requests.
    pub rebuild_on_start: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            root: None,
            database: PathBuf::from(constants::DEFAULT_DATABASE_FILE),
            exclude: Vec::new(),
            rebuild_on_start: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: constants::DEFAULT_HOST.to_string(),
            port: constants::DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl Config {
    /// Load configuration from the specified path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read (IO error)
    /// - The file contains invalid TOML syntax
    /// - A field has an invalid type or value
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load `explicit` if given, else `fidx.toml` in the working directory
    /// if present, else the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing, or if the chosen
    /// file cannot be read or parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        let default = Path::new(constants::DEFAULT_CONFIG_FILE);
        if default.is_file() {
            Self::load_from(default)
        } else {
            Ok(Self::default())
        }
    }

    /// The configured root, or the working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if no root is configured and the working directory
    /// cannot be determined.
    pub fn root(&self) -> Result<PathBuf> {
        match &self.index.root {
            Some(root) => Ok(root.clone()),
            None => std::env::current_dir().context("Failed to determine current directory"),
        }
    }

    /// Absolute, canonical root path.
    ///
    /// # Errors
    ///
    /// Returns an error if the root does not exist or cannot be resolved.
    pub fn resolve_root(&self) -> Result<PathBuf> {
        let root = self.root()?;
        root.canonicalize()
            .with_context(|| format!("Failed to resolve root directory: {}", root.display()))
    }

    /// Names the walker must skip: the database and its side files, this
    /// executable and the configured extras.
    pub fn exclusions(&self) -> Exclusions {
        Exclusions::new()
            .with_database(&self.index.database)
            .with_current_exe()
            .with_names(self.index.exclude.iter().map(String::as_str))
    }

    /// `host:port` for the HTTP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Validate configuration with comprehensive checks.
    ///
    /// Returns a `ValidationResult` containing any non-fatal warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails with one or more errors:
    /// - Root directory missing or not a directory
    /// - Database path pointing at a directory
    /// - Empty host or port 0
    pub fn validate(&self) -> Result<ValidationResult> {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        // 1. Root directory
        match self.root() {
            Ok(root) if !root.exists() => {
                errors.push(format!("Root directory does not exist: {}", root.display()));
            },
            Ok(root) if !root.is_dir() => {
                errors.push(format!("Root path is not a directory: {}", root.display()));
            },
            Ok(_) => {},
            Err(e) => errors.push(format!("{e:#}")),
        }

        // 2. Database file
        let database = &self.index.database;
        if database.as_os_str().is_empty() {
            errors.push("index.database cannot be empty".to_string());
        } else if database.is_dir() {
            errors.push(format!(
                "Database path is a directory: {}\n  \
                 Expected a file path such as {}",
                database.display(),
                constants::DEFAULT_DATABASE_FILE
            ));
        }

        for name in &self.index.exclude {
            if name.is_empty() || name.contains('/') {
                warnings.push(format!(
                    "Exclusion '{name}' is not a plain file name and will never match"
                ));
            }
        }

        // 3. Server
        if self.server.host.trim().is_empty() {
            errors.push("server.host cannot be empty".to_string());
        }

        if self.server.port == 0 {
            errors.push(
                "Server port cannot be 0. Use a valid port number (1-65535)\n  \
                 Default: 3002"
                    .to_string(),
            );
        }

        if self.server.port < 1024 && self.server.port > 0 {
            warnings.push(format!(
                "Server port {} is a system/privileged port (< 1024)\n  \
                 Recommendation: Use ports >= 1024 to avoid permission issues",
                self.server.port
            ));
        }

        if !errors.is_empty() {
            anyhow::bail!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            );
        }

        Ok(ValidationResult { warnings })
    }
}
