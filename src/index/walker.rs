//! Recursive directory traversal producing entry records.
//!
//! Traversal is depth-first pre-order: every directory is emitted right
//! before its own subtree, and siblings are visited in file-name order so
//! repeated walks over an unchanged tree produce the same sequence.
//!
//! Failure policy:
//! - metadata for a single entry cannot be read: `warn!` and skip the entry
//! - a path is not valid UTF-8: `warn!` and skip the entry (and its subtree)
//! - a directory below the root cannot be listed: `error!` and skip its subtree
//! - the root itself cannot be read: the walk fails

use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fs::Metadata;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, error, warn};
use walkdir::{DirEntry, WalkDir};

use super::classify::classify;
use super::types::EntryRecord;
use crate::constants::DATABASE_SIDE_SUFFIXES;
use crate::error::{Error, Result};

/// Base names skipped at every level of the walk.
#[derive(Debug, Clone, Default)]
pub struct Exclusions {
    names: HashSet<OsString>,
}

impl Exclusions {
    /// An empty exclusion set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclude the index database and the side files SQLite keeps next to it.
    #[must_use]
    pub fn with_database(mut self, database: &Path) -> Self {
        if let Some(name) = database.file_name() {
            for suffix in DATABASE_SIDE_SUFFIXES {
                let mut side = name.to_os_string();
                side.push(suffix);
                self.names.insert(side);
            }
            self.names.insert(name.to_os_string());
        }
        self
    }

    /// Exclude the running program's own executable.
    #[must_use]
    pub fn with_current_exe(mut self) -> Self {
        match std::env::current_exe() {
            Ok(exe) => {
                if let Some(name) = exe.file_name() {
                    self.names.insert(name.to_os_string());
                }
            },
            Err(e) => debug!(error = %e, "Cannot resolve current executable, not excluding it"),
        }
        self
    }

    /// Exclude additional base names.
    #[must_use]
    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Whether an entry with this base name is skipped.
    pub fn matches(&self, name: &OsStr) -> bool {
        self.names.contains(name)
    }

}

/// Materialized result of one walk.
#[derive(Debug, Default)]
pub struct WalkOutput {
    /// Records in emission order.
    pub entries: Vec<EntryRecord>,
    /// Entries and subtrees skipped because they could not be read.
    pub skipped: u64,
}

/// Walks a root directory and collects [`EntryRecord`]s.
#[derive(Debug, Clone)]
pub struct DirectoryWalker {
    root: PathBuf,
    exclusions: Exclusions,
}

impl DirectoryWalker {
    pub fn new(root: impl Into<PathBuf>, exclusions: Exclusions) -> Self {
        Self {
            root: root.into(),
            exclusions,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the whole tree under the root.
    ///
    /// The root itself is not emitted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileSystem`] if the root cannot be read or listed.
    /// Failures below the root are logged and counted in
    /// [`WalkOutput::skipped`] instead.
    pub fn walk(&self) -> Result<WalkOutput> {
        let mut output = WalkOutput::default();

        let mut walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.exclusions.matches(entry.file_name()));

        while let Some(item) = walker.next() {
            let entry = match item {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err
                        .path()
                        .map_or_else(|| self.root.clone(), Path::to_path_buf);
                    if err.depth() == 0 {
                        let source = err.into_io_error().unwrap_or_else(|| {
                            std::io::Error::other("failed to read walk root")
                        });
                        return Err(Error::filesystem(path, source));
                    }
                    error!(path = %path.display(), error = %err, "Failed to list directory, skipping subtree");
                    output.skipped += 1;
                    continue;
                },
            };

            if entry.depth() == 0 {
                continue;
            }

            match self.record_for(&entry) {
                Ok(record) => output.entries.push(record),
                Err(err) => {
                    warn!(path = %entry.path().display(), error = %err, "Cannot index entry, skipping");
                    output.skipped += 1;
                    if entry.file_type().is_dir() {
                        walker.skip_current_dir();
                    }
                },
            }
        }

        Ok(output)
    }

    /// Build the record for one walked entry.
    ///
    /// Metadata is read through symlinks, so a dangling link fails here.
    /// Paths must be valid UTF-8; `full_path` is the index key and a lossy
    /// conversion could map two distinct entries onto one row.
    fn record_for(&self, entry: &DirEntry) -> std::io::Result<EntryRecord> {
        let path = entry.path();
        let full_path = utf8(path.as_os_str())?.to_owned();
        let name = utf8(entry.file_name())?.to_owned();
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let relative_path = utf8(relative.as_os_str())?.to_owned();

        let metadata = std::fs::metadata(path)?;
        let modified_at = modified_secs(&metadata);

        if entry.file_type().is_dir() {
            Ok(EntryRecord::directory(full_path, name, relative_path, modified_at))
        } else {
            let size = if metadata.is_file() { metadata.len() } else { 0 };
            Ok(EntryRecord::file(
                full_path,
                name.as_str(),
                relative_path,
                size,
                classify(&name),
                modified_at,
            ))
        }
    }
}

fn utf8(value: &OsStr) -> std::io::Result<&str> {
    value.to_str().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidData, "path is not valid UTF-8")
    })
}

/// Modification time truncated to unix seconds, 0 if the platform has none.
fn modified_secs(metadata: &Metadata) -> i64 {
    metadata
        .modified()
        .map(|time| DateTime::<Utc>::from(time).timestamp())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Layout:
    /// ```text
    /// tmp/
    ///   a.txt            (10 bytes)
    ///   index.db
    ///   sub/
    ///     b.json         (20 bytes)
    ///     empty/
    ///     index.db
    /// ```
    fn setup_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join("a.txt"), b"0123456789").unwrap();
        fs::write(root.join("index.db"), b"db").unwrap();
        fs::create_dir_all(root.join("sub/empty")).unwrap();
        fs::write(root.join("sub/b.json"), b"{\"k\":\"0123456789ab\"}").unwrap();
        fs::write(root.join("sub/index.db"), b"db").unwrap();
        dir
    }

    fn walk(root: &Path, exclusions: Exclusions) -> WalkOutput {
        DirectoryWalker::new(root, exclusions).walk().unwrap()
    }

    #[test]
    fn test_walk_emits_files_and_directories() {
        let dir = setup_tree();
        let output = walk(dir.path(), Exclusions::new().with_database(Path::new("index.db")));

        let relative: Vec<&str> = output.entries.iter().map(EntryRecord::relative_path).collect();
        assert_eq!(output.entries.len(), 4, "got {relative:?}");
        assert_eq!(output.skipped, 0);

        let sub = output.entries.iter().find(|e| e.name() == "sub").unwrap();
        assert!(sub.is_directory());
        assert_eq!(sub.size_bytes(), 0);

        let json = output.entries.iter().find(|e| e.name() == "b.json").unwrap();
        assert_eq!(json.size_bytes(), 20);
        assert_eq!(json.type_label(), "json");
        assert_eq!(
            Path::new(json.relative_path()),
            Path::new("sub").join("b.json")
        );
    }

    #[test]
    fn test_parent_precedes_descendants() {
        let dir = setup_tree();
        let output = walk(dir.path(), Exclusions::new());

        let position = |name: &str| output.entries.iter().position(|e| e.name() == name).unwrap();
        assert!(position("sub") < position("b.json"));
        assert!(position("sub") < position("empty"));
    }

    #[test]
    fn test_exclusions_apply_at_every_depth() {
        let dir = setup_tree();
        let output = walk(dir.path(), Exclusions::new().with_database(Path::new("/elsewhere/index.db")));
        assert!(output.entries.iter().all(|e| e.name() != "index.db"));

        let unfiltered = walk(dir.path(), Exclusions::new());
        assert_eq!(
            unfiltered.entries.iter().filter(|e| e.name() == "index.db").count(),
            2
        );
    }

    #[test]
    fn test_excluded_directory_skips_subtree() {
        let dir = setup_tree();
        let output = walk(dir.path(), Exclusions::new().with_names(["sub"]));
        let names: Vec<&str> = output.entries.iter().map(EntryRecord::name).collect();
        assert_eq!(names, vec!["a.txt", "index.db"]);
    }

    #[test]
    fn test_database_side_files_are_excluded() {
        let exclusions = Exclusions::new().with_database(Path::new("data/index.db"));
        assert!(exclusions.matches(OsStr::new("index.db")));
        assert!(exclusions.matches(OsStr::new("index.db-wal")));
        assert!(exclusions.matches(OsStr::new("index.db-shm")));
        assert!(exclusions.matches(OsStr::new("index.db-journal")));
        assert!(!exclusions.matches(OsStr::new("data")));
        assert!(!exclusions.matches(OsStr::new("index.db-backup")));
    }

    #[test]
    fn test_empty_root_yields_no_entries() {
        let dir = TempDir::new().unwrap();
        let output = walk(dir.path(), Exclusions::new());
        assert!(output.entries.is_empty());
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");
        let err = DirectoryWalker::new(&missing, Exclusions::new())
            .walk()
            .unwrap_err();
        assert!(matches!(err, Error::FileSystem { .. }), "got {err:?}");
    }

    #[test]
    fn test_walk_is_deterministic() {
        let dir = setup_tree();
        let first = walk(dir.path(), Exclusions::new());
        let second = walk(dir.path(), Exclusions::new());
        assert_eq!(first.entries, second.entries);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_skipped() {
        let dir = setup_tree();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("broken")).unwrap();

        let output = walk(dir.path(), Exclusions::new());
        assert!(output.entries.iter().all(|e| e.name() != "broken"));
        assert_eq!(output.skipped, 1);
    }

    #[test]
    fn test_current_exe_is_excluded_at_depth() {
        let dir = setup_tree();
        let exe = std::env::current_exe().unwrap();
        let exe_name = exe.file_name().unwrap().to_str().unwrap();
        let nested = dir.path().join("sub/empty");
        fs::write(nested.join(exe_name), b"bin").unwrap();
        fs::write(nested.join("keep.txt"), b"keep").unwrap();

        let output = walk(dir.path(), Exclusions::new().with_current_exe());
        assert!(output.entries.iter().all(|e| e.name() != exe_name));
        assert!(output.entries.iter().any(|e| e.name() == "keep.txt"));

        let unfiltered = walk(dir.path(), Exclusions::new());
        assert!(unfiltered.entries.iter().any(|e| e.name() == exe_name));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_skips_subtree_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = setup_tree();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("hidden.txt"), b"x").unwrap();
        fs::write(dir.path().join("z.txt"), b"z").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not stop root.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let output = walk(dir.path(), Exclusions::new());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let names: Vec<&str> = output.entries.iter().map(EntryRecord::name).collect();
        let locked_record = output.entries.iter().find(|e| e.name() == "locked").unwrap();
        assert!(locked_record.is_directory());
        assert!(!names.contains(&"hidden.txt"), "got {names:?}");
        assert!(names.contains(&"a.txt"));
        assert!(names.contains(&"b.json"));
        assert!(names.contains(&"z.txt"));
        assert_eq!(output.skipped, 1);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_names_are_skipped() {
        use std::os::unix::ffi::OsStrExt;

        let dir = setup_tree();
        fs::write(dir.path().join(OsStr::from_bytes(b"bad\xff.txt")), b"x").unwrap();
        fs::write(dir.path().join(OsStr::from_bytes(b"bad\xfe.txt")), b"x").unwrap();
        let bad_dir = dir.path().join(OsStr::from_bytes(b"dir\xff"));
        fs::create_dir(&bad_dir).unwrap();
        fs::write(bad_dir.join("inner.txt"), b"x").unwrap();

        let output = walk(dir.path(), Exclusions::new());
        let names: Vec<&str> = output.entries.iter().map(EntryRecord::name).collect();
        assert!(names.iter().all(|n| !n.starts_with("bad") && *n != "inner.txt"), "got {names:?}");
        assert_eq!(output.skipped, 3);
        assert_eq!(output.entries.len(), 6);
    }
}
