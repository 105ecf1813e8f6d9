//! Record and result types shared by the walker, store and query layers.

use serde::Serialize;

use super::classify::FileType;
use crate::constants::DIRECTORY_TYPE_LABEL;

/// Whether an entry is a file or a directory.
///
/// Stored as the `is_directory` column. Symlinks and other special files are
/// indexed as files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// Metadata for one filesystem object found during a walk.
///
/// Constructed through [`EntryRecord::file`] or [`EntryRecord::directory`]
/// so that a directory always has size 0 and the `"directory"` label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRecord {
    full_path: String,
    name: String,
    size_bytes: u64,
    type_label: String,
    kind: EntryKind,
    relative_path: String,
    modified_at: i64,
}

impl EntryRecord {
    /// A file entry, labelled by [`classify`](super::classify).
    pub fn file(
        full_path: impl Into<String>,
        name: impl Into<String>,
        relative_path: impl Into<String>,
        size_bytes: u64,
        file_type: FileType,
        modified_at: i64,
    ) -> Self {
        Self {
            full_path: full_path.into(),
            name: name.into(),
            size_bytes,
            type_label: file_type.as_str().to_string(),
            kind: EntryKind::File,
            relative_path: relative_path.into(),
            modified_at,
        }
    }

    /// A directory entry.
    pub fn directory(
        full_path: impl Into<String>,
        name: impl Into<String>,
        relative_path: impl Into<String>,
        modified_at: i64,
    ) -> Self {
        Self {
            full_path: full_path.into(),
            name: name.into(),
            size_bytes: 0,
            type_label: DIRECTORY_TYPE_LABEL.to_string(),
            kind: EntryKind::Directory,
            relative_path: relative_path.into(),
            modified_at,
        }
    }

    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn type_label(&self) -> &str {
        &self.type_label
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    /// Source mtime in unix seconds.
    pub fn modified_at(&self) -> i64 {
        self.modified_at
    }
}

/// A row read back from the index, including write bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexedEntry {
    pub full_path: String,
    pub name: String,
    pub size_bytes: u64,
    pub type_label: String,
    pub is_directory: bool,
    pub relative_path: String,
    pub modified_at: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// One page of search results plus the unpaginated match count.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    pub entries: Vec<IndexedEntry>,
    pub total: u64,
}

/// Number of files carrying one type label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCount {
    pub type_label: String,
    pub count: u64,
}

/// Aggregate counts over the whole index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub total_files: u64,
    pub total_directories: u64,
    pub total_size_bytes: u64,
    /// File counts per type label, most common first.
    pub file_types: Vec<TypeCount>,
}
