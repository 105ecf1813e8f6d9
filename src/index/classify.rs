//! Extension-based file type classification.

use std::fmt;
use std::path::Path;

use serde::Serialize;

/// Coarse category assigned to a file from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    JavaScript,
    TypeScript,
    Json,
    Text,
    Markdown,
    Html,
    Css,
    Image,
    Video,
    Audio,
    Document,
    Archive,
    /// Extension present but not in the mapping.
    Other,
    /// No extension at all.
    Unknown,
}

impl FileType {
    /// The label stored in the index and used by the type filter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Json => "json",
            Self::Text => "text",
            Self::Markdown => "markdown",
            Self::Html => "html",
            Self::Css => "css",
            Self::Image => "image",
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Document => "document",
            Self::Archive => "archive",
            Self::Other => "other",
            Self::Unknown => "unknown",
        }
    }

    fn from_extension(ext: &str) -> Self {
        match ext {
            "js" | "mjs" | "cjs" | "jsx" => Self::JavaScript,
            "ts" | "mts" | "cts" | "tsx" => Self::TypeScript,
            "json" => Self::Json,
            "txt" | "log" => Self::Text,
            "md" | "markdown" => Self::Markdown,
            "html" | "htm" => Self::Html,
            "css" => Self::Css,
            "png" | "jpg" | "jpeg" | "gif" | "svg" | "webp" | "bmp" | "ico" => Self::Image,
            "mp4" | "avi" | "mkv" | "mov" | "webm" => Self::Video,
            "mp3" | "wav" | "flac" | "ogg" | "m4a" => Self::Audio,
            "pdf" | "doc" | "docx" | "xls" | "xlsx" | "ppt" | "pptx" | "odt" => Self::Document,
            "zip" | "rar" | "7z" | "tar" | "gz" | "tgz" | "bz2" | "xz" => Self::Archive,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a file by the lowercase text after its final `.`.
///
/// Dotfiles such as `.bashrc` and names ending in a bare `.` have no
/// extension and classify as [`FileType::Unknown`].
///
/// ```
/// use fidx::index::{FileType, classify};
///
/// assert_eq!(classify("report.docx"), FileType::Document);
/// assert_eq!(classify("archive.tar.gz"), FileType::Archive);
/// assert_eq!(classify("README"), FileType::Unknown);
/// ```
pub fn classify(name: impl AsRef<Path>) -> FileType {
    match name.as_ref().extension() {
        Some(ext) if !ext.is_empty() => {
            FileType::from_extension(&ext.to_string_lossy().to_ascii_lowercase())
        },
        _ => FileType::Unknown,
    }
}
