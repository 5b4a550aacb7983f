// File classification for Scrivener
//
// Pure predicates deciding whether a path enters the pipeline: extension
// lookup, text-file detection, and size bounding. No file is ever truncated;
// anything over the cap is skipped whole.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Extensions treated as text for analysis purposes
const TEXT_EXTENSIONS: &[&str] = &[
    ".py", ".jac", ".md", ".txt", ".js", ".ts", ".java", ".cpp", ".c", ".h", ".json", ".yaml",
    ".yml", ".xml", ".html", ".css", ".sh", ".bat", ".ps1",
];

/// A classified file seen during traversal. Transient: created per
/// traversal step, folded into aggregates, then dropped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Lowercased extension including the leading dot, or empty
    pub extension: String,
    /// Size in bytes
    pub size: u64,
    pub is_text: bool,
}

impl SourceFile {
    /// Classify a path, statting it for its size.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let meta = std::fs::metadata(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            extension: get_file_extension(path),
            size: meta.len(),
            is_text: is_text_file(path),
        })
    }
}

/// Get the lowercased file extension including the leading dot.
///
/// Returns an empty string when the path has no extension.
pub fn get_file_extension(path: &Path) -> String {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!(".{}", ext.to_lowercase()),
        None => String::new(),
    }
}

/// Check whether a path looks like a text file based on its extension.
pub fn is_text_file(path: &Path) -> bool {
    TEXT_EXTENSIONS.contains(&get_file_extension(path).as_str())
}

/// Check whether a file's size is within `max_size` bytes.
///
/// Returns false on stat failure rather than erroring; a file we cannot
/// stat is a file we will not read.
pub fn validate_file_size(path: &Path, max_size: u64) -> bool {
    match std::fs::metadata(path) {
        Ok(meta) => meta.len() <= max_size,
        Err(_) => false,
    }
}

/// Read a file's content under the size guard.
///
/// Returns None for missing, unreadable, or oversized files. Content is
/// decoded lossily, so invalid UTF-8 degrades rather than fails.
pub fn read_file_content(path: &Path, max_size: u64) -> Option<String> {
    let meta = std::fs::metadata(path).ok()?;
    if meta.len() > max_size {
        warn!(
            path = %path.display(),
            size = meta.len(),
            "file exceeds size cap, skipping"
        );
        return None;
    }

    match std::fs::read(path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read file");
            None
        }
    }
}

/// Total size in bytes of all regular files under a directory.
///
/// Unreadable entries are ignored.
pub fn directory_size(path: &Path) -> u64 {
    walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}
