// Line and complexity metrics
//
// The complexity score is a raw substring count over decision keywords and
// logical connectives. It is a heuristic upper bound on cyclomatic
// complexity, not a control-flow-graph metric: occurrences inside strings
// and comments count too. Good enough to rank files for documentation.

use crate::classify;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Decision-point keywords counted toward complexity
const DECISION_KEYWORDS: &[&str] = &[
    "if ", "elif ", "for ", "while ", "with ", "try:", "except", "finally:",
];

/// Logical connectives counted toward complexity
const LOGICAL_OPERATORS: &[&str] = &[" and ", " or ", " not "];

/// Line-comment marker used for comment/code classification
const COMMENT_MARKER: &str = "#";

/// Per-file line metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FileMetrics {
    /// Total lines in file
    pub total_lines: usize,
    /// Lines of code (non-blank, non-comment)
    pub code_lines: usize,
    /// Comment lines
    pub comment_lines: usize,
    /// Blank lines
    pub blank_lines: usize,
    /// comment_lines / total_lines, 0 for empty content
    pub comment_ratio: f64,
    /// File size in bytes
    pub file_size: u64,
}

impl FileMetrics {
    /// Compute line metrics from content already in memory.
    pub fn from_content(content: &str, file_size: u64) -> Self {
        let mut total_lines = 0;
        let mut code_lines = 0;
        let mut comment_lines = 0;
        let mut blank_lines = 0;

        for line in content.split('\n') {
            total_lines += 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                blank_lines += 1;
            } else if trimmed.starts_with(COMMENT_MARKER) {
                comment_lines += 1;
            } else {
                code_lines += 1;
            }
        }

        let comment_ratio = if total_lines > 0 {
            comment_lines as f64 / total_lines as f64
        } else {
            0.0
        };

        Self {
            total_lines,
            code_lines,
            comment_lines,
            blank_lines,
            comment_ratio,
            file_size,
        }
    }
}

/// Approximate cyclomatic complexity of source content.
///
/// Starts at 1 and adds one per textual occurrence of each decision
/// keyword and logical connective.
pub fn calculate_cyclomatic_complexity(content: &str) -> usize {
    let mut complexity = 1;

    for keyword in DECISION_KEYWORDS {
        complexity += content.matches(keyword).count();
    }

    for op in LOGICAL_OPERATORS {
        complexity += content.matches(op).count();
    }

    complexity
}

/// Calculate metrics for a file on disk, reading under the size guard.
///
/// Returns None when the file is missing, unreadable, or over the cap.
pub fn calculate_file_metrics(path: &Path, max_size: u64) -> Option<FileMetrics> {
    let content = classify::read_file_content(path, max_size)?;
    let file_size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    Some(FileMetrics::from_content(&content, file_size))
}
