// Project-wide aggregation
//
// Walks a directory tree, classifies and reads each file under the size
// guard, and folds per-file metrics and extracted entities into
// project-level aggregates. No per-file problem is fatal: oversized files
// are skipped and recorded, unreadable files become error entries, and the
// walk continues. Traversal is sorted by file name so aggregate ordering
// (and therefore diagram output) is deterministic.

use crate::classify::{self, SourceFile};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::extract::{self, ClassEntity, FunctionEntity};
use crate::metrics::FileMetrics;
use crate::render::FileTreeNode;
use glob::Pattern;
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Directories never descended into
const SKIP_DIRS: &[&str] = &[
    "__pycache__",
    "node_modules",
    ".git",
    "target",
    "venv",
    ".venv",
    "dist",
    "build",
    ".tox",
    ".eggs",
];

/// A file excluded from aggregation because it exceeded the size cap
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub size: u64,
}

/// A per-file failure recorded during traversal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileError {
    pub path: PathBuf,
    pub message: String,
}

/// Project-wide metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectMetrics {
    /// Files analyzed (skipped and failed files are not counted)
    pub total_files: usize,
    /// Total lines across analyzed files
    pub total_lines: usize,
    /// Total bytes across analyzed files
    pub total_size: u64,
    /// Per-extension metrics, insertion order = traversal order
    pub files_by_type: IndexMap<String, Vec<FileMetrics>>,
    /// Files skipped for exceeding the size cap
    pub skipped: Vec<SkippedFile>,
    /// Files that could not be statted or read
    pub read_errors: Vec<FileError>,
}

/// Result of analyzing a codebase
#[derive(Debug, Default, Serialize)]
pub struct AnalysisResult {
    /// Project-wide metrics
    pub metrics: ProjectMetrics,
    /// All functions, keyed by name, last definition wins on collision
    pub functions: IndexMap<String, FunctionEntity>,
    /// All classes, keyed by name, last declaration wins on collision
    pub classes: IndexMap<String, ClassEntity>,
    /// Raw import clauses in traversal order, not deduplicated
    pub imports: Vec<String>,
}

/// Everything computed from one file's content
struct FileAnalysis {
    metrics: FileMetrics,
    functions: Vec<FunctionEntity>,
    classes: Vec<ClassEntity>,
    imports: Vec<String>,
}

/// Walks a tree and aggregates metrics and entities
pub struct Analyzer {
    config: Config,
    exclude: Vec<Pattern>,
}

impl Analyzer {
    /// Create a new analyzer with the given configuration
    pub fn new(config: Config) -> Result<Self> {
        let exclude = config
            .analysis
            .exclude
            .iter()
            .map(|p| Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self { config, exclude })
    }

    /// Analyze a codebase at the given path
    pub fn analyze(&self, root: &Path) -> Result<AnalysisResult> {
        if !root.exists() {
            return Err(Error::PathNotFound(root.to_path_buf()));
        }

        let mut result = AnalysisResult::default();
        let mut candidates: Vec<SourceFile> = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(self.config.analysis.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_pruned_entry(e))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                    warn!(path = %path.display(), error = %e, "traversal error");
                    result.metrics.read_errors.push(FileError {
                        path,
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            if self.is_excluded(entry.path(), root) {
                continue;
            }

            let source = match SourceFile::from_path(entry.path()) {
                Ok(source) => source,
                Err(e) => {
                    result.metrics.read_errors.push(FileError {
                        path: entry.path().to_path_buf(),
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            if !source.is_text {
                continue;
            }

            if source.size > self.config.analysis.max_file_size {
                warn!(path = %source.path.display(), size = source.size, "skipping oversized file");
                result.metrics.skipped.push(SkippedFile {
                    path: source.path,
                    size: source.size,
                });
                continue;
            }

            candidates.push(source);
        }

        // Per-file extraction is pure, so it parallelizes freely; collect
        // preserves traversal order and the merge below is the single
        // writer into the aggregate maps.
        let max_size = self.config.analysis.max_file_size;
        let analyzed: Vec<(SourceFile, Option<FileAnalysis>)> = candidates
            .into_par_iter()
            .map(|source| {
                let analysis = analyze_file(&source, max_size);
                (source, analysis)
            })
            .collect();

        for (source, analysis) in analyzed {
            let Some(analysis) = analysis else {
                result.metrics.read_errors.push(FileError {
                    path: source.path,
                    message: "file became unreadable during analysis".to_string(),
                });
                continue;
            };

            debug!(path = %source.path.display(), lines = analysis.metrics.total_lines, "analyzed");

            result.metrics.total_files += 1;
            result.metrics.total_lines += analysis.metrics.total_lines;
            result.metrics.total_size += analysis.metrics.file_size;
            result
                .metrics
                .files_by_type
                .entry(source.extension)
                .or_default()
                .push(analysis.metrics);

            for func in analysis.functions {
                result.functions.insert(func.name.clone(), func);
            }
            for class in analysis.classes {
                result.classes.insert(class.name.clone(), class);
            }
            result.imports.extend(analysis.imports);
        }

        Ok(result)
    }

    /// Calculate project-wide metrics for a directory tree
    pub fn calculate_project_metrics(&self, root: &Path) -> Result<ProjectMetrics> {
        self.analyze(root).map(|r| r.metrics)
    }

    /// Build a file tree for diagram rendering, pruning the same
    /// directories the walk prunes. Symlinks are never descended here, so
    /// link cycles cannot recurse.
    pub fn build_file_tree(&self, root: &Path) -> Result<FileTreeNode> {
        if !root.is_dir() {
            return Err(Error::PathNotFound(root.to_path_buf()));
        }

        let name = root
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(".")
            .to_string();
        Ok(tree_node(root, name))
    }

    fn is_excluded(&self, path: &Path, root: &Path) -> bool {
        let relative = path.strip_prefix(root).unwrap_or(path);
        self.exclude.iter().any(|p| p.matches_path(relative))
    }
}

fn analyze_file(source: &SourceFile, max_size: u64) -> Option<FileAnalysis> {
    let content = classify::read_file_content(&source.path, max_size)?;

    Some(FileAnalysis {
        metrics: FileMetrics::from_content(&content, source.size),
        functions: extract::extract_functions(&content),
        classes: extract::extract_classes(&content),
        imports: extract::extract_imports(&content),
    })
}

fn is_pruned_name(name: &str) -> bool {
    name.starts_with('.') || SKIP_DIRS.contains(&name)
}

fn is_pruned_entry(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_dir() && is_pruned_name(&entry.file_name().to_string_lossy())
}

fn tree_node(path: &Path, name: String) -> FileTreeNode {
    let mut node = FileTreeNode::directory(name);

    let Ok(entries) = std::fs::read_dir(path) else {
        return node;
    };

    let mut entries: Vec<_> = entries.filter_map(|e| e.ok()).collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let child_name = entry.file_name().to_string_lossy().into_owned();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            if is_pruned_name(&child_name) {
                continue;
            }
            node.children.push(tree_node(&entry.path(), child_name));
        } else if file_type.is_file() {
            node.children.push(FileTreeNode::file(child_name));
        }
    }

    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_project() -> TempDir {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(&src).unwrap();

        fs::write(
            src.join("main.py"),
            r#""""Main module."""
import os
from utils import helper

def main():
    """Entry point."""
    helper()

class App(Base):
    """Application."""
    pass
"#,
        )
        .unwrap();

        fs::write(
            src.join("utils.py"),
            r#"# helpers

def helper(value, count=2):
    """A helper function."""
    return value * count
"#,
        )
        .unwrap();

        fs::write(dir.path().join("README.md"), "# Test\n").unwrap();
        fs::write(dir.path().join("image.png"), [0u8; 16]).unwrap();

        dir
    }

    fn default_analyzer() -> Analyzer {
        Analyzer::new(Config::default()).expect("analyzer")
    }

    #[test]
    fn test_analyze_counts_text_files_only() {
        let dir = create_test_project();
        let result = default_analyzer().analyze(dir.path()).unwrap();

        // main.py, utils.py, README.md; the png is not a text file
        assert_eq!(result.metrics.total_files, 3);
        assert!(result.metrics.total_lines > 0);
        assert!(result.metrics.total_size > 0);
        assert!(result.metrics.skipped.is_empty());
        assert!(result.metrics.read_errors.is_empty());
    }

    #[test]
    fn test_analyze_groups_by_extension() {
        let dir = create_test_project();
        let result = default_analyzer().analyze(dir.path()).unwrap();

        assert_eq!(result.metrics.files_by_type[".py"].len(), 2);
        assert_eq!(result.metrics.files_by_type[".md"].len(), 1);
    }

    #[test]
    fn test_analyze_collects_entities() {
        let dir = create_test_project();
        let result = default_analyzer().analyze(dir.path()).unwrap();

        assert!(result.functions.contains_key("main"));
        assert!(result.functions.contains_key("helper"));
        assert_eq!(result.functions["helper"].parameters, vec!["value", "count"]);
        assert_eq!(result.classes["App"].inherits_from, vec!["Base"]);
        assert!(result.imports.iter().any(|i| i == "os"));
    }

    #[test]
    fn test_analyze_last_write_wins_on_collision() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.py"), "def dup(x):\n    pass\n").unwrap();
        fs::write(dir.path().join("b.py"), "def dup(y):\n    pass\n").unwrap();

        let result = default_analyzer().analyze(dir.path()).unwrap();

        // Sorted traversal visits a.py then b.py; the later definition wins.
        assert_eq!(result.functions.len(), 1);
        assert_eq!(result.functions["dup"].parameters, vec!["y"]);
    }

    #[test]
    fn test_analyze_records_oversized_skip() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("small.py"),
            "x = 1\n".repeat(12),
        )
        .unwrap();
        fs::write(dir.path().join("huge.py"), "y = 2\n".repeat(100)).unwrap();

        let mut config = Config::default();
        config.analysis.max_file_size = 100;
        let analyzer = Analyzer::new(config).unwrap();
        let result = analyzer.analyze(dir.path()).unwrap();

        assert_eq!(result.metrics.total_files, 1);
        assert_eq!(result.metrics.total_lines, 13);
        assert_eq!(result.metrics.total_size, 72);
        assert_eq!(result.metrics.skipped.len(), 1);
        assert!(result.metrics.skipped[0].path.ends_with("huge.py"));
        assert_eq!(result.metrics.skipped[0].size, 600);
    }

    #[test]
    fn test_analyze_prunes_skip_dirs() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("keep.py"), "x = 1\n").unwrap();

        let cache = dir.path().join("__pycache__");
        fs::create_dir_all(&cache).unwrap();
        fs::write(cache.join("ignored.py"), "y = 2\n").unwrap();

        let hidden = dir.path().join(".hidden");
        fs::create_dir_all(&hidden).unwrap();
        fs::write(hidden.join("also_ignored.py"), "z = 3\n").unwrap();

        let result = default_analyzer().analyze(dir.path()).unwrap();
        assert_eq!(result.metrics.total_files, 1);
    }

    #[test]
    fn test_analyze_applies_exclude_globs() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("keep.py"), "x = 1\n").unwrap();
        let gen = dir.path().join("generated");
        fs::create_dir_all(&gen).unwrap();
        fs::write(gen.join("skip.py"), "y = 2\n").unwrap();

        let mut config = Config::default();
        config.analysis.exclude.push("generated/**".to_string());
        let analyzer = Analyzer::new(config).unwrap();

        let result = analyzer.analyze(dir.path()).unwrap();
        assert_eq!(result.metrics.total_files, 1);
    }

    #[test]
    fn test_analyze_nonexistent_path() {
        let result = default_analyzer().analyze(Path::new("/nonexistent/path"));
        assert!(matches!(result, Err(Error::PathNotFound(_))));
    }

    #[test]
    fn test_analyze_empty_directory() {
        let dir = TempDir::new().unwrap();
        let result = default_analyzer().analyze(dir.path()).unwrap();

        assert_eq!(result.metrics.total_files, 0);
        assert!(result.functions.is_empty());
    }

    #[test]
    fn test_analyzer_rejects_bad_glob() {
        let mut config = Config::default();
        config.analysis.exclude.push("[".to_string());
        assert!(Analyzer::new(config).is_err());
    }

    #[test]
    fn test_calculate_project_metrics() {
        let dir = create_test_project();
        let metrics = default_analyzer()
            .calculate_project_metrics(dir.path())
            .unwrap();

        assert_eq!(metrics.total_files, 3);
        assert_eq!(metrics.files_by_type.len(), 2);
    }

    #[test]
    fn test_build_file_tree() {
        let dir = create_test_project();
        let tree = default_analyzer().build_file_tree(dir.path()).unwrap();

        let names: Vec<&str> = tree.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["README.md", "image.png", "src"]);

        let src = tree
            .children
            .iter()
            .find(|c| c.name == "src")
            .expect("src node");
        assert_eq!(src.children.len(), 2);
        assert_eq!(src.children[0].name, "main.py");
    }

    #[test]
    fn test_build_file_tree_prunes() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::create_dir_all(dir.path().join("node_modules")).unwrap();
        fs::write(dir.path().join("a.py"), "x = 1\n").unwrap();

        let tree = default_analyzer().build_file_tree(dir.path()).unwrap();
        assert_eq!(tree.children.len(), 1);
        assert_eq!(tree.children[0].name, "a.py");
    }

    #[test]
    fn test_build_file_tree_on_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.py");
        fs::write(&file, "x = 1\n").unwrap();

        assert!(default_analyzer().build_file_tree(&file).is_err());
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let dir = create_test_project();
        let analyzer = default_analyzer();

        let first = analyzer.analyze(dir.path()).unwrap();
        let second = analyzer.analyze(dir.path()).unwrap();

        let first_json = serde_json::to_string(&first).unwrap();
        let second_json = serde_json::to_string(&second).unwrap();
        assert_eq!(first_json, second_json);
    }
}
