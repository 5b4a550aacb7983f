//! Scrivener - Extract structural facts from codebases
//!
//! Scans source trees with lightweight pattern matching (no language
//! grammar), computes size and complexity metrics, and renders the
//! extracted entities as Mermaid diagram markup for downstream
//! documentation tooling.

pub mod classify;
pub mod config;
pub mod error;
pub mod extract;
pub mod metrics;
pub mod project;
pub mod render;
pub mod validate;

// Re-export main types
pub use config::Config;
pub use error::{Error, Result};
pub use extract::{ClassEntity, FunctionEntity};
pub use metrics::FileMetrics;
pub use project::{AnalysisResult, Analyzer, ProjectMetrics};
pub use render::{DiagramGenerator, FileTreeNode};
