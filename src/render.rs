// Mermaid diagram generation
//
// Renders entity maps and file trees into a restricted Mermaid dialect: one
// header line, one line per node (`id["label"]`), one line per directed edge
// (`a --> b`). Rendering is pure; identical ordered input always produces
// identical text, which is why the entity maps are insertion-ordered.

use crate::extract::{ClassEntity, FunctionEntity};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A node in a repository file tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileTreeNode {
    /// File or directory name (not a full path)
    pub name: String,
    pub kind: TreeNodeKind,
    /// Child nodes, in traversal order; empty for files
    pub children: Vec<FileTreeNode>,
}

/// Kind of file-tree node
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TreeNodeKind {
    Directory,
    File,
}

impl FileTreeNode {
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TreeNodeKind::Directory,
            children: Vec::new(),
        }
    }

    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TreeNodeKind::File,
            children: Vec::new(),
        }
    }
}

/// Diagram generator for creating Mermaid diagrams
pub struct DiagramGenerator {
    /// Layout direction (TD, LR, BT, RL)
    direction: String,
}

impl DiagramGenerator {
    /// Create a new diagram generator
    pub fn new() -> Self {
        Self {
            direction: "TD".to_string(),
        }
    }

    /// Set layout direction
    pub fn with_direction(mut self, dir: &str) -> Self {
        self.direction = dir.to_string();
        self
    }

    fn header(&self) -> String {
        format!("graph {}", self.direction)
    }

    /// Generate a call graph from a name-keyed function map.
    ///
    /// One node per function; one edge per entry in its `calls` list. The
    /// extractor never fills `calls`, so edges only appear when a
    /// collaborator resolved them. An empty map yields a placeholder
    /// diagram, never an empty string.
    pub fn generate_call_graph(&self, functions: &IndexMap<String, FunctionEntity>) -> String {
        let mut lines = vec![self.header()];

        if functions.is_empty() {
            lines.push("    none[\"No functions found\"]".to_string());
            return lines.join("\n");
        }

        for (name, func) in functions {
            let id = sanitize_id(name);
            lines.push(format!("    {}[\"{}()\"]", id, name));

            for called in &func.calls {
                lines.push(format!("    {} --> {}", id, sanitize_id(called)));
            }
        }

        lines.join("\n")
    }

    /// Generate an inheritance graph from a name-keyed class map.
    ///
    /// Edges run parent --> child. Parents are raw unresolved names, so an
    /// unknown parent simply becomes a new node with no declaration line;
    /// nothing is deduplicated or case-normalized.
    pub fn generate_inheritance_graph(&self, classes: &IndexMap<String, ClassEntity>) -> String {
        let mut lines = vec![self.header()];

        if classes.is_empty() {
            lines.push("    none[\"No classes found\"]".to_string());
            return lines.join("\n");
        }

        for (name, class) in classes {
            let id = sanitize_id(name);
            lines.push(format!("    {}[\"{}\"]", id, name));

            for parent in &class.inherits_from {
                lines.push(format!("    {} --> {}", sanitize_id(parent), id));
            }
        }

        lines.join("\n")
    }

    /// Generate a file-structure diagram by pre-order traversal.
    ///
    /// Node ids come from names with dots and hyphens replaced, so two
    /// distinct names can collide into one id. Accepted ambiguity.
    pub fn generate_file_structure_tree(&self, tree: Option<&FileTreeNode>) -> String {
        let mut lines = vec![self.header()];

        match tree {
            None => {
                lines.push("    none[\"Empty repository\"]".to_string());
            }
            Some(root) => {
                self.render_tree_node(root, None, &mut lines);
            }
        }

        lines.join("\n")
    }

    fn render_tree_node(&self, node: &FileTreeNode, parent: Option<&str>, lines: &mut Vec<String>) {
        let id = sanitize_id(&node.name);

        let label = match node.kind {
            TreeNodeKind::Directory => format!("\u{1F4C1} {}", node.name),
            TreeNodeKind::File => format!("\u{1F4C4} {}", node.name),
        };
        lines.push(format!("    {}[\"{}\"]", id, label));

        if let Some(parent_id) = parent {
            lines.push(format!("    {} --> {}", parent_id, id));
        }

        for child in &node.children {
            self.render_tree_node(child, Some(&id), lines);
        }
    }
}

impl Default for DiagramGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive a Mermaid-safe node id: dots and hyphens are illegal in the
/// identifier grammar and become underscores.
fn sanitize_id(s: &str) -> String {
    s.replace(['.', '-'], "_")
}
