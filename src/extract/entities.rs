// Entity types extracted from source text
//
// These are structural facts, not AST nodes: a pattern scan produced them,
// so fields like `inherits_from` hold raw unresolved names exactly as
// written. They are serializable for caching and downstream rendering.

use serde::{Deserialize, Serialize};

/// A function definition found in source text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionEntity {
    /// Function name
    pub name: String,
    /// Bare parameter names, variadic markers excluded
    pub parameters: Vec<String>,
    /// Docstring, when one was found within the search window
    pub docstring: Option<String>,
    /// 1-indexed line of the definition
    pub line_start: usize,
    /// Names this function calls. The extractor never fills this; an
    /// external collaborator may.
    pub calls: Vec<String>,
}

impl FunctionEntity {
    pub fn new(name: &str, line_start: usize) -> Self {
        Self {
            name: name.to_string(),
            parameters: Vec::new(),
            docstring: None,
            line_start,
            calls: Vec::new(),
        }
    }

    /// Check if this is a private function (starts with _)
    pub fn is_private(&self) -> bool {
        self.name.starts_with('_') && !self.name.starts_with("__")
    }
}

/// A class definition found in source text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassEntity {
    /// Class name
    pub name: String,
    /// Parent names as written, in declaration order, unresolved
    pub inherits_from: Vec<String>,
    /// Docstring, when one was found within the search window
    pub docstring: Option<String>,
    /// 1-indexed line of the declaration
    pub line_start: usize,
}

impl ClassEntity {
    pub fn new(name: &str, line_start: usize) -> Self {
        Self {
            name: name.to_string(),
            inherits_from: Vec::new(),
            docstring: None,
            line_start,
        }
    }

    /// Check if this appears to be an exception class
    pub fn is_exception(&self) -> bool {
        self.inherits_from
            .iter()
            .any(|b| b.contains("Exception") || b.contains("Error"))
    }
}
