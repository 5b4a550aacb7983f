// Entity extraction via pattern scanning
//
// Deliberately lexical, not structural: signatures are matched with
// line-anchored regexes and no brace or indentation tracking. Multi-line
// parameter lists, definitions inside string or comment bodies, and
// non-triple-quoted docstrings are known sources of under- and
// over-matching. That is the contract — best-effort structural hints for
// documentation, not a compiler front end. Malformed or binary content
// yields empty results, never an error.

mod entities;

pub use entities::{ClassEntity, FunctionEntity};

use regex::Regex;
use std::sync::LazyLock;

/// How far past a signature the docstring search looks, in characters.
/// Docstrings after very long signatures are missed; accepted limitation.
const DOCSTRING_WINDOW: usize = 1000;

static FUNCTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:async[ \t]+)?def\s+(\w+)\s*\(([^)]*)\)\s*(?:->\s*[^:]+?)?\s*:")
        .expect("function pattern is valid")
});

static CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*class\s+(\w+)\s*(?:\(([^)]*)\))?\s*:").expect("class pattern is valid")
});

static IMPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^import\s+([^\r\n]+)").expect("import pattern is valid"));

static FROM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^from\s+([^\r\n]+)").expect("from pattern is valid"));

static DOCSTRING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)"""(.*?)""""#).expect("docstring pattern is valid"));

/// Extract function definitions from source content, in source order.
pub fn extract_functions(content: &str) -> Vec<FunctionEntity> {
    FUNCTION_RE
        .captures_iter(content)
        .filter_map(|caps| {
            let m = caps.get(0)?;
            let name = caps.get(1)?.as_str();
            let params = caps.get(2).map(|p| p.as_str()).unwrap_or("");

            let mut func = FunctionEntity::new(name, line_of_offset(content, m.start()));
            func.parameters = parse_parameters(params);
            func.docstring = docstring_after(content, m.end());
            Some(func)
        })
        .collect()
}

/// Extract class declarations from source content, in source order.
pub fn extract_classes(content: &str) -> Vec<ClassEntity> {
    CLASS_RE
        .captures_iter(content)
        .filter_map(|caps| {
            let m = caps.get(0)?;
            let name = caps.get(1)?.as_str();

            let mut class = ClassEntity::new(name, line_of_offset(content, m.start()));
            if let Some(parents) = caps.get(2) {
                class.inherits_from = parents
                    .as_str()
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            class.docstring = docstring_after(content, m.end());
            Some(class)
        })
        .collect()
}

/// Extract raw import clauses: `import ...` statements first, then
/// `from ...` statements, without deduplication or resolution.
pub fn extract_imports(content: &str) -> Vec<String> {
    let mut imports: Vec<String> = IMPORT_RE
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect();

    imports.extend(
        FROM_RE
            .captures_iter(content)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().to_string()),
    );

    imports
}

/// 1-indexed line number of a byte offset.
fn line_of_offset(content: &str, offset: usize) -> usize {
    content[..offset].matches('\n').count() + 1
}

/// Windowed docstring search: the first triple-quoted literal within the
/// next `DOCSTRING_WINDOW` characters after a signature.
fn docstring_after(content: &str, position: usize) -> Option<String> {
    let tail = &content[position..];
    let window_end = tail
        .char_indices()
        .nth(DOCSTRING_WINDOW)
        .map(|(i, _)| i)
        .unwrap_or(tail.len());

    DOCSTRING_RE
        .captures(&tail[..window_end])
        .map(|caps| caps[1].trim().to_string())
}

/// Split a parameter list into bare identifiers: variadic (`*`-prefixed)
/// entries dropped, annotations and defaults stripped.
fn parse_parameters(params: &str) -> Vec<String> {
    params
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty() && !p.starts_with('*'))
        .map(|p| {
            let name = p.split(':').next().unwrap_or(p);
            let name = name.split('=').next().unwrap_or(name);
            name.trim().to_string()
        })
        .collect()
}
