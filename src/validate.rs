// Reference validation
//
// Pure predicates gating what enters the pipeline. No network access:
// a repository reference is judged on shape alone.

use crate::classify;
use std::path::Path;
use url::Url;

/// Hosts accepted as code-hosting domains
const ACCEPTED_HOSTS: &[&str] = &["github.com", "gitlab.com", "bitbucket.org"];

/// Final path segments that name a sub-page rather than a repository
const NON_REPOSITORY_SEGMENTS: &[&str] = &["issues", "pulls", "wiki", "settings"];

/// Extensions whose language the extractor has pattern coverage for
const SUPPORTED_EXTENSIONS: &[&str] = &[
    ".py", ".jac", ".js", ".ts", ".java", ".cpp", ".c", ".h", ".md", ".txt", ".json", ".yaml",
    ".yml", ".xml", ".html", ".css",
];

/// Check whether a reference looks like a repository URL: http(s) scheme,
/// an accepted code-hosting domain, and an owner/repository path that does
/// not end in a known sub-page.
pub fn validate_repository_reference(reference: &str) -> bool {
    if reference.is_empty() {
        return false;
    }

    let Ok(url) = Url::parse(reference) else {
        return false;
    };

    if url.scheme() != "http" && url.scheme() != "https" {
        return false;
    }

    let Some(host) = url.host_str() else {
        return false;
    };
    if !is_accepted_host(host) {
        return false;
    }

    let segments: Vec<&str> = url
        .path()
        .trim_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    if segments.len() < 2 {
        return false;
    }

    match segments.last() {
        Some(last) => !NON_REPOSITORY_SEGMENTS.contains(last),
        None => false,
    }
}

/// Check whether the file's language has extraction support.
pub fn validate_language_support(path: &Path) -> bool {
    SUPPORTED_EXTENSIONS.contains(&classify::get_file_extension(path).as_str())
}

fn is_accepted_host(host: &str) -> bool {
    ACCEPTED_HOSTS
        .iter()
        .any(|accepted| host == *accepted || host.ends_with(&format!(".{}", accepted)))
}
