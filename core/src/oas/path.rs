//! # Path Analysis
//!
//! Extracts `:name` placeholders from endpoint paths and renders the
//! OpenAPI path template (`/users/:id` -> `/users/{id}`).

use regex::Regex;
use std::sync::OnceLock;

/// A placeholder is one ASCII letter or underscore followed by letters, digits or underscores.
pub(crate) fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER_RE
        .get_or_init(|| Regex::new(r":([a-zA-Z_][a-zA-Z0-9_]*)").expect("Invalid regex"))
}

/// Result of analysing an endpoint path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    /// The OpenAPI path key, without query string or fragment.
    pub templated: String,
    /// Placeholder names in order of appearance, duplicates kept.
    ///
    /// Placeholders inside the query string or fragment are included.
    pub placeholders: Vec<String>,
}

/// Returns the part of `path` before the first `?` or `#`.
pub fn strip_query_and_fragment(path: &str) -> &str {
    match path.find(['?', '#']) {
        Some(idx) => &path[..idx],
        None => path,
    }
}

/// Analyses `path`.
///
/// e.g. `/users/:id?filter=:filter` -> `/users/{id}` with placeholders `["id", "filter"]`.
pub fn analyze_path(path: &str) -> PathTemplate {
    let re = placeholder_regex();
    let placeholders = re
        .captures_iter(path)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect();
    let templated = re.replace_all(strip_query_and_fragment(path), "{$1}").into_owned();

    PathTemplate {
        templated,
        placeholders,
    }
}
