//! # Tag Inference
//!
//! Derives the default grouping tag of an operation from its path.

use crate::oas::path::{placeholder_regex, strip_query_and_fragment};
use std::sync::Arc;

/// Custom tag function: receives the raw endpoint path and returns its tags.
///
/// An empty list omits `tags` from the operation.
pub type TagsFn = Arc<dyn Fn(&str) -> Vec<String> + Send + Sync>;

/// Returns the last static segment of `path` as its only tag.
///
/// e.g. `/users/:id` -> `["users"]`, `/:id` -> `[]`
pub fn tags_from_path(path: &str) -> Vec<String> {
    let without_params = placeholder_regex().replace_all(strip_query_and_fragment(path), "");
    let last = without_params
        .split('/')
        .filter(|segment| !segment.is_empty())
        .next_back()
        .map(str::to_string);
    last.into_iter().collect()
}

/// The default [`TagsFn`].
pub fn default_tags_fn() -> TagsFn {
    Arc::new(tags_from_path)
}
