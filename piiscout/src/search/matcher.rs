use regex::Regex;
use std::path::Path;
use std::sync::Arc;

use crate::catalog::PatternCatalog;
use crate::results::FileMatchResult;

/// Applies a whole [`PatternCatalog`] to text content.
///
/// The catalog is held behind an `Arc` and never mutated, so a single
/// matcher can be cloned into every worker.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    catalog: Arc<PatternCatalog>,
}

impl PatternMatcher {
    /// Creates a new PatternMatcher over the given catalog
    pub fn new(catalog: Arc<PatternCatalog>) -> Self {
        Self { catalog }
    }

    /// Collects every non-overlapping match of every category in `text`.
    ///
    /// Within a category results are concatenated in matcher order.
    /// Categories without matches are left out of the result.
    pub fn find_matches(&self, path: &Path, text: &str) -> FileMatchResult {
        let mut result = FileMatchResult::new(path);
        for category in self.catalog.categories() {
            let found: Vec<String> = category
                .matchers()
                .iter()
                .flat_map(|regex| find_all(regex, text))
                .collect();
            result.insert(category.name(), found);
        }
        result
    }
}

/// Returns the matched strings of `regex` in `text`.
///
/// A regex with exactly one capture group reports that group (empty when
/// the group did not take part); any other regex reports the whole match.
pub fn find_all(regex: &Regex, text: &str) -> Vec<String> {
    if regex.captures_len() == 2 {
        regex
            .captures_iter(text)
            .map(|caps| caps.get(1).map_or("", |m| m.as_str()).to_string())
            .collect()
    } else {
        regex
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}
