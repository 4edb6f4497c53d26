//! Category-level view of a scan for the tabular report.
//!
//! Where the structured report answers "which file contained what", this
//! view answers "which values of each category were found anywhere". Values
//! are deduplicated per category across every file; categories whose names
//! produce the same label share one set.
use std::collections::{BTreeMap, BTreeSet};

use crate::results::FileMatchResult;

/// Suffix dropped from category names when building display labels
pub const CATEGORY_SUFFIX: &str = "_matches";

/// Display label to the distinct values found for it
pub type CategoryMatchSet = BTreeMap<String, BTreeSet<String>>;

/// Builds the deduplicated per-category view of `results`.
pub fn aggregate(results: &[FileMatchResult]) -> CategoryMatchSet {
    let mut grouped = CategoryMatchSet::new();
    for result in results {
        for (category, found) in &result.matches {
            if found.is_empty() {
                continue;
            }
            grouped
                .entry(category_label(category))
                .or_default()
                .extend(found.iter().cloned());
        }
    }
    grouped
}

/// Turns a category name into a display label.
///
/// `credit_card_matches` becomes `Credit Card`: the trailing
/// [`CATEGORY_SUFFIX`] is removed, `_` and `-` become spaces, and every
/// letter that follows a non-letter is upper-cased with the rest lowered.
pub fn category_label(category: &str) -> String {
    let base = category.strip_suffix(CATEGORY_SUFFIX).unwrap_or(category);

    let mut label = String::with_capacity(base.len());
    let mut prev_is_alpha = false;
    for c in base.chars() {
        let c = if c == '_' || c == '-' { ' ' } else { c };
        if c.is_alphabetic() {
            if prev_is_alpha {
                label.extend(c.to_lowercase());
            } else {
                label.extend(c.to_uppercase());
            }
            prev_is_alpha = true;
        } else {
            label.push(c);
            prev_is_alpha = false;
        }
    }
    label
}
