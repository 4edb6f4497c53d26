/// Result types produced by a scan.
///
/// [`FileMatchResult`] is what a single match task yields for one file;
/// [`ScanOutput`] is the aggregate the engine's collector builds from them.
/// The structured (JSON) report is exactly `ScanOutput::file_results`,
/// serialized in arrival order with every duplicate kept.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::warn;

use crate::errors::ScanResult;
use crate::metrics::MetricsSnapshot;

/// Matches found in a single file, grouped by category.
///
/// Each category maps to the matched strings in the order they were found,
/// matcher by matcher. Categories with no matches are never present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMatchResult {
    /// Path of the scanned file, as produced by the walker
    pub filepath: String,
    /// Category name to matched substrings
    pub matches: BTreeMap<String, Vec<String>>,
}

impl FileMatchResult {
    pub fn new(path: &Path) -> Self {
        Self {
            filepath: path.to_string_lossy().into_owned(),
            matches: BTreeMap::new(),
        }
    }

    /// Records the matches of one category; an empty list is dropped.
    pub fn insert(&mut self, category: impl Into<String>, found: Vec<String>) {
        if !found.is_empty() {
            self.matches.insert(category.into(), found);
        }
    }

    /// True when no category has at least one match
    pub fn is_empty(&self) -> bool {
        self.matches.values().all(Vec::is_empty)
    }

    /// Number of matched strings across every category, duplicates included
    pub fn match_count(&self) -> usize {
        self.matches.values().map(Vec::len).sum()
    }
}

/// The complete, file-scoped result of a scan
#[derive(Debug, Clone, Default)]
pub struct ScanOutput {
    /// Per-file results in the order they reached the collector
    pub file_results: Vec<FileMatchResult>,
    /// Total number of matched strings, duplicates included
    pub total_matches: usize,
    /// Counters gathered while scanning
    pub stats: MetricsSnapshot,
    seen: HashSet<String>,
}

impl ScanOutput {
    /// Creates a new empty scan output
    pub fn new() -> Self {
        Default::default()
    }

    /// Appends a file result.
    ///
    /// Empty results are ignored and a path that is already present is
    /// rejected, so each file appears at most once. Returns whether the
    /// result was added.
    pub fn add_file_result(&mut self, file_result: FileMatchResult) -> bool {
        if file_result.is_empty() {
            return false;
        }
        if !self.seen.insert(file_result.filepath.clone()) {
            warn!(
                "Dropping duplicate result for {}",
                file_result.filepath
            );
            return false;
        }
        self.total_matches += file_result.match_count();
        self.file_results.push(file_result);
        true
    }

    /// Number of files with at least one match
    pub fn files_with_matches(&self) -> usize {
        self.file_results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file_results.is_empty()
    }

    /// Orders results by file path, for callers that want a stable order
    pub fn sort_by_path(&mut self) {
        self.file_results
            .sort_by(|a, b| a.filepath.cmp(&b.filepath));
    }

    /// Serializes the file results as the structured report (pretty JSON)
    pub fn to_json(&self) -> ScanResult<Vec<u8>> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.file_results.serialize(&mut serializer)?;
        Ok(buf)
    }

    /// Rebuilds a scan output from a structured report
    pub fn from_json(bytes: &[u8]) -> ScanResult<Self> {
        let file_results: Vec<FileMatchResult> = serde_json::from_slice(bytes)?;
        let mut output = Self::new();
        for file_result in file_results {
            output.add_file_result(file_result);
        }
        Ok(output)
    }
}

impl PartialEq for ScanOutput {
    fn eq(&self, other: &Self) -> bool {
        self.file_results == other.file_results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(path: &str, entries: &[(&str, &[&str])]) -> FileMatchResult {
        let mut r = FileMatchResult::new(Path::new(path));
        for (category, found) in entries {
            r.insert(*category, found.iter().map(|s| s.to_string()).collect());
        }
        r
    }

    #[test]
    fn test_file_result_insert_drops_empty() {
        let mut r = FileMatchResult::new(Path::new("a.txt"));
        r.insert("secret", vec![]);
        assert!(r.is_empty());
        assert!(r.matches.is_empty());

        r.insert("secret", vec!["x".to_string(), "x".to_string()]);
        assert!(!r.is_empty());
        assert_eq!(r.match_count(), 2);
    }

    #[test]
    fn test_scan_output_add_file_result() {
        let mut output = ScanOutput::new();

        assert!(output.add_file_result(result("a.txt", &[("secret", &["p=1", "p=1"])])));
        assert!(!output.add_file_result(result("b.txt", &[])));
        assert_eq!(output.files_with_matches(), 1);
        assert_eq!(output.total_matches, 2);

        // Same path again is rejected
        assert!(!output.add_file_result(result("a.txt", &[("email", &["a@b.com"])])));
        assert_eq!(output.files_with_matches(), 1);
        assert_eq!(output.total_matches, 2);
    }

    #[test]
    fn test_sort_by_path() {
        let mut output = ScanOutput::new();
        output.add_file_result(result("z.txt", &[("k", &["1"])]));
        output.add_file_result(result("a.txt", &[("k", &["2"])]));
        output.sort_by_path();
        assert_eq!(output.file_results[0].filepath, "a.txt");
        assert_eq!(output.file_results[1].filepath, "z.txt");
    }

    #[test]
    fn test_json_round_trip_keeps_order_and_duplicates() {
        let mut output = ScanOutput::new();
        output.add_file_result(result("z.txt", &[("secret", &["b", "a", "b"])]));
        output.add_file_result(result(
            "a.txt",
            &[("email", &["x@y.com"]), ("secret", &["c"])],
        ));

        let json = output.to_json().unwrap();
        let text = String::from_utf8(json.clone()).unwrap();
        assert!(text.contains("\n    {"), "expected 4-space indent: {text}");
        assert!(text.contains("\"filepath\": \"z.txt\""));

        let restored = ScanOutput::from_json(&json).unwrap();
        assert_eq!(restored, output);
        assert_eq!(restored.total_matches, 5);
        assert_eq!(
            restored.file_results[0].matches["secret"],
            vec!["b", "a", "b"]
        );
    }

    #[test]
    fn test_empty_output_serializes_to_empty_array() {
        let output = ScanOutput::new();
        assert_eq!(output.to_json().unwrap(), b"[]");
        assert!(ScanOutput::from_json(b"[]").unwrap().is_empty());
    }
}
