//! The pattern catalog: named categories of case-insensitive regexes.
//!
//! A pattern source maps each category name to either a single pattern or
//! an ordered list of patterns:
//!
//! ```json
//! {
//!     "email_matches": "[a-z0-9._%+-]+@[a-z0-9.-]+\\.[a-z]{2,}",
//!     "secret": ["password\\s*=\\s*\\S+", "api[_-]?key\\s*[:=]\\s*\\S+"],
//!     "unused": []
//! }
//! ```
//!
//! Both shapes are normalized into an ordered list of compiled matchers at
//! load time, so nothing downstream has to care which one was written.
//! Every pattern is compiled eagerly; one bad pattern fails the whole load.
use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::errors::{ScanError, ScanResult};

/// Format of a pattern source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Yaml,
}

impl SourceFormat {
    /// Picks the format from the file extension; anything that is not
    /// `.yaml`/`.yml` is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                SourceFormat::Yaml
            }
            _ => SourceFormat::Json,
        }
    }
}

/// The value attached to a category in a pattern source
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PatternSpec {
    Single(String),
    Many(Vec<String>),
}

impl PatternSpec {
    fn into_patterns(self) -> Vec<String> {
        match self {
            PatternSpec::Single(pattern) => vec![pattern],
            PatternSpec::Many(patterns) => patterns,
        }
    }
}

/// A named group of compiled matchers
#[derive(Debug, Clone)]
pub struct Category {
    name: String,
    matchers: Vec<Regex>,
}

impl Category {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Matchers in the order they were listed in the source
    pub fn matchers(&self) -> &[Regex] {
        &self.matchers
    }
}

/// Compiled, immutable set of categories shared read-only by every worker
#[derive(Debug, Clone, Default)]
pub struct PatternCatalog {
    categories: Vec<Category>,
}

impl PatternCatalog {
    /// Loads and compiles a pattern source file.
    pub fn load(path: &Path) -> ScanResult<Self> {
        if !path.is_file() {
            return Err(ScanError::config_error(format!(
                "pattern source is not a readable file: {}",
                path.display()
            )));
        }
        let contents = fs::read_to_string(path).map_err(|e| {
            ScanError::config_error(format!(
                "failed to read pattern source {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&contents, SourceFormat::from_path(path))
    }

    /// Parses and compiles pattern source text.
    pub fn parse(contents: &str, format: SourceFormat) -> ScanResult<Self> {
        let sources: BTreeMap<String, PatternSpec> = match format {
            SourceFormat::Json => serde_json::from_str(contents).map_err(|e| {
                ScanError::config_error(format!("malformed JSON pattern source: {}", e))
            })?,
            SourceFormat::Yaml => serde_yaml::from_str(contents).map_err(|e| {
                ScanError::config_error(format!("malformed YAML pattern source: {}", e))
            })?,
        };
        Self::from_sources(sources)
    }

    /// Compiles an already-parsed category map.
    pub fn from_sources(sources: BTreeMap<String, PatternSpec>) -> ScanResult<Self> {
        let mut categories = Vec::with_capacity(sources.len());

        for (name, spec) in sources {
            if name.trim().is_empty() {
                return Err(ScanError::config_error("category names must not be empty"));
            }

            let matchers = spec
                .into_patterns()
                .into_iter()
                .map(|pattern| compile(&name, &pattern))
                .collect::<ScanResult<Vec<_>>>()?;

            debug!("Compiled {} matcher(s) for category '{}'", matchers.len(), name);
            categories.push(Category { name, matchers });
        }

        Ok(Self { categories })
    }

    /// Categories ordered by name
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total number of compiled matchers across every category
    pub fn matcher_count(&self) -> usize {
        self.categories.iter().map(|c| c.matchers.len()).sum()
    }
}

fn compile(category: &str, pattern: &str) -> ScanResult<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| ScanError::pattern_compile(category, pattern, e))
}
