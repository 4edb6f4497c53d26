use memmap2::Mmap;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

use super::matcher::PatternMatcher;
use crate::errors::{ScanError, ScanResult};
use crate::filters::is_binary;
use crate::metrics::ScanMetrics;
use crate::results::FileMatchResult;

// Constants for file processing
const BUFFER_CAPACITY: usize = 65536;
pub(crate) const SMALL_FILE_THRESHOLD: u64 = 32 * 1024; // 32KB
pub(crate) const LARGE_FILE_THRESHOLD: u64 = 10 * 1024 * 1024; // 10MB

/// What a single match task produced for one file
#[derive(Debug)]
pub enum FileOutcome {
    /// At least one category matched
    Matched(FileMatchResult),
    /// The file was read but nothing matched
    NoMatches,
    /// Binary-only mode and the file is not binary
    Skipped,
    /// Opening, classifying or reading the file failed
    Failed { path: PathBuf, reason: ScanError },
}

/// Decodes bytes as UTF-8, replacing invalid sequences. Never fails.
///
/// The flag is true when anything was replaced.
pub fn decode_lossy(bytes: &[u8]) -> (String, bool) {
    let text = String::from_utf8_lossy(bytes);
    let replaced = matches!(text, Cow::Owned(_));
    (text.into_owned(), replaced)
}

/// Same as [`decode_lossy`], but valid input keeps its buffer.
pub fn decode_owned(bytes: Vec<u8>) -> (String, bool) {
    match String::from_utf8(bytes) {
        Ok(text) => (text, false),
        Err(e) => (String::from_utf8_lossy(e.as_bytes()).into_owned(), true),
    }
}

/// Runs the catalog against one file at a time
#[derive(Debug, Clone)]
pub struct FileProcessor {
    matcher: PatternMatcher,
    metrics: ScanMetrics,
    binary_only: bool,
}

impl FileProcessor {
    /// Creates a new FileProcessor with the given pattern matcher
    pub fn new(matcher: PatternMatcher, binary_only: bool) -> Self {
        Self {
            matcher,
            metrics: ScanMetrics::new(),
            binary_only,
        }
    }

    /// Gets the counters shared by every clone of this processor
    pub fn metrics(&self) -> &ScanMetrics {
        &self.metrics
    }

    /// Processes a file and reports the outcome; errors never escape.
    pub fn process_file(&self, path: &Path) -> FileOutcome {
        trace!("Processing file: {}", path.display());

        let outcome = self
            .scan_file(path)
            .unwrap_or_else(|reason| FileOutcome::Failed {
                path: path.to_path_buf(),
                reason,
            });

        match &outcome {
            FileOutcome::Matched(_) => self.metrics.record_matched(),
            FileOutcome::NoMatches => self.metrics.record_no_matches(),
            FileOutcome::Skipped => self.metrics.record_skipped(),
            FileOutcome::Failed { .. } => self.metrics.record_failed(),
        }
        outcome
    }

    fn scan_file(&self, path: &Path) -> ScanResult<FileOutcome> {
        if self.binary_only && !is_binary(path).map_err(|e| ScanError::from_io(path, e))? {
            trace!("Skipping non-binary file: {}", path.display());
            return Ok(FileOutcome::Skipped);
        }

        let contents = self.read_contents(path)?;
        let result = self.matcher.find_matches(path, &contents);

        if result.is_empty() {
            Ok(FileOutcome::NoMatches)
        } else {
            debug!(
                "{}: {} match(es) in {} categories",
                path.display(),
                result.match_count(),
                result.matches.len()
            );
            Ok(FileOutcome::Matched(result))
        }
    }

    /// Reads and decodes the whole file, choosing a strategy by size
    fn read_contents(&self, path: &Path) -> ScanResult<String> {
        let size = match path.metadata() {
            Ok(metadata) => Some(metadata.len()),
            Err(e) => {
                warn!("Failed to get metadata for {}: {}", path.display(), e);
                None
            }
        };

        let (contents, replaced) = match size {
            Some(size) if size < SMALL_FILE_THRESHOLD => decode_owned(self.read_small_file(path)?),
            Some(size) if size >= LARGE_FILE_THRESHOLD => self.read_mmap_file(path)?,
            _ => decode_owned(self.read_buffered(path)?),
        };

        if replaced {
            self.metrics.record_lossy_decode();
            debug!("Invalid UTF-8 replaced in file: {}", path.display());
        }
        Ok(contents)
    }

    fn read_small_file(&self, path: &Path) -> ScanResult<Vec<u8>> {
        trace!("Using simple file reading for: {}", path.display());
        let bytes = std::fs::read(path).map_err(|e| ScanError::from_io(path, e))?;
        self.metrics.record_read(bytes.len() as u64);
        Ok(bytes)
    }

    fn read_buffered(&self, path: &Path) -> ScanResult<Vec<u8>> {
        trace!("Using buffered reading for: {}", path.display());
        let file = File::open(path).map_err(|e| ScanError::from_io(path, e))?;
        let mut reader = BufReader::with_capacity(BUFFER_CAPACITY, file);
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(ScanError::IoError)?;
        self.metrics.record_read(bytes.len() as u64);
        Ok(bytes)
    }

    /// Decodes straight from the mapping; the map is released on return.
    fn read_mmap_file(&self, path: &Path) -> ScanResult<(String, bool)> {
        trace!("Using memory mapping for: {}", path.display());
        let file = File::open(path).map_err(|e| ScanError::from_io(path, e))?;
        let mmap = unsafe { Mmap::map(&file) }.map_err(ScanError::IoError)?;
        self.metrics.record_read(mmap.len() as u64);
        Ok(decode_lossy(&mmap[..]))
    }
}
