use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

use crate::search::processor::{LARGE_FILE_THRESHOLD, SMALL_FILE_THRESHOLD};

/// Counters shared by every match task of a scan.
///
/// Cloning is cheap and every clone updates the same counters.
#[derive(Debug, Clone)]
pub struct ScanMetrics {
    // Task outcomes
    files_matched: Arc<AtomicU64>,
    files_without_matches: Arc<AtomicU64>,
    files_skipped: Arc<AtomicU64>,
    files_failed: Arc<AtomicU64>,

    // Reading
    bytes_read: Arc<AtomicU64>,
    lossy_decodes: Arc<AtomicU64>,
    small_files_processed: Arc<AtomicU64>,
    buffered_files_processed: Arc<AtomicU64>,
    mmap_files_processed: Arc<AtomicU64>,
}

impl ScanMetrics {
    /// Creates a new ScanMetrics instance
    pub fn new() -> Self {
        Self {
            files_matched: Arc::new(AtomicU64::new(0)),
            files_without_matches: Arc::new(AtomicU64::new(0)),
            files_skipped: Arc::new(AtomicU64::new(0)),
            files_failed: Arc::new(AtomicU64::new(0)),
            bytes_read: Arc::new(AtomicU64::new(0)),
            lossy_decodes: Arc::new(AtomicU64::new(0)),
            small_files_processed: Arc::new(AtomicU64::new(0)),
            buffered_files_processed: Arc::new(AtomicU64::new(0)),
            mmap_files_processed: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn record_matched(&self) {
        self.files_matched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_no_matches(&self) {
        self.files_without_matches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self) {
        self.files_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.files_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a file read with the strategy its size selects
    pub fn record_read(&self, size: u64) {
        self.bytes_read.fetch_add(size, Ordering::Relaxed);
        if size < SMALL_FILE_THRESHOLD {
            self.small_files_processed.fetch_add(1, Ordering::Relaxed);
        } else if size >= LARGE_FILE_THRESHOLD {
            self.mmap_files_processed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.buffered_files_processed
                .fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_lossy_decode(&self) {
        self.lossy_decodes.fetch_add(1, Ordering::Relaxed);
    }

    /// Gets the current counter values
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            files_matched: self.files_matched.load(Ordering::Relaxed),
            files_without_matches: self.files_without_matches.load(Ordering::Relaxed),
            files_skipped: self.files_skipped.load(Ordering::Relaxed),
            files_failed: self.files_failed.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            lossy_decodes: self.lossy_decodes.load(Ordering::Relaxed),
            small_files: self.small_files_processed.load(Ordering::Relaxed),
            buffered_files: self.buffered_files_processed.load(Ordering::Relaxed),
            mmap_files: self.mmap_files_processed.load(Ordering::Relaxed),
        }
    }

    /// Logs the current counter values
    pub fn log_stats(&self) {
        let stats = self.snapshot();
        info!(
            "Scan stats:\n\
             Files with matches: {}\n\
             Files without matches: {}\n\
             Files skipped (not binary): {}\n\
             Files failed: {}\n\
             Bytes read: {} ({} lossy decodes)\n\
             Files read (small/buffered/mmap): {}/{}/{}",
            stats.files_matched,
            stats.files_without_matches,
            stats.files_skipped,
            stats.files_failed,
            stats.bytes_read,
            stats.lossy_decodes,
            stats.small_files,
            stats.buffered_files,
            stats.mmap_files
        );
    }
}

impl Default for ScanMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of [`ScanMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub files_matched: u64,
    pub files_without_matches: u64,
    pub files_skipped: u64,
    pub files_failed: u64,
    pub bytes_read: u64,
    pub lossy_decodes: u64,
    pub small_files: u64,
    pub buffered_files: u64,
    pub mmap_files: u64,
}

impl MetricsSnapshot {
    /// Number of tasks that ran to an outcome, failures included
    pub fn files_processed(&self) -> u64 {
        self.files_matched + self.files_without_matches + self.files_skipped + self.files_failed
    }
}
