/// Error types for piiscout.
///
/// Errors fall into two groups:
///
/// 1. **Fatal errors** stop a run before any file is scanned: a broken
///    pattern source, an invalid root directory, or a thread pool that
///    cannot be started. These are returned as [`ScanError`].
///
/// 2. **Per-file errors** (a file vanished, permission denied, a read
///    failed mid-way) never leave the matcher. The file processor turns them
///    into a [`FileOutcome::Failed`](crate::search::processor::FileOutcome)
///    value, the engine logs it and the scan carries on.
///
/// ```rust,ignore
/// match PatternCatalog::load(path) {
///     Ok(catalog) => // scan with it,
///     Err(ScanError::PatternCompile { category, pattern, .. }) => // report the bad regex,
///     Err(e) => // any other configuration problem
/// }
/// ```
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for scan operations
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors that can occur while configuring or running a scan
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Invalid pattern in category '{category}': {pattern}: {source}")]
    PatternCompile {
        category: String,
        pattern: String,
        source: regex::Error,
    },
    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Invalid worker count: {0} (must be at least 1)")]
    InvalidConcurrency(usize),
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ScanError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn pattern_compile(
        category: impl Into<String>,
        pattern: impl Into<String>,
        source: regex::Error,
    ) -> Self {
        Self::PatternCompile {
            category: category.into(),
            pattern: pattern.into(),
            source,
        }
    }

    pub fn directory_not_found(path: impl Into<PathBuf>) -> Self {
        Self::DirectoryNotFound(path.into())
    }

    pub fn not_a_directory(path: impl Into<PathBuf>) -> Self {
        Self::NotADirectory(path.into())
    }

    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound(path.into())
    }

    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied(path.into())
    }

    /// Maps an I/O error on `path` to the most specific variant.
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::file_not_found(path),
            std::io::ErrorKind::PermissionDenied => Self::permission_denied(path),
            _ => Self::IoError(err),
        }
    }

    /// True for errors raised before scanning starts because of bad input
    /// configuration (pattern source or config file).
    pub fn is_config(&self) -> bool {
        matches!(self, Self::ConfigError(_) | Self::PatternCompile { .. })
    }
}
