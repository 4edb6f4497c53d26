use crossbeam_channel::{bounded, Receiver};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, info};

use super::matcher::PatternMatcher;
use super::processor::{FileOutcome, FileProcessor};
use crate::catalog::PatternCatalog;
use crate::config::ScanConfig;
use crate::errors::{ScanError, ScanResult};
use crate::results::ScanOutput;
use crate::walker::enumerate;

/// Outcomes in flight between the workers and the collector
const CHANNEL_CAPACITY: usize = 256;

/// Knobs for [`match_all`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// Only scan files the classifier reports as binary
    pub binary_only: bool,
    /// Number of simultaneously active workers, at least 1
    pub concurrency: usize,
    /// Draw a completed/total progress bar on stderr
    pub show_progress: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            binary_only: false,
            concurrency: 4,
            show_progress: false,
        }
    }
}

/// Runs the full pipeline described by `config`: load the catalog,
/// enumerate the tree and match every candidate.
pub fn scan(config: &ScanConfig) -> ScanResult<ScanOutput> {
    let catalog = PatternCatalog::load(&config.patterns_file)?;
    info!(
        "Loaded {} categories ({} matchers) from {}",
        catalog.len(),
        catalog.matcher_count(),
        config.patterns_file.display()
    );

    let files = enumerate(&config.root_path, &config.file_extensions)?;
    match_all(files, Arc::new(catalog), &config.match_options())
}

/// Matches every file against the catalog on a bounded worker pool.
///
/// One task runs per file. Workers send each task's outcome to a single
/// collector thread that owns the [`ScanOutput`], so results are appended
/// in completion order by exactly one writer. Per-file failures are logged
/// and dropped; the call returns once every task has reported.
pub fn match_all(
    files: Vec<PathBuf>,
    catalog: Arc<PatternCatalog>,
    options: &MatchOptions,
) -> ScanResult<ScanOutput> {
    if options.concurrency == 0 {
        return Err(ScanError::InvalidConcurrency(options.concurrency));
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.concurrency)
        .thread_name(|i| format!("piiscout-worker-{}", i))
        .build()?;

    info!(
        "Scanning {} files with {} workers (binary only: {})",
        files.len(),
        options.concurrency,
        options.binary_only
    );

    let processor = FileProcessor::new(PatternMatcher::new(catalog), options.binary_only);
    let progress = progress_bar(files.len() as u64, options.show_progress);
    let (tx, rx) = bounded::<FileOutcome>(CHANNEL_CAPACITY);

    let mut output = thread::scope(|s| {
        let collector = s.spawn(move || collect(rx, progress));

        // Every sender clone is dropped when the pool finishes, which ends
        // the collector's receive loop.
        pool.install(|| {
            files.par_iter().for_each_with(tx, |tx, path| {
                let outcome = processor.process_file(path);
                if tx.send(outcome).is_err() {
                    error!("Collector stopped before {} was reported", path.display());
                }
            });
        });

        collector
            .join()
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
    });

    let metrics = processor.metrics();
    metrics.log_stats();
    output.stats = metrics.snapshot();

    info!(
        "Scan complete. Found {} matches in {} files ({} failed)",
        output.total_matches,
        output.files_with_matches(),
        output.stats.files_failed
    );

    Ok(output)
}

/// Single owner of the aggregate: drains outcomes until every worker is done
fn collect(rx: Receiver<FileOutcome>, progress: ProgressBar) -> ScanOutput {
    let mut output = ScanOutput::new();

    for outcome in rx {
        match outcome {
            FileOutcome::Matched(result) => {
                debug!("Collected result for {}", result.filepath);
                output.add_file_result(result);
            }
            FileOutcome::NoMatches | FileOutcome::Skipped => {}
            FileOutcome::Failed { path, reason } => {
                error!("File {} generated an error: {}", path.display(), reason);
            }
        }
        progress.inc(1);
    }

    progress.finish_and_clear();
    output
}

fn progress_bar(total: u64, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let progress = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("Searching files [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len}")
    {
        progress.set_style(style.progress_chars("=>-"));
    }
    progress
}
