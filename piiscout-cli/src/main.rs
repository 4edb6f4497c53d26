use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use piiscout::{
    config::{CliOverrides, ScanConfig},
    filters::parse_extensions,
    report::{write_reports, ReportFiles},
    results::ScanOutput,
    scan,
};
use std::{num::NonZeroUsize, path::PathBuf, time::Instant};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Scan a directory tree for sensitive data", long_about = None)]
struct Cli {
    /// Directory to scan
    root: Option<PathBuf>,

    /// JSON (or YAML) file mapping category names to a pattern or a list of patterns
    #[arg(short = 'p', long)]
    patterns: Option<PathBuf>,

    /// Only scan files ending with one of these comma-separated suffixes (e.g. .txt,.cfg)
    #[arg(short = 'e', long = "file-type", alias = "file_type")]
    file_type: Option<String>,

    /// Only scan files that look binary (NUL byte in the first 1024 bytes)
    #[arg(short, long)]
    binary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long = "num-workers", alias = "num_workers")]
    num_workers: Option<NonZeroUsize>,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,

    /// Output file prefix; writes <PREFIX>.json and <PREFIX>.html
    #[arg(short, long)]
    output: Option<String>,

    /// Configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Do not draw a progress bar
    #[arg(long)]
    no_progress: bool,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            root_path: self.root.clone(),
            patterns_file: self.patterns.clone(),
            file_extensions: self.file_type.as_deref().and_then(parse_extensions),
            binary_only: self.binary,
            thread_count: self.num_workers,
            log_level: self.verbose.then(|| "debug".to_string()),
            output_prefix: self.output.clone(),
            no_progress: self.no_progress,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ScanConfig::load_from(cli.config.as_deref())
        .context("failed to load configuration")?
        .merge_with_cli(cli.overrides());

    init_logging(&config.log_level);
    debug!("Effective configuration: {:?}", config);

    run(&config)
}

fn run(config: &ScanConfig) -> Result<()> {
    if config.patterns_file.as_os_str().is_empty() {
        bail!("no pattern source given; pass --patterns <FILE>");
    }
    if !config.root_path.is_dir() {
        bail!("{} is not a valid directory", config.root_path.display());
    }
    if !config.patterns_file.is_file() {
        bail!("{} is not a valid file", config.patterns_file.display());
    }

    let started = Instant::now();
    let output = match scan(config) {
        Ok(output) => output,
        Err(e) if e.is_config() => bail!(
            "{} is not a usable pattern source: {}",
            config.patterns_file.display(),
            e
        ),
        Err(e) => return Err(e.into()),
    };
    let files = write_reports(&output, &config.output_prefix)?;

    print_summary(&output, &files, started.elapsed().as_secs_f64());
    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_summary(output: &ScanOutput, files: &ReportFiles, seconds: f64) {
    println!("----------------------------------------------------------------");
    println!("{}", "Search completed successfully!".green().bold());
    println!(
        "Found {} matches in {} files ({} files failed) in {:.2}s",
        output.total_matches.to_string().yellow(),
        output.files_with_matches().to_string().yellow(),
        output.stats.files_failed,
        seconds
    );
    println!(
        "Results saved to: {} (Size: {} bytes)",
        files.json_path.display().to_string().blue(),
        files.json_size
    );
    println!(
        "HTML report saved to: {} (Size: {} bytes)",
        files.html_path.display().to_string().blue(),
        files.html_size
    );
}
