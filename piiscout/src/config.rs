use config::{Config as ConfigBuilder, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::errors::{ScanError, ScanResult};
use crate::search::MatchOptions;

/// Settings for a scan run.
///
/// # Configuration Locations
///
/// Values are layered from, lowest precedence first:
/// 1. Global `$HOME/.config/piiscout/config.yaml`
/// 2. Local `.piiscout.yaml` in the current directory
/// 3. A file passed with `--config`
///
/// Command-line arguments are applied last with [`ScanConfig::merge_with_cli`].
///
/// # Configuration Format
///
/// ```yaml
/// # Directory to scan
/// root_path: "/mnt/extracted"
///
/// # Category -> pattern(s) file (JSON, or YAML by extension)
/// patterns_file: "patterns.json"
///
/// # Only scan files ending with one of these suffixes
/// file_extensions:
///   - ".cfg"
///   - ".conf"
///
/// # Only scan files that look binary
/// binary_only: false
///
/// # Number of parallel workers
/// thread_count: 4
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "info"
///
/// # Reports are written to <output_prefix>.json and <output_prefix>.html
/// output_prefix: "results"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Root directory to scan
    #[serde(default = "default_root_path")]
    pub root_path: PathBuf,

    /// Pattern source file
    #[serde(default)]
    pub patterns_file: PathBuf,

    /// Optional suffix allowlist (e.g., [".txt", ".cfg"]).
    /// If None, every file is scanned
    #[serde(default)]
    pub file_extensions: Option<Vec<String>>,

    /// Whether to scan only files classified as binary
    #[serde(default)]
    pub binary_only: bool,

    /// Number of worker threads
    #[serde(default = "default_thread_count")]
    pub thread_count: NonZeroUsize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Prefix for the two report files
    #[serde(default = "default_output_prefix")]
    pub output_prefix: String,

    /// Whether to draw a progress bar while scanning
    #[serde(default = "default_show_progress")]
    pub show_progress: bool,
}

fn default_root_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_thread_count() -> NonZeroUsize {
    NonZeroUsize::new(4).unwrap_or(NonZeroUsize::MIN)
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_output_prefix() -> String {
    "results".to_string()
}

fn default_show_progress() -> bool {
    true
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            patterns_file: PathBuf::new(),
            file_extensions: None,
            binary_only: false,
            thread_count: default_thread_count(),
            log_level: default_log_level(),
            output_prefix: default_output_prefix(),
            show_progress: default_show_progress(),
        }
    }
}

/// Values given on the command line; `None`/`false` means "not given"
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub root_path: Option<PathBuf>,
    pub patterns_file: Option<PathBuf>,
    pub file_extensions: Option<Vec<String>>,
    pub binary_only: bool,
    pub thread_count: Option<NonZeroUsize>,
    pub log_level: Option<String>,
    pub output_prefix: Option<String>,
    pub no_progress: bool,
}

impl ScanConfig {
    /// Loads configuration from the default locations plus an explicit file.
    ///
    /// Missing default files are skipped; a missing explicit file is an error.
    pub fn load_from(config_path: Option<&Path>) -> ScanResult<Self> {
        let mut builder = ConfigBuilder::builder();

        let defaults = [
            // Global config
            dirs::config_dir().map(|p| p.join("piiscout/config.yaml")),
            // Local config
            Some(PathBuf::from(".piiscout.yaml")),
        ];
        for path in defaults.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        if let Some(path) = config_path {
            if !path.is_file() {
                return Err(ScanError::config_error(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path));
        }

        builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ScanError::config_error(e.to_string()))
    }

    /// Applies command-line values on top of file values
    pub fn merge_with_cli(mut self, cli: CliOverrides) -> Self {
        if let Some(root_path) = cli.root_path {
            self.root_path = root_path;
        }
        if let Some(patterns_file) = cli.patterns_file {
            self.patterns_file = patterns_file;
        }
        if cli.file_extensions.is_some() {
            self.file_extensions = cli.file_extensions;
        }
        if cli.binary_only {
            self.binary_only = true;
        }
        if let Some(thread_count) = cli.thread_count {
            self.thread_count = thread_count;
        }
        if let Some(log_level) = cli.log_level {
            self.log_level = log_level;
        }
        if let Some(output_prefix) = cli.output_prefix {
            self.output_prefix = output_prefix;
        }
        if cli.no_progress {
            self.show_progress = false;
        }
        self
    }

    /// Matcher settings derived from this configuration
    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            binary_only: self.binary_only,
            concurrency: self.thread_count.get(),
            show_progress: self.show_progress,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_load_config_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let config_content = r#"
            root_path: "dump"
            patterns_file: "patterns.json"
            file_extensions: [".cfg", ".conf"]
            binary_only: true
            thread_count: 8
            log_level: "debug"
            output_prefix: "out/report"
            show_progress: false
        "#;

        let mut file = File::create(&config_path).unwrap();
        file.write_all(config_content.as_bytes()).unwrap();

        let config = ScanConfig::load_from(Some(config_path.as_path())).unwrap();
        assert_eq!(config.root_path, PathBuf::from("dump"));
        assert_eq!(config.patterns_file, PathBuf::from("patterns.json"));
        assert_eq!(
            config.file_extensions,
            Some(vec![".cfg".to_string(), ".conf".to_string()])
        );
        assert!(config.binary_only);
        assert_eq!(config.thread_count, NonZeroUsize::new(8).unwrap());
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.output_prefix, "out/report");
        assert!(!config.show_progress);
    }

    #[test]
    fn test_merge_with_cli() {
        let config_file = ScanConfig {
            root_path: PathBuf::from("dump"),
            patterns_file: PathBuf::from("file.json"),
            file_extensions: Some(vec![".cfg".to_string()]),
            thread_count: NonZeroUsize::new(2).unwrap(),
            ..ScanConfig::default()
        };

        let cli = CliOverrides {
            patterns_file: Some(PathBuf::from("cli.json")),
            binary_only: true,
            thread_count: Some(NonZeroUsize::new(8).unwrap()),
            output_prefix: Some("scan".to_string()),
            no_progress: true,
            ..CliOverrides::default()
        };

        let merged = config_file.merge_with_cli(cli);
        assert_eq!(merged.root_path, PathBuf::from("dump")); // File value
        assert_eq!(merged.patterns_file, PathBuf::from("cli.json")); // CLI value
        assert_eq!(merged.file_extensions, Some(vec![".cfg".to_string()])); // File value (CLI None)
        assert!(merged.binary_only); // CLI value
        assert_eq!(merged.thread_count, NonZeroUsize::new(8).unwrap()); // CLI value
        assert_eq!(merged.output_prefix, "scan"); // CLI value
        assert!(!merged.show_progress); // CLI value
    }

    #[test]
    fn test_default_values() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let mut file = File::create(&config_path).unwrap();
        file.write_all(b"patterns_file: \"p.json\"\n").unwrap();

        let config = ScanConfig::load_from(Some(config_path.as_path())).unwrap();
        assert_eq!(config.patterns_file, PathBuf::from("p.json"));
        assert_eq!(config.root_path, PathBuf::from("."));
        assert_eq!(config.file_extensions, None);
        assert!(!config.binary_only);
        assert_eq!(config.thread_count, NonZeroUsize::new(4).unwrap());
        assert_eq!(config.log_level, "info");
        assert_eq!(config.output_prefix, "results");
        assert!(config.show_progress);
    }

    #[test]
    fn test_invalid_config() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let mut file = File::create(&config_path).unwrap();
        file.write_all(b"thread_count: 0\n").unwrap();

        let err = ScanConfig::load_from(Some(config_path.as_path())).unwrap_err();
        assert!(matches!(err, ScanError::ConfigError(_)));
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ScanConfig::load_from(Some(Path::new("nonexistent.yaml")));
        assert!(matches!(result, Err(ScanError::ConfigError(_))));
    }

    #[test]
    fn test_match_options() {
        let config = ScanConfig {
            thread_count: NonZeroUsize::new(3).unwrap(),
            binary_only: true,
            show_progress: false,
            ..ScanConfig::default()
        };
        let options = config.match_options();
        assert_eq!(options.concurrency, 3);
        assert!(options.binary_only);
        assert!(!options.show_progress);
    }
}
