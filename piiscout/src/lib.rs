pub mod aggregate;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod filters;
pub mod metrics;
pub mod report;
pub mod results;
pub mod search;
pub mod walker;

pub use aggregate::{aggregate, category_label, CategoryMatchSet};
pub use catalog::PatternCatalog;
pub use config::ScanConfig;
pub use errors::{ScanError, ScanResult};
pub use filters::is_binary;
pub use report::{render, write_reports};
pub use results::{FileMatchResult, ScanOutput};
pub use search::{match_all, scan, MatchOptions};
pub use walker::enumerate;
