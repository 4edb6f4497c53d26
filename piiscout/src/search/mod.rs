/// Concurrent matching of candidate files against the pattern catalog.
///
/// The pieces, innermost first:
///
/// 1. [`PatternMatcher`] applies every category of a shared, read-only
///    catalog to a string and groups what it finds by category.
/// 2. [`FileProcessor`] is one match task: optional binary check, read the
///    file with lossy UTF-8 decoding, run the matcher. It returns a typed
///    [`FileOutcome`] instead of an error, so a bad file can never take the
///    scan down with it.
/// 3. [`match_all`] runs one task per file on a rayon pool sized to the
///    requested worker count. Outcomes flow over a channel to a single
///    collector, which is the only code that touches the aggregate.
///
/// ```rust,ignore
/// let catalog = Arc::new(PatternCatalog::load(Path::new("patterns.json"))?);
/// let files = enumerate(Path::new("/srv/export"), &None)?;
/// let output = match_all(files, catalog, &MatchOptions::default())?;
/// ```
pub mod engine;
pub mod matcher;
pub mod processor;

pub use engine::{match_all, scan, MatchOptions};
pub use matcher::PatternMatcher;
pub use processor::{FileOutcome, FileProcessor};
