/// File filtering helpers used by the walker and the file processor.
///
/// Two questions are answered here:
///
/// 1. **Does the file name pass the extension allowlist?** The allowlist is a
///    list of raw suffixes (`.cfg`, `.tar.gz`, `rc`) compared byte-for-byte
///    against the end of the file name. No case folding, no dot handling.
///
/// 2. **Is the file binary?** A file is binary when a NUL byte shows up in
///    its first [`BINARY_SNIFF_LEN`] bytes. Only that prefix is ever read.
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Number of leading bytes inspected by [`is_binary`]
pub const BINARY_SNIFF_LEN: usize = 1024;

/// Checks the file name of `path` against an optional suffix allowlist.
///
/// `None` or an empty list lets every file through.
pub fn has_valid_extension(path: &Path, extensions: &Option<Vec<String>>) -> bool {
    match extensions {
        None => true,
        Some(exts) if exts.is_empty() => true,
        Some(exts) => match path.file_name() {
            Some(name) => {
                let name = name.as_encoded_bytes();
                exts.iter().any(|ext| name.ends_with(ext.as_bytes()))
            }
            None => false,
        },
    }
}

/// Returns true iff a NUL byte occurs within the first [`BINARY_SNIFF_LEN`]
/// bytes of the file.
pub fn is_binary(path: &Path) -> io::Result<bool> {
    let file = File::open(path)?;
    let mut prefix = Vec::with_capacity(BINARY_SNIFF_LEN);
    file.take(BINARY_SNIFF_LEN as u64).read_to_end(&mut prefix)?;
    Ok(prefix.contains(&0))
}

/// Splits a comma-separated extension filter such as `".txt, .cfg"`.
///
/// Whitespace around entries is trimmed and empty entries are dropped; an
/// input with no usable entries yields `None` (no filtering).
pub fn parse_extensions(raw: &str) -> Option<Vec<String>> {
    let exts: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if exts.is_empty() {
        None
    } else {
        Some(exts)
    }
}
