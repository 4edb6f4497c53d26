//! Recursive discovery of candidate files.
//!
//! Every regular file under the root is a candidate, hidden files and
//! files listed in `.gitignore` included: a sensitive-data sweep must not
//! trust the tree to describe itself. Symlinks are followed so linked files
//! are scanned; loops and unreadable directories are reported and skipped.
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::errors::{ScanError, ScanResult};
use crate::filters::has_valid_extension;

/// Lists every regular file under `root` whose name passes `extensions`.
///
/// Fails only when `root` is missing or is not a directory.
pub fn enumerate(root: &Path, extensions: &Option<Vec<String>>) -> ScanResult<Vec<PathBuf>> {
    if !root.exists() {
        return Err(ScanError::directory_not_found(root));
    }
    if !root.is_dir() {
        return Err(ScanError::not_a_directory(root));
    }

    let mut walker = WalkBuilder::new(root);
    walker
        .standard_filters(false)
        .hidden(false)
        .parents(false)
        .ignore(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .follow_links(true);

    let mut files = Vec::new();
    for entry in walker.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry during walk: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        if has_valid_extension(entry.path(), extensions) {
            files.push(entry.into_path());
        }
    }

    debug!("Found {} candidate files under {}", files.len(), root.display());
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn names(files: &[PathBuf]) -> Vec<String> {
        let mut names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_enumerates_nested_and_hidden_files() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("top.txt"), "x").unwrap();
        fs::write(dir.path().join("a/b/deep.cfg"), "x").unwrap();
        fs::write(dir.path().join(".hidden"), "x").unwrap();
        fs::write(dir.path().join(".gitignore"), "top.txt\n").unwrap();

        let files = enumerate(dir.path(), &None).unwrap();
        assert_eq!(
            names(&files),
            vec![".gitignore", ".hidden", "deep.cfg", "top.txt"]
        );
    }

    #[test]
    fn test_extension_filter() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("x.cfg"), "x").unwrap();
        fs::write(dir.path().join("x.txt"), "x").unwrap();

        let files = enumerate(dir.path(), &Some(vec![".cfg".to_string()])).unwrap();
        assert_eq!(names(&files), vec!["x.cfg"]);
    }

    #[test]
    fn test_invalid_roots() {
        let dir = tempdir().unwrap();
        let err = enumerate(&dir.path().join("missing"), &None).unwrap_err();
        assert!(matches!(err, ScanError::DirectoryNotFound(_)));

        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        let err = enumerate(&file, &None).unwrap_err();
        assert!(matches!(err, ScanError::NotADirectory(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_loop_does_not_abort() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/file.txt"), "x").unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("sub/loop")).unwrap();

        let files = enumerate(dir.path(), &None).unwrap();
        assert_eq!(names(&files), vec!["file.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("inside.txt"), "x").unwrap();
        fs::create_dir(dir.path().join("open")).unwrap();
        fs::write(dir.path().join("open/sibling.txt"), "x").unwrap();
        fs::write(dir.path().join("top.txt"), "x").unwrap();

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        // Privileged users can still list the directory
        let listable = fs::read_dir(&locked).is_ok();
        let result = enumerate(dir.path(), &None);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let files = result.unwrap();
        if listable {
            assert_eq!(names(&files), vec!["inside.txt", "sibling.txt", "top.txt"]);
        } else {
            assert_eq!(names(&files), vec!["sibling.txt", "top.txt"]);
        }
    }
}
