use std::path::Path;

use walkdir::{DirEntry, WalkDir};

use crate::error::{MarkError, Result};
use crate::paths::to_key;

/// Files found under a source root.
#[derive(Debug, Default)]
pub struct Discovered {
    /// Root-relative, forward-slash paths, sorted.
    pub files: Vec<String>,
    /// Symbolic links that were skipped.
    pub symlink_count: usize,
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

/// Discovers all regular, non-hidden files under `root`.
///
/// Hidden directories are not descended into. Symbolic links are not
/// followed; they are counted and left out of the result.
///
/// # Errors
///
/// Returns an error if:
/// - A directory cannot be read
/// - Any file path contains invalid UTF-8
pub fn discover_files(root: &Path) -> Result<Discovered> {
    let mut discovered = Discovered::default();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            MarkError::IoError {
                path,
                source: e.into(),
            }
        })?;

        let file_type = entry.file_type();
        if file_type.is_symlink() {
            discovered.symlink_count += 1;
            continue;
        }
        if !file_type.is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|e| MarkError::InvalidPath {
                message: format!("'{}' is outside the source root: {e}", entry.path().display()),
            })?;
        discovered.files.push(to_key(relative)?);
    }

    discovered.files.sort();
    Ok(discovered)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn setup_tree() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        // foo.jpg
        // fizz/buzz.jpg
        // fizz/.ignore
        // .git/config
        fs::write(root.join("foo.jpg"), "").unwrap();
        fs::create_dir(root.join("fizz")).unwrap();
        fs::write(root.join("fizz/buzz.jpg"), "").unwrap();
        fs::write(root.join("fizz/.ignore"), "").unwrap();
        fs::create_dir(root.join(".git")).unwrap();
        fs::write(root.join(".git/config"), "").unwrap();

        temp_dir
    }

    #[test]
    fn test_discover_files() {
        let temp_dir = setup_tree();
        let discovered = discover_files(temp_dir.path()).unwrap();
        assert_eq!(discovered.files, vec!["fizz/buzz.jpg", "foo.jpg"]);
        assert_eq!(discovered.symlink_count, 0);
    }

    #[test]
    fn test_discover_hidden_root_is_walked() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join(".assets");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("a.css"), "").unwrap();

        let discovered = discover_files(&root).unwrap();
        assert_eq!(discovered.files, vec!["a.css"]);
    }

    #[test]
    fn test_discover_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let result = discover_files(&temp_dir.path().join("missing"));
        assert!(matches!(result, Err(MarkError::IoError { .. })));
    }

    #[test]
    #[cfg(unix)]
    fn test_discover_skips_symlinks() {
        use std::os::unix::fs::symlink;

        let temp_dir = setup_tree();
        let root = temp_dir.path();
        symlink(root.join("foo.jpg"), root.join("link.jpg")).unwrap();

        let discovered = discover_files(root).unwrap();
        assert_eq!(discovered.files, vec!["fizz/buzz.jpg", "foo.jpg"]);
        assert_eq!(discovered.symlink_count, 1);
    }
}
