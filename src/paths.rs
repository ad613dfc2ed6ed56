//! Helpers for source-relative, forward-slash paths.
//!
//! Registry keys and manifest entries are plain strings such as
//! `css/site.css`. They never start with `/`, never contain `.` or `..`
//! segments, and always use `/` as separator regardless of platform.

use std::path::{Component, Path};

use crate::error::{MarkError, Result};

/// Returns the directory part of a relative path (`""` for top-level files).
pub fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Returns the final segment of a relative path.
pub fn file_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty() && *s != ".")
}

/// Joins `relative` onto `dir` and collapses `.` and `..` segments.
///
/// Returns `None` when the result would climb above the project root or
/// would name the root itself.
pub fn join_normalized(dir: &str, relative: &str) -> Option<String> {
    let mut parts: Vec<&str> = segments(dir).collect();
    for segment in segments(relative) {
        if segment == ".." {
            parts.pop()?;
        } else {
            parts.push(segment);
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Expresses `target` relative to the directory `from_dir`.
///
/// Both arguments are root-relative. `relative_path("css", "img/a.png")`
/// yields `../img/a.png`.
pub fn relative_path(from_dir: &str, target: &str) -> String {
    let from: Vec<&str> = segments(from_dir).collect();
    let to: Vec<&str> = segments(target).collect();

    // The last segment of `target` is a file and can never be shared with a
    // directory of the same name.
    let common = from
        .iter()
        .zip(&to)
        .take_while(|(a, b)| a == b)
        .count()
        .min(to.len().saturating_sub(1));

    let mut parts = vec![".."; from.len() - common];
    parts.extend_from_slice(&to[common..]);
    parts.join("/")
}

/// Converts a filesystem path relative to the source root into a registry key.
pub fn to_key(relative: &Path) -> Result<String> {
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(name) => parts.push(
                name.to_str()
                    .ok_or_else(|| MarkError::InvalidUtf8Path(relative.to_path_buf()))?,
            ),
            Component::CurDir => {}
            other => {
                return Err(MarkError::InvalidPath {
                    message: format!(
                        "unexpected component {other:?} in '{}'",
                        relative.display()
                    ),
                });
            }
        }
    }

    if parts.is_empty() {
        return Err(MarkError::InvalidPath {
            message: format!("'{}' does not name a file", relative.display()),
        });
    }

    Ok(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_parent_dir_and_file_name() {
        assert_eq!(parent_dir("main.css"), "");
        assert_eq!(parent_dir("a/b/main.css"), "a/b");
        assert_eq!(file_name("main.css"), "main.css");
        assert_eq!(file_name("a/b/main.css"), "main.css");
    }

    #[test]
    fn test_join_normalized() {
        assert_eq!(
            join_normalized("foo", "foo.jpg").as_deref(),
            Some("foo/foo.jpg")
        );
        assert_eq!(
            join_normalized("foo", "../fizz/buzz.jpg").as_deref(),
            Some("fizz/buzz.jpg")
        );
        assert_eq!(
            join_normalized("", "./img//a.png").as_deref(),
            Some("img/a.png")
        );
        assert_eq!(
            join_normalized("a/b", "../../c.png").as_deref(),
            Some("c.png")
        );
    }

    #[test]
    fn test_join_normalized_escaping_root() {
        assert_eq!(join_normalized("", "../outside.png"), None);
        assert_eq!(join_normalized("a", "../../outside.png"), None);
        assert_eq!(join_normalized("a", ".."), None);
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(relative_path("", "foo.1234abcd.jpg"), "foo.1234abcd.jpg");
        assert_eq!(relative_path("css", "img/a.png"), "../img/a.png");
        assert_eq!(relative_path("css", "css/fonts/f.woff"), "fonts/f.woff");
        assert_eq!(relative_path("a/b/c", "a/x.png"), "../../x.png");
        assert_eq!(relative_path("a", "top.png"), "../top.png");
    }

    #[test]
    fn test_relative_path_file_named_like_directory() {
        assert_eq!(relative_path("a/b", "a/b"), "../b");
    }

    #[test]
    fn test_to_key() {
        let key = to_key(&PathBuf::from("css").join("site.css")).unwrap();
        assert_eq!(key, "css/site.css");
        assert_eq!(to_key(Path::new("./a.txt")).unwrap(), "a.txt");
    }

    #[test]
    fn test_to_key_rejects_parent_and_empty() {
        assert!(matches!(
            to_key(Path::new("../a.txt")),
            Err(MarkError::InvalidPath { .. })
        ));
        assert!(matches!(
            to_key(Path::new("")),
            Err(MarkError::InvalidPath { .. })
        ));
    }
}
