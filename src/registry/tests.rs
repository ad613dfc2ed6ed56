use std::fs;

use tempfile::TempDir;

use crate::error::MarkError;
use crate::logging::Logger;
use crate::registry::{Registry, SourceFile};
use crate::scanner::Reference;

fn reference(position: usize, length: usize, target: &str) -> Reference {
    Reference {
        position,
        length,
        target: target.to_string(),
        suffix: String::new(),
    }
}

#[test]
fn test_scan_parses_only_stylesheets() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("foo.jpg"), "url(nothing.png)").unwrap();
    fs::write(temp_dir.path().join("bar.css"), "url('foo.jpg')").unwrap();

    let paths = vec!["foo.jpg".to_string(), "bar.css".to_string()];
    let registry = Registry::scan(temp_dir.path(), &paths, &Logger::default()).unwrap();
    assert_eq!(registry.len(), 2);

    let foo = registry.get("foo.jpg").unwrap();
    assert!(foo.references().is_empty());

    let bar = registry.get("bar.css").unwrap();
    assert_eq!(bar.references(), &[reference(5, 7, "foo.jpg")]);
    assert!(bar.hashed_path().is_none());
}

#[test]
fn test_scan_unreadable_stylesheet() {
    let temp_dir = TempDir::new().unwrap();
    let paths = vec!["missing.css".to_string()];
    let result = Registry::scan(temp_dir.path(), &paths, &Logger::default());
    assert!(matches!(result, Err(MarkError::IoError { .. })));
}

#[test]
fn test_prune_dangling() {
    let mut registry = Registry::new();
    registry.insert(SourceFile::new(
        "bar.css",
        vec![reference(10, 10, "foo.jpg"), reference(20, 5, "fizz.jpg")],
    ));
    registry.insert(SourceFile::new("foo.jpg", Vec::new()));

    let removed = registry.prune_dangling(&Logger::default());
    assert_eq!(removed, 1);
    assert_eq!(
        registry.get("bar.css").unwrap().references(),
        &[reference(10, 10, "foo.jpg")]
    );
    assert!(registry.get("foo.jpg").unwrap().references().is_empty());
}

#[test]
fn test_is_ready() {
    let mut registry = Registry::new();
    registry.insert(SourceFile::new(
        "a.css",
        vec![reference(0, 1, "foo.jpg"), reference(2, 1, "bar.jpg")],
    ));
    registry.insert(SourceFile::new("foo.jpg", Vec::new()));
    registry.insert(SourceFile::new("bar.jpg", Vec::new()));

    let css = registry.get("a.css").unwrap().clone();
    assert!(!registry.is_ready(&css));

    registry
        .assign_hashed_path("foo.jpg", "foo.00000000.jpg".to_string())
        .unwrap();
    assert!(!registry.is_ready(&css));

    registry
        .assign_hashed_path("bar.jpg", "bar.00000000.jpg".to_string())
        .unwrap();
    assert!(registry.is_ready(&css));
    assert!(registry.is_ready(registry.get("foo.jpg").unwrap()));
}

#[test]
fn test_hashed_path_is_single_assignment() {
    let mut registry = Registry::new();
    registry.insert(SourceFile::new("foo.jpg", Vec::new()));

    registry
        .assign_hashed_path("foo.jpg", "foo.11111111.jpg".to_string())
        .unwrap();
    let result = registry.assign_hashed_path("foo.jpg", "foo.22222222.jpg".to_string());
    assert!(matches!(result, Err(MarkError::AlreadyHashed { .. })));
    assert_eq!(registry.hashed_path("foo.jpg"), Some("foo.11111111.jpg"));
}

#[test]
fn test_assign_unknown_path() {
    let mut registry = Registry::new();
    let result = registry.assign_hashed_path("nope.jpg", "nope.0.jpg".to_string());
    assert!(matches!(result, Err(MarkError::InvalidPath { .. })));
}

#[test]
fn test_mapping_is_sorted_and_complete() {
    let mut registry = Registry::new();
    assert!(registry.is_empty());
    for path in ["z.txt", "a/b.txt", "m.txt"] {
        registry.insert(SourceFile::new(path, Vec::new()));
    }
    assert!(registry.mapping().is_empty());
    assert!(!registry.is_empty());

    for path in registry.paths() {
        let hashed = format!("{path}.h");
        registry.assign_hashed_path(&path, hashed).unwrap();
    }

    let keys: Vec<_> = registry.mapping().into_keys().collect();
    assert_eq!(keys, vec!["a/b.txt", "m.txt", "z.txt"]);
}
