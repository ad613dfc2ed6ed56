use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{MarkError, Result};
use crate::hashing::map_source;
use crate::logging::Logger;
use crate::scanner::{DocumentKind, Reference};

/// One discovered source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    path: String,
    references: Vec<Reference>,
    hashed_path: Option<String>,
}

impl SourceFile {
    /// Creates an unprocessed file record.
    pub fn new(path: impl Into<String>, references: Vec<Reference>) -> Self {
        Self {
            path: path.into(),
            references,
            hashed_path: None,
        }
    }

    /// Source-relative path; the registry key.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// References found at scan time, ascending by position.
    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    /// Destination-relative hashed path, once processed.
    pub fn hashed_path(&self) -> Option<&str> {
        self.hashed_path.as_deref()
    }
}

/// All files of a run, keyed by source-relative path.
///
/// Built once from the discovered file list; afterwards the only mutation is
/// the single assignment of each file's hashed path.
#[derive(Debug, Default)]
pub struct Registry {
    files: BTreeMap<String, SourceFile>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and scans every discovered file under `source_root`.
    ///
    /// Recognized documents are scanned for references; other files get an
    /// empty reference list without being read.
    pub fn scan(source_root: &Path, paths: &[String], log: &Logger) -> Result<Self> {
        let mut registry = Self::new();

        for path in paths {
            let references = match DocumentKind::from_path(path) {
                DocumentKind::Opaque => Vec::new(),
                kind => {
                    let bytes = map_source(&source_root.join(path))?;
                    let references = kind.scan(&bytes, path);
                    for reference in &references {
                        log.verbose(2, format!("  {path} -> {}", reference.target));
                    }
                    references
                }
            };

            registry.insert(SourceFile::new(path.clone(), references));
        }

        Ok(registry)
    }

    /// Adds a file, replacing any previous record with the same path.
    pub fn insert(&mut self, file: SourceFile) {
        self.files.insert(file.path.clone(), file);
    }

    /// Drops references whose target is not a known file.
    ///
    /// Returns the number of references removed. Each one is reported as a
    /// warning; the referring file is still processed.
    pub fn prune_dangling(&mut self, log: &Logger) -> usize {
        let known: Vec<String> = self.files.keys().cloned().collect();
        let mut removed = 0;

        for file in self.files.values_mut() {
            file.references.retain(|reference| {
                let exists = known.binary_search(&reference.target).is_ok();
                if !exists {
                    removed += 1;
                    log.warn(format!(
                        "'{}' references nonexistent path '{}'",
                        file.path, reference.target
                    ));
                }
                exists
            });
        }

        removed
    }

    /// Records the hashed path of `path`. A file may be hashed only once.
    pub fn assign_hashed_path(&mut self, path: &str, hashed_path: String) -> Result<()> {
        let file = self
            .files
            .get_mut(path)
            .ok_or_else(|| MarkError::InvalidPath {
                message: format!("'{path}' is not in the registry"),
            })?;

        if file.hashed_path.is_some() {
            return Err(MarkError::AlreadyHashed {
                path: path.to_string(),
            });
        }

        file.hashed_path = Some(hashed_path);
        Ok(())
    }

    /// Looks up a file by its source-relative path.
    pub fn get(&self, path: &str) -> Option<&SourceFile> {
        self.files.get(path)
    }

    /// Hashed path of `path`, if the file exists and has been processed.
    pub fn hashed_path(&self, path: &str) -> Option<&str> {
        self.files.get(path).and_then(SourceFile::hashed_path)
    }

    /// Whether every reference target of `file` already has a hashed path.
    pub fn is_ready(&self, file: &SourceFile) -> bool {
        file.references
            .iter()
            .all(|reference| self.hashed_path(&reference.target).is_some())
    }

    /// Source paths in sorted order.
    pub fn paths(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }

    /// Source → hashed path for every processed file, sorted by source path.
    pub fn mapping(&self) -> BTreeMap<String, String> {
        self.files
            .values()
            .filter_map(|file| {
                file.hashed_path
                    .as_ref()
                    .map(|hashed| (file.path.clone(), hashed.clone()))
            })
            .collect()
    }

    /// Returns the number of files in the registry.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if the registry contains no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests;
