//! JSON manifest of original → hashed paths.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MarkError, Result};

/// Mapping from source-relative path to destination-relative hashed path.
///
/// Serialized as a flat JSON object; keys are always emitted in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: BTreeMap<String, String>,
}

impl Manifest {
    pub fn new(entries: BTreeMap<String, String>) -> Self {
        Self { entries }
    }

    /// Hashed path of a source file.
    pub fn get(&self, source_path: &str) -> Option<&str> {
        self.entries.get(source_path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pretty-printed JSON with a trailing newline.
    pub fn to_json(&self) -> Result<String> {
        let mut json =
            serde_json::to_string_pretty(self).map_err(MarkError::ManifestSerialization)?;
        json.push('\n');
        Ok(json)
    }
}

/// Saves the manifest to disk atomically.
///
/// Writes to a temporary file next to `path`, then renames it into place, so
/// readers never observe a partially written manifest. Creates the parent
/// directory if it doesn't exist.
pub fn save_manifest(manifest: &Manifest, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|source| MarkError::CreateDirError(parent.to_path_buf(), source))?;
    }

    let json = manifest.to_json()?;
    let temp_path = path.with_extension("tmp");

    let mut temp_file = File::create(&temp_path).map_err(|source| MarkError::IoError {
        path: temp_path.clone(),
        source,
    })?;

    temp_file
        .write_all(json.as_bytes())
        .map_err(|source| MarkError::IoError {
            path: temp_path.clone(),
            source,
        })?;

    temp_file.sync_all().map_err(|source| MarkError::IoError {
        path: temp_path.clone(),
        source,
    })?;

    fs::rename(&temp_path, path).map_err(|source| MarkError::IoError {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(())
}
