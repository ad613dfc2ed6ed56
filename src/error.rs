//! Error types for assetmark.
//!
//! This module defines all error types used throughout assetmark, using a
//! combination of `thiserror` for ergonomic error definitions and `miette` for
//! rich diagnostic output.
//!
//! # Error Handling Strategy
//!
//! - All errors derive from [`MarkError`]
//! - Every error is fatal for the run; dangling references are the only
//!   recoverable condition and are reported as warnings, not errors
//! - Context is preserved through the error chain
//! - Errors are automatically converted to `miette::Result` for CLI output
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use assetmark::error::{MarkError, Result};
//!
//! fn check_source(path: &Path) -> Result<()> {
//!     if !path.is_dir() {
//!         return Err(MarkError::ConfigError {
//!             message: format!("'{}' is not a directory", path.display()),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Error types that can occur in assetmark operations
#[derive(Error, Debug, Diagnostic)]
pub enum MarkError {
    /// File system I/O error while reading sources or writing outputs.
    ///
    /// Common causes: permission denied, file not found, disk full, or memory
    /// mapping failures.
    #[error("I/O error accessing '{path}'")]
    #[diagnostic(code(assetmark::io_error))]
    IoError {
        /// The path that caused the I/O error
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a directory in the destination tree.
    #[error("Failed to create directory '{0}'")]
    #[diagnostic(
        code(assetmark::output::create_dir_error),
        help("Ensure you have write permissions for the destination directory.")
    )]
    CreateDirError(
        /// The directory path that couldn't be created
        PathBuf,
        /// The underlying I/O error
        #[source]
        std::io::Error,
    ),

    /// The scheduler made no progress while files were still waiting.
    ///
    /// Every remaining file references (directly or transitively) another
    /// remaining file, so no hashed name can ever be computed for them.
    #[error("Reference cycle detected among: {}", .files.join(", "))]
    #[diagnostic(
        code(assetmark::schedule::cycle),
        help(
            "A file's hashed name depends on the hashed names of the files it references. Break \
             the cycle by removing one of the url() references."
        )
    )]
    DependencyCycle {
        /// Source paths of the files that could not be scheduled
        files: Vec<String>,
    },

    /// A reference span does not fit inside its document.
    ///
    /// Spans are produced by the scanner from the same bytes the engine reads,
    /// so this means the source file changed during the run or the registry
    /// is inconsistent.
    #[error(
        "Reference at byte {position} (length {length}) is outside '{path}' ({size} bytes)"
    )]
    #[diagnostic(
        code(assetmark::engine::span_out_of_bounds),
        help("Make sure source files are not modified while assetmark is running.")
    )]
    SpanOutOfBounds {
        /// Source path of the document
        path: String,
        /// Start offset of the span
        position: usize,
        /// Length of the span
        length: usize,
        /// Size of the document in bytes
        size: usize,
    },

    /// A reference target had no hashed name when its referrer was rewritten.
    #[error("'{path}' references '{target}', which has not been hashed yet")]
    #[diagnostic(code(assetmark::engine::unresolved_reference))]
    UnresolvedReference {
        /// The referring file
        path: String,
        /// The referenced file
        target: String,
    },

    /// A file was assigned a hashed name twice.
    #[error("'{path}' already has a hashed name")]
    #[diagnostic(code(assetmark::registry::already_hashed))]
    AlreadyHashed {
        /// The file that was processed twice
        path: String,
    },

    /// A discovered path cannot be used as a registry key.
    #[error("Invalid path: {message}")]
    #[diagnostic(code(assetmark::path::invalid))]
    InvalidPath {
        /// Description of why the path is invalid
        message: String,
    },

    /// A discovered path contains non-UTF-8 sequences.
    #[error("Invalid UTF-8 in path: {0}")]
    #[diagnostic(
        code(assetmark::path::invalid_utf8),
        help("Manifest keys are UTF-8 strings, so every source path must be valid UTF-8.")
    )]
    InvalidUtf8Path(
        /// The path containing invalid UTF-8
        PathBuf,
    ),

    /// Failed to serialize the manifest to JSON.
    #[error("Failed to serialize manifest")]
    #[diagnostic(code(assetmark::manifest::serialization_error))]
    ManifestSerialization(#[source] serde_json::Error),

    /// Invalid command-line or builder configuration.
    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(assetmark::config::error),
        help("Check the source and destination arguments.")
    )]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },
}

/// Type alias for Results in this crate
pub type Result<T> = std::result::Result<T, MarkError>;
