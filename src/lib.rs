//! # assetmark
//!
//! Fingerprints a tree of static assets for cache busting.
//!
//! ## Overview
//!
//! Every file of a source tree is copied into a destination tree under a name
//! that embeds a hash of its content (`css/site.css` becomes
//! `css/site.1f3a9c2e.css`). Relative `url(...)` references inside CSS files
//! are rewritten to point at the hashed names of the files they reference, and
//! a JSON manifest records the mapping from original to hashed paths.
//!
//! Because a stylesheet's output contains the hashed names of its
//! dependencies, its own hash changes whenever any dependency changes. Files
//! are therefore processed in dependency order: a file is rewritten only once
//! every file it references has been hashed. Reference cycles are reported as
//! errors.
//!
//! ## Architecture
//!
//! - [`cli`]: Command-line interface definitions using clap
//! - [`commands`]: The fingerprint run and its builder
//! - [`error`]: Error types and handling with thiserror + miette
//! - [`scanner`]: Extraction of `url(...)` references and their byte spans
//! - [`registry`]: One record per source file, with its references and hashed
//!   path
//! - [`scheduler`]: Dependency-ordered, cycle-detecting processing
//! - [`engine`]: Streaming rewrite that hashes exactly the bytes it writes
//! - [`manifest`]: Sorted JSON manifest
//!
//! Internal modules (not part of the public API):
//! - `discovery`: Source tree traversal with hidden-file filtering
//! - `hashing`: BLAKE3 stamps and memory-mapped source reading
//! - `logging`: Verbosity-gated stderr output
//! - `paths`: Forward-slash relative path arithmetic
//!
//! ## Library Usage
//!
//! ```no_run
//! use std::path::Path;
//!
//! use assetmark::commands::Fingerprint;
//!
//! let manifest = Fingerprint::builder()
//!     .source_dir(Path::new("static"))
//!     .dest_dir(Path::new("dist"))
//!     .manifest_path(Path::new("dist/manifest.json"))
//!     .build()?
//!     .run()?;
//!
//! println!("{} files fingerprinted", manifest.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Error Handling
//!
//! All fallible functions return [`error::Result`]. Errors are
//! `thiserror` enums annotated with `miette` diagnostics; the binary renders
//! them with miette's report handler.

pub mod cli;
pub mod commands;
pub mod engine;
pub mod error;
pub mod manifest;
pub mod registry;
pub mod scanner;
pub mod scheduler;

// Internal modules
mod discovery;
mod hashing;
mod logging;
mod paths;

pub use hashing::{STAMP_LEN, content_stamp};
pub use logging::Logger;
