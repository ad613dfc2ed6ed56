//! Command-line interface definitions for assetmark.
//!
//! This module defines the CLI structure using clap. The main entry point is
//! the [`Cli`] struct.
//!
//! # Example
//!
//! ```no_run
//! use assetmark::cli::Cli;
//!
//! // Parse command-line arguments
//! let cli = Cli::parse_args();
//!
//! println!(
//!     "Fingerprinting {} into {}",
//!     cli.source().display(),
//!     cli.dest().display()
//! );
//! ```

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::error::{MarkError, Result};


/// Default manifest location, relative to the working directory.
pub const DEFAULT_MANIFEST: &str = "manifest.json";

/// Main command-line interface for assetmark.
///
/// Recursively copies every non-hidden file of `SOURCE` into `DEST`, adding a
/// content hash to each file name. Relative `url(...)` references in CSS files
/// are rewritten to the hashed names.
#[derive(Parser, Debug)]
#[command(
    name = "assetmark",
    bin_name = "assetmark",
    author,
    version,
    about = "Fingerprint static assets with content hashes for cache busting",
    long_about = None
)]
pub struct Cli {
    /// Directory containing the assets to fingerprint
    #[arg(env = "ASSETMARK_SOURCE")]
    source: PathBuf,

    /// Directory to write hashed files into (created if it does not exist)
    #[arg(env = "ASSETMARK_DEST")]
    dest: PathBuf,

    #[command(flatten)]
    global_opts: GlobalOpts,
}

/// Options controlling output locations and verbosity.
#[derive(Parser, Debug)]
pub struct GlobalOpts {
    /// Path of the JSON manifest mapping original to hashed paths
    #[arg(
        short,
        long,
        default_value = DEFAULT_MANIFEST,
        env = "ASSETMARK_MANIFEST"
    )]
    manifest: PathBuf,

    /// Enable verbose output (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, env = "ASSETMARK_VERBOSE")]
    verbose: u8,

    /// Silence all output except for errors
    #[arg(short, long, conflicts_with = "verbose", env = "ASSETMARK_QUIET")]
    quiet: bool,
}

impl GlobalOpts {
    /// Create a new builder for constructing `GlobalOpts` programmatically.
    pub fn builder() -> GlobalOptsBuilder {
        GlobalOptsBuilder::default()
    }

    /// Get the absolute manifest path
    pub fn get_manifest_path(&self) -> PathBuf {
        normalize_path(&self.manifest)
    }

    /// Get the manifest path as given
    pub fn manifest(&self) -> &Path {
        &self.manifest
    }

    /// Get the verbose level
    pub fn verbose(&self) -> u8 {
        self.verbose
    }

    /// Check if quiet mode is enabled
    pub fn quiet(&self) -> bool {
        self.quiet
    }
}

/// Builder for constructing `GlobalOpts` programmatically.
#[derive(Default)]
pub struct GlobalOptsBuilder {
    manifest: Option<PathBuf>,
    verbose: u8,
    quiet: bool,
}

impl GlobalOptsBuilder {
    /// Set the manifest path.
    pub fn manifest(mut self, path: Option<impl Into<PathBuf>>) -> Self {
        self.manifest = path.map(|p| p.into());
        self
    }

    /// Set the verbosity level (0 = normal, 1+ = verbose).
    pub fn verbose(mut self, level: u8) -> Self {
        self.verbose = level;
        self
    }

    /// Enable or disable quiet mode.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Build the `GlobalOpts` instance with the configured values.
    pub fn build(self) -> GlobalOpts {
        GlobalOpts {
            manifest: self
                .manifest
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST)),
            verbose: self.verbose,
            quiet: self.quiet,
        }
    }
}

impl Cli {
    /// Get the global options
    pub fn global_opts(&self) -> &GlobalOpts {
        &self.global_opts
    }

    /// Get the source directory as given
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Get the destination directory as given
    pub fn dest(&self) -> &Path {
        &self.dest
    }

    /// Get the absolute source directory
    pub fn get_source_dir(&self) -> PathBuf {
        normalize_path(&self.source)
    }

    /// Get the absolute destination directory
    pub fn get_dest_dir(&self) -> PathBuf {
        normalize_path(&self.dest)
    }

    /// Create a builder for programmatic construction
    pub fn builder() -> CliBuilder {
        CliBuilder::default()
    }

    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Builder for [`Cli`]
#[derive(Debug, Default)]
pub struct CliBuilder {
    source: Option<PathBuf>,
    dest: Option<PathBuf>,
    manifest: Option<PathBuf>,
    verbose: u8,
    quiet: bool,
}

impl CliBuilder {
    /// Set the source directory
    pub fn source(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source = Some(dir.into());
        self
    }

    /// Set the destination directory
    pub fn dest(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dest = Some(dir.into());
        self
    }

    /// Set the manifest path
    pub fn manifest(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest = Some(path.into());
        self
    }

    /// Set the verbose level
    pub fn verbose(mut self, level: u8) -> Self {
        self.verbose = level;
        self
    }

    /// Enable quiet mode
    pub fn quiet(mut self, enabled: bool) -> Self {
        self.quiet = enabled;
        self
    }

    /// Build the Cli instance
    pub fn build(self) -> Result<Cli> {
        let source = self.source.ok_or_else(|| MarkError::ConfigError {
            message: "Source directory is required".to_string(),
        })?;
        let dest = self.dest.ok_or_else(|| MarkError::ConfigError {
            message: "Destination directory is required".to_string(),
        })?;

        Ok(Cli {
            source,
            dest,
            global_opts: GlobalOpts::builder()
                .manifest(self.manifest)
                .verbose(self.verbose)
                .quiet(self.quiet)
                .build(),
        })
    }
}

/// Normalize a path to be absolute and clean, without requiring it to exist.
///
/// This function:
/// - Converts relative paths to absolute using the current directory
/// - Removes `.` and `..` components where possible
/// - Does NOT resolve symlinks (preserves user intent)
/// - Does NOT require the path to exist
pub(crate) fn normalize_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();

    let absolute = if path.is_relative() {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    } else {
        path.to_path_buf()
    };

    let mut components = Vec::new();
    for component in absolute.components() {
        use std::path::Component;
        match component {
            Component::ParentDir => {
                if let Some(last) = components.last()
                    && !matches!(last, Component::ParentDir | Component::RootDir)
                {
                    components.pop();
                    continue;
                }
                if matches!(components.last(), Some(Component::RootDir)) {
                    continue;
                }
                components.push(component);
            }
            Component::CurDir => continue,
            _ => components.push(component),
        }
    }

    let mut result = PathBuf::new();
    for component in components {
        result.push(component);
    }

    result
}
