//! The fingerprint run: discover, scan, schedule, write, record.

use std::fs;
use std::path::Path;

use crate::cli::normalize_path;
use crate::discovery::discover_files;
use crate::engine::Engine;
use crate::error::{MarkError, Result};
use crate::logging::Logger;
use crate::manifest::{Manifest, save_manifest};
use crate::registry::Registry;
use crate::scheduler::schedule;

pub struct Fingerprint<'a> {
    pub(crate) source_dir: &'a Path,
    pub(crate) dest_dir: &'a Path,
    pub(crate) manifest_path: Option<&'a Path>,
    pub(crate) verbose: u8,
    pub(crate) quiet: bool,
}

#[derive(Default)]
pub struct FingerprintBuilder<'a> {
    source_dir: Option<&'a Path>,
    dest_dir: Option<&'a Path>,
    manifest_path: Option<&'a Path>,
    verbose: u8,
    quiet: bool,
}

impl<'a> FingerprintBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source_dir(mut self, path: &'a Path) -> Self {
        self.source_dir = Some(path);
        self
    }

    pub fn dest_dir(mut self, path: &'a Path) -> Self {
        self.dest_dir = Some(path);
        self
    }

    /// Where to save the manifest; without one the manifest is only returned.
    pub fn manifest_path(mut self, path: &'a Path) -> Self {
        self.manifest_path = Some(path);
        self
    }

    pub fn verbose(mut self, verbose: u8) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn build(self) -> Result<Fingerprint<'a>> {
        let source_dir = self.source_dir.ok_or_else(|| MarkError::ConfigError {
            message: "source directory is required".to_string(),
        })?;
        let dest_dir = self.dest_dir.ok_or_else(|| MarkError::ConfigError {
            message: "destination directory is required".to_string(),
        })?;

        Ok(Fingerprint {
            source_dir,
            dest_dir,
            manifest_path: self.manifest_path,
            verbose: self.verbose,
            quiet: self.quiet,
        })
    }
}

impl<'a> Fingerprint<'a> {
    pub fn builder<'b>() -> FingerprintBuilder<'b> {
        FingerprintBuilder::new()
    }

    fn validate(&self) -> Result<()> {
        if !self.source_dir.is_dir() {
            return Err(MarkError::ConfigError {
                message: format!(
                    "source '{}' is not a directory",
                    self.source_dir.display()
                ),
            });
        }

        if normalize_path(self.dest_dir).starts_with(normalize_path(self.source_dir)) {
            return Err(MarkError::ConfigError {
                message: format!(
                    "destination '{}' must not be inside source '{}'",
                    self.dest_dir.display(),
                    self.source_dir.display()
                ),
            });
        }

        Ok(())
    }

    /// Fingerprints the source tree into the destination tree.
    ///
    /// Returns the manifest, which is also saved if a manifest path was
    /// configured. Any error aborts the run; files already written to the
    /// destination are left in place.
    pub fn run(self) -> Result<Manifest> {
        let log = Logger::new(self.verbose, self.quiet);
        self.validate()?;

        log.verbose(
            1,
            format!("Scanning {}...", self.source_dir.display()),
        );
        let discovered = discover_files(self.source_dir)?;
        if discovered.symlink_count > 0 {
            log.warn(format!(
                "Skipped {} symbolic link{}",
                discovered.symlink_count,
                if discovered.symlink_count == 1 { "" } else { "s" }
            ));
        }
        log.verbose(1, format!("Found {} files", discovered.files.len()));

        let mut registry = Registry::scan(self.source_dir, &discovered.files, &log)?;
        let dangling = registry.prune_dangling(&log);

        fs::create_dir_all(self.dest_dir)
            .map_err(|source| MarkError::CreateDirError(self.dest_dir.to_path_buf(), source))?;

        let engine = Engine::new(self.source_dir, self.dest_dir, log);
        let stats = schedule(&mut registry, &log, |file, registry| {
            engine.process(file, registry)
        })?;

        let manifest = Manifest::new(registry.mapping());
        if let Some(path) = self.manifest_path {
            save_manifest(&manifest, path)?;
        }

        log.info(format!(
            "Fingerprinted {} file(s) into {}",
            stats.processed,
            self.dest_dir.display()
        ));
        log.verbose(1, format!("  Scheduling passes: {}", stats.passes));
        if dangling > 0 {
            log.info(format!("  Dangling references dropped: {dangling}"));
            if log.level() == 0 {
                log.info("Run with -v for more details");
            }
        }
        if let Some(path) = self.manifest_path {
            log.info(format!("  Manifest saved to: {}", path.display()));
        }

        Ok(manifest)
    }
}
