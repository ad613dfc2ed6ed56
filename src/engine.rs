//! The rewrite-and-hash engine.
//!
//! Given a file whose references all point at already-hashed files, the engine
//! streams the source bytes into a staging file in the destination tree,
//! replacing each reference span with the target's hashed path. Everything
//! written also flows through a BLAKE3 hasher, so the resulting stamp covers
//! the rewritten output rather than the original source. The staging file is
//! then renamed onto its stamped name.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::error::{MarkError, Result};
use crate::hashing::{HashingWriter, map_source};
use crate::logging::Logger;
use crate::paths::{file_name, parent_dir, relative_path};
use crate::registry::{Registry, SourceFile};
use crate::scanner::Reference;

/// Bytes that would end or corrupt an unquoted CSS url token.
const URL_TOKEN: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'\'')
    .add(b'(')
    .add(b')')
    .add(b'%')
    .add(b'?')
    .add(b'#');

/// Inserts `stamp` before the final extension of the file name in `path`.
///
/// `css/main.css` becomes `css/main.<stamp>.css`; a name without an extension
/// gets the stamp appended as a final segment.
pub fn hashed_file_name(path: &str, stamp: &str) -> String {
    let dir = parent_dir(path);
    let name = file_name(path);

    let stamped = match name.rfind('.') {
        Some(idx) if idx > 0 => format!("{}.{stamp}{}", &name[..idx], &name[idx..]),
        _ => format!("{name}.{stamp}"),
    };

    if dir.is_empty() {
        stamped
    } else {
        format!("{dir}/{stamped}")
    }
}

/// Writes files into the destination tree.
pub struct Engine<'a> {
    source_root: &'a Path,
    dest_root: &'a Path,
    log: Logger,
}

impl<'a> Engine<'a> {
    pub fn new(source_root: &'a Path, dest_root: &'a Path, log: Logger) -> Self {
        Self {
            source_root,
            dest_root,
            log,
        }
    }

    /// Rewrites, hashes and publishes one ready file.
    ///
    /// Returns the destination-relative hashed path. Every reference target
    /// must already have a hashed path in `registry`.
    pub fn process(&self, file: &SourceFile, registry: &Registry) -> Result<String> {
        let source_path = self.source_root.join(file.path());
        let bytes = map_source(&source_path)?;
        check_spans(file, bytes.len())?;

        let dest_dir = self.dest_root.join(parent_dir(file.path()));
        fs::create_dir_all(&dest_dir)
            .map_err(|source| MarkError::CreateDirError(dest_dir.clone(), source))?;

        let staging_path = dest_dir.join(format!(".{}.assetmark-tmp", file_name(file.path())));
        let staging = File::create(&staging_path).map_err(|source| MarkError::IoError {
            path: staging_path.clone(),
            source,
        })?;

        let io_err = |source| MarkError::IoError {
            path: staging_path.clone(),
            source,
        };

        let mut writer = HashingWriter::new(BufWriter::new(staging));
        rewrite(&mut writer, &bytes, file, registry, &staging_path)?;
        let written = writer.bytes_written();

        let (buffered, stamp) = writer.finish().map_err(io_err)?;
        let staging = buffered.into_inner().map_err(|e| io_err(e.into_error()))?;
        staging.sync_all().map_err(io_err)?;
        drop(staging);

        let hashed_path = hashed_file_name(file.path(), &stamp);
        let final_path = self.destination(&hashed_path);
        fs::rename(&staging_path, &final_path).map_err(|source| MarkError::IoError {
            path: final_path.clone(),
            source,
        })?;

        self.log.verbose(
            1,
            format!("  {} -> {hashed_path} ({written} bytes)", file.path()),
        );

        Ok(hashed_path)
    }

    /// Absolute destination path of a destination-relative path.
    pub fn destination(&self, relative: &str) -> PathBuf {
        self.dest_root.join(relative)
    }
}

/// Verifies that every span lies inside the document, in ascending order.
fn check_spans(file: &SourceFile, size: usize) -> Result<()> {
    let mut last = 0;
    for reference in file.references() {
        if reference.position < last || reference.end() > size {
            return Err(MarkError::SpanOutOfBounds {
                path: file.path().to_string(),
                position: reference.position,
                length: reference.length,
                size,
            });
        }
        last = reference.end();
    }
    Ok(())
}

/// Text that replaces `reference` in a document located in `dir`.
fn replacement(
    dir: &str,
    file: &SourceFile,
    reference: &Reference,
    registry: &Registry,
) -> Result<String> {
    let hashed = registry.hashed_path(&reference.target).ok_or_else(|| {
        MarkError::UnresolvedReference {
            path: file.path().to_string(),
            target: reference.target.clone(),
        }
    })?;

    let relative = relative_path(dir, hashed);
    Ok(format!(
        "{}{}",
        utf8_percent_encode(&relative, URL_TOKEN),
        reference.suffix
    ))
}

/// Copies `bytes` to `out`, substituting every reference span.
///
/// Spans must already be validated with [`check_spans`].
fn rewrite<W: Write>(
    out: &mut HashingWriter<W>,
    bytes: &[u8],
    file: &SourceFile,
    registry: &Registry,
    staging_path: &Path,
) -> Result<()> {
    let dir = parent_dir(file.path());
    let mut last = 0;

    let write = |out: &mut HashingWriter<W>, chunk: &[u8]| {
        out.write_all(chunk).map_err(|source| MarkError::IoError {
            path: staging_path.to_path_buf(),
            source,
        })
    };

    for reference in file.references() {
        write(out, &bytes[last..reference.position])?;
        let text = replacement(dir, file, reference, registry)?;
        write(out, text.as_bytes())?;
        last = reference.end();
    }

    write(out, &bytes[last..])
}
