use std::fs::File;
use std::io::{self, Write};
use std::ops::Deref;
use std::path::Path;

use blake3::Hasher;
use memmap2::Mmap;

use crate::error::{MarkError, Result};

/// Number of hex characters of the BLAKE3 digest embedded in file names.
pub const STAMP_LEN: usize = 8;

/// Truncated hex stamp for a finished hasher.
fn stamp(hasher: &Hasher) -> String {
    let hex = hasher.finalize().to_hex();
    hex.as_str()[..STAMP_LEN].to_string()
}

/// Computes the filename stamp of a byte string.
///
/// This is the same value [`HashingWriter::finish`] returns after the bytes
/// have been written through it.
pub fn content_stamp(bytes: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(bytes);
    stamp(&hasher)
}

/// A writer that hashes exactly the bytes it forwards to `inner`.
///
/// Every successful write updates the BLAKE3 state with the bytes the inner
/// writer accepted, so the digest always describes the output stream rather
/// than whatever the caller intended to write.
pub struct HashingWriter<W> {
    inner: W,
    hasher: Hasher,
}

impl<W: Write> HashingWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: Hasher::new(),
        }
    }

    /// Number of bytes hashed so far.
    pub fn bytes_written(&self) -> u64 {
        self.hasher.count()
    }

    /// Flushes the inner writer and returns it with the content stamp.
    pub fn finish(mut self) -> io::Result<(W, String)> {
        self.inner.flush()?;
        let stamp = stamp(&self.hasher);
        Ok((self.inner, stamp))
    }
}

impl<W: Write> Write for HashingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.hasher.update(&buf[..written]);
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Read-only view of a source file's bytes.
pub enum SourceBytes {
    Empty,
    Mapped(Mmap),
}

impl Deref for SourceBytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            SourceBytes::Empty => &[],
            SourceBytes::Mapped(mmap) => &mmap[..],
        }
    }
}

/// Memory-maps a source file for reading.
///
/// Empty files are not mapped, since zero-length mappings are rejected on
/// some platforms.
pub fn map_source(path: &Path) -> Result<SourceBytes> {
    let file = File::open(path).map_err(|source| MarkError::IoError {
        path: path.to_path_buf(),
        source,
    })?;

    let metadata = file.metadata().map_err(|source| MarkError::IoError {
        path: path.to_path_buf(),
        source,
    })?;

    if metadata.len() == 0 {
        return Ok(SourceBytes::Empty);
    }

    let mmap = unsafe { Mmap::map(&file) }.map_err(|source| MarkError::IoError {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(SourceBytes::Mapped(mmap))
}
