//! Reference scanning for recognized document formats.
//!
//! The only recognized construct is the CSS `url(...)` function. Parsing is
//! deliberately loose: a single forward pass over raw bytes that locates path
//! tokens and records their exact byte spans, without validating the
//! surrounding syntax. Only relative paths are kept; absolute paths and URLs
//! with a scheme are left alone.

use std::path::Path;

use percent_encoding::percent_decode_str;

use crate::paths::{join_normalized, parent_dir};

const URL_OPEN: &[u8] = b"url(";

/// A relative file reference inside a source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Byte offset where the raw token begins.
    pub position: usize,
    /// Byte length of the raw token.
    pub length: usize,
    /// Resolved source-relative path of the referenced file.
    pub target: String,
    /// Query string and/or fragment carried by the raw token (`?v=1#x`),
    /// written back unchanged after the rewritten path.
    pub suffix: String,
}

impl Reference {
    /// Exclusive end offset of the raw token.
    pub fn end(&self) -> usize {
        self.position + self.length
    }
}

/// Document formats the scanner knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Stylesheets; `url(...)` tokens are rewritten.
    Css,
    /// Anything else; copied and hashed without scanning.
    Opaque,
}

impl DocumentKind {
    /// Picks the document kind from a path's extension.
    pub fn from_path(path: &str) -> Self {
        match Path::new(path).extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("css") => DocumentKind::Css,
            _ => DocumentKind::Opaque,
        }
    }

    /// Scans `bytes` for references, resolving them against `doc_path`.
    pub fn scan(self, bytes: &[u8], doc_path: &str) -> Vec<Reference> {
        match self {
            DocumentKind::Css => scan_css(bytes, doc_path),
            DocumentKind::Opaque => Vec::new(),
        }
    }
}

/// Finds every relative `url(...)` reference in a stylesheet.
///
/// `doc_path` is the stylesheet's own source-relative path; referenced paths
/// are resolved against its directory. The returned references are sorted by
/// position and never overlap.
pub fn scan_css(bytes: &[u8], doc_path: &str) -> Vec<Reference> {
    let dir = parent_dir(doc_path);
    let mut references = Vec::new();
    let mut pos = 0;

    while pos + URL_OPEN.len() <= bytes.len() {
        if &bytes[pos..pos + URL_OPEN.len()] != URL_OPEN {
            pos += 1;
            continue;
        }

        let (offset, token) = read_url(&bytes[pos..]);
        let start = pos + offset;
        if let Some(reference) = make_reference(dir, start, token) {
            references.push(reference);
        }
        pos = start + token.len();
    }

    references
}

fn is_start_byte(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b'"' || b == b'\''
}

fn is_end_byte(b: u8) -> bool {
    b.is_ascii_whitespace() || matches!(b, b')' | b'"' | b'\'')
}

/// Reads the token following a `url(` at the start of `input`.
///
/// Returns the token's offset from the start of `input` and the token bytes.
/// Stops at end of input if the token is unterminated.
fn read_url(input: &[u8]) -> (usize, &[u8]) {
    debug_assert!(input.starts_with(URL_OPEN));

    let rest = &input[URL_OPEN.len()..];
    let skipped = rest.iter().take_while(|&&b| is_start_byte(b)).count();
    let rest = &rest[skipped..];
    let length = rest.iter().take_while(|&&b| !is_end_byte(b)).count();

    (URL_OPEN.len() + skipped, &rest[..length])
}

/// Absolute paths and URLs with a scheme are not rewritten.
fn is_relative_token(token: &str) -> bool {
    !token.is_empty() && !token.starts_with('/') && !token.contains("://")
}

/// Splits a token into its path part and `?query` / `#fragment` tail.
fn split_suffix(token: &str) -> (&str, &str) {
    match token.find(['?', '#']) {
        Some(idx) => token.split_at(idx),
        None => (token, ""),
    }
}

/// Resolves a raw token to a source-relative path and its suffix.
fn resolve_token(dir: &str, token: &str) -> Option<(String, String)> {
    if !is_relative_token(token) {
        return None;
    }

    let (path, suffix) = split_suffix(token);
    if path.is_empty() {
        return None;
    }
    let decoded = percent_decode_str(path).decode_utf8_lossy();
    let target = join_normalized(dir, &decoded)?;

    Some((target, suffix.to_string()))
}

fn make_reference(dir: &str, position: usize, token: &[u8]) -> Option<Reference> {
    let text = String::from_utf8_lossy(token);
    let (target, suffix) = resolve_token(dir, &text)?;

    Some(Reference {
        position,
        length: token.len(),
        target,
        suffix,
    })
}
