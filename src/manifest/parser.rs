use super::{DIGEST_WIDTH, ManifestRecord};
use crate::utils::{lines, with_text_file};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{Level, debug, span, warn};

/// Byte offset where the path starts: digest plus a two character separator.
const PATH_OFFSET: usize = DIGEST_WIDTH + 2;

/// Reasons a manifest line is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LineError {
    /// Shorter than a digest plus separator
    #[error("line is shorter than 34 characters")]
    TooShort,
    /// The first 32 characters are not hexadecimal
    #[error("digest is not 32 hex characters")]
    InvalidDigest,
    /// Nothing follows the separator
    #[error("path is empty")]
    EmptyPath,
}

/// Records parsed from one or more manifest files.
#[derive(Debug, Clone, Default)]
pub struct ParsedManifest {
    /// Well-formed records, in file order
    pub records: Vec<ManifestRecord>,
    /// Number of lines skipped as malformed
    pub malformed: usize,
    /// Manifest files the records came from
    pub sources: Vec<PathBuf>,
}

impl ParsedManifest {
    fn extend(&mut self, other: Self) {
        self.records.extend(other.records);
        self.malformed += other.malformed;
        self.sources.extend(other.sources);
    }
}

/// Parses one `md5sum` output line.
///
/// Returns `Ok(None)` for blank lines. Lines starting with `\` use `md5sum`'s
/// escaped form, where backslashes and newlines in the path are escaped.
///
/// # Errors
///
/// Returns a [`LineError`] if the line is not a digest/path record.
pub fn parse_line(line: &str) -> Result<Option<ManifestRecord>, LineError> {
    if line.is_empty() {
        return Ok(None);
    }

    let (escaped, line) = match line.strip_prefix('\\') {
        Some(rest) => (true, rest),
        None => (false, line),
    };

    if line.len() < PATH_OFFSET {
        return Err(LineError::TooShort);
    }

    let digest = line
        .get(..DIGEST_WIDTH)
        .filter(|d| d.bytes().all(|b| b.is_ascii_hexdigit()))
        .ok_or(LineError::InvalidDigest)?;
    let raw_path = line.get(PATH_OFFSET..).ok_or(LineError::TooShort)?;

    let path = if escaped {
        unescape(raw_path)
    } else {
        raw_path.to_owned()
    };
    let path = match path.strip_prefix("./") {
        Some(stripped) => stripped.to_owned(),
        None => path,
    };

    if path.is_empty() {
        return Err(LineError::EmptyPath);
    }

    Ok(Some(ManifestRecord {
        digest: digest.to_ascii_lowercase(),
        path,
    }))
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Parses manifest text, skipping malformed lines with a warning.
#[must_use]
pub fn parse_manifest_str(content: &str, source: &Path) -> ParsedManifest {
    let mut parsed = ParsedManifest::default();

    for (idx, line) in lines(content).enumerate() {
        match parse_line(line) {
            Ok(Some(record)) => parsed.records.push(record),
            Ok(None) => {}
            Err(reason) => {
                parsed.malformed += 1;
                warn!(
                    manifest = %source.display(),
                    line = idx + 1,
                    %reason,
                    "Skipping malformed manifest line"
                );
            }
        }
    }

    parsed
}

/// Loads a single manifest file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid UTF-8.
pub fn load_manifest(path: &Path, mmap_threshold: u64) -> Result<ParsedManifest> {
    let span = span!(Level::DEBUG, "manifest_load", path = %path.display());
    let _guard = span.enter();

    let mut parsed = with_text_file(path, mmap_threshold, |content| {
        parse_manifest_str(content, path)
    })
    .with_context(|| format!("Failed to load manifest: {}", path.display()))?;
    parsed.sources.push(path.to_path_buf());

    debug!(
        records = parsed.records.len(),
        malformed = parsed.malformed,
        "Manifest loaded"
    );
    Ok(parsed)
}

/// Expands manifest patterns into file paths.
///
/// A pattern naming an existing file is taken literally, even if it contains
/// glob metacharacters. Anything else is a glob whose matches come back in
/// sorted order. Patterns are processed in the order given.
///
/// # Errors
///
/// Returns an error if a pattern is invalid or matches no file.
pub fn resolve_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut resolved = Vec::new();

    for pattern in patterns {
        let literal = Path::new(pattern);
        if literal.is_file() {
            resolved.push(literal.to_path_buf());
            continue;
        }

        let matches: Vec<PathBuf> = glob::glob(pattern)
            .with_context(|| format!("Invalid manifest pattern: {pattern}"))?
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    warn!(error = %e, "Unreadable path while expanding manifest pattern");
                    None
                }
            })
            .filter(|path| !path.is_dir())
            .collect();

        if matches.is_empty() {
            anyhow::bail!("No manifest file matches: {pattern}");
        }
        resolved.extend(matches);
    }

    Ok(resolved)
}

/// Loads every manifest matched by `patterns` and concatenates their records.
///
/// # Errors
///
/// Returns an error if no patterns are given, a pattern matches nothing, or a
/// matched file cannot be read.
pub fn load_manifests(patterns: &[String], mmap_threshold: u64) -> Result<ParsedManifest> {
    if patterns.is_empty() {
        anyhow::bail!("No manifest given (use -m/--md5)");
    }

    let mut combined = ParsedManifest::default();
    for path in resolve_patterns(patterns)? {
        combined.extend(load_manifest(&path, mmap_threshold)?);
    }
    Ok(combined)
}
