//! Burn manifests and their decomposition into lookup sets.
//!
//! A manifest is the `md5sum` output of a previous burn pass: one digest and
//! one path per line. Before a sweep starts, every record is split into two
//! read-only sets:
//!
//! - [`KnownDigests`]: every recorded digest, for rename-independent matching
//! - [`KnownPaths`]: every recorded path plus its compressed/decompressed
//!   variant, so `a.txt` and `a.txt.xz` are interchangeable
//!
//! Both sets are built once and shared immutably across workers.

/// Manifest line parsing and file loading
pub mod parser;

pub use parser::{ParsedManifest, load_manifest, load_manifests, parse_line};

use std::collections::HashSet;

/// Width of a digest in hex characters (MD5-class).
pub const DIGEST_WIDTH: usize = 32;

/// Suffix appended by the compression step of a burn pass.
pub const DEFAULT_COMPRESSED_SUFFIX: &str = ".xz";

/// One line of a manifest: a content digest and the path it was recorded for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ManifestRecord {
    /// Lowercase hex digest
    pub digest: String,
    /// Path relative to the burn root, without a leading `./`
    pub path: String,
}

impl ManifestRecord {
    /// Creates a record from its parts.
    pub fn new(digest: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            digest: digest.into(),
            path: path.into(),
        }
    }
}

/// Set of digests recorded by previous burns.
#[derive(Debug, Clone, Default)]
pub struct KnownDigests(HashSet<String>);

impl KnownDigests {
    /// Whether `digest` was recorded by any manifest.
    #[must_use]
    pub fn contains(&self, digest: &str) -> bool {
        self.0.contains(digest)
    }

    /// Number of distinct digests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no digest is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Set of paths (and their compression variants) recorded by previous burns.
#[derive(Debug, Clone, Default)]
pub struct KnownPaths(HashSet<String>);

impl KnownPaths {
    /// Whether `path` or one of its variants was recorded.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.0.contains(path)
    }

    /// Number of distinct path variants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no path is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Splits manifest records into the digest set and the path-variant set.
///
/// For every record the path itself, the path with `suffix` appended, and,
/// when the path already ends in `suffix`, the path with it removed, all
/// count as known. A path shorter than the suffix only gets the first two.
pub fn decompose<'a, I>(records: I, suffix: &str) -> (KnownDigests, KnownPaths)
where
    I: IntoIterator<Item = &'a ManifestRecord>,
{
    let mut digests = HashSet::new();
    let mut paths = HashSet::new();

    for record in records {
        digests.insert(record.digest.clone());
        paths.insert(record.path.clone());
        paths.insert(format!("{}{suffix}", record.path));
        if !suffix.is_empty()
            && let Some(stripped) = record.path.strip_suffix(suffix)
        {
            paths.insert(stripped.to_owned());
        }
    }

    (KnownDigests(digests), KnownPaths(paths))
}
