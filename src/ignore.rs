//! Prefix-based ignore rules.
//!
//! An ignore file lists one path prefix per line. A candidate is ignored when
//! any rule is a literal prefix of its relative path. Matching is plain string
//! comparison, not path-segment aware: the rule `ab` also ignores `abc/file`.

use crate::utils::{lines, with_text_file};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Set of literal path prefixes excluded from the sweep.
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    prefixes: HashSet<String>,
}

impl IgnoreSet {
    /// Creates an empty set that ignores nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses ignore rules from text, one prefix per non-empty line.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        lines(content)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Loads ignore rules from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid UTF-8.
    pub fn load(path: &Path, mmap_threshold: u64) -> Result<Self> {
        let set = with_text_file(path, mmap_threshold, Self::parse)
            .with_context(|| format!("Failed to load ignore file: {}", path.display()))?;
        debug!(path = %path.display(), rules = set.len(), "Ignore rules loaded");
        Ok(set)
    }

    /// Adds a prefix rule. Empty prefixes are not accepted since they would
    /// match every path.
    pub fn insert(&mut self, prefix: impl Into<String>) -> bool {
        let prefix = prefix.into();
        if prefix.is_empty() {
            return false;
        }
        self.prefixes.insert(prefix)
    }

    /// Whether some rule is a prefix of `path`.
    #[must_use]
    pub fn is_ignored(&self, path: &str) -> bool {
        self.prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()))
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    /// Whether there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

impl FromIterator<String> for IgnoreSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut set = Self::new();
        for prefix in iter {
            set.insert(prefix);
        }
        set
    }
}
