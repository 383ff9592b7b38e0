use crate::utils::paths::{is_hidden_name, relative_key};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{Level, debug, span, warn};
use walkdir::WalkDir;

/// Options for a directory scan
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// Descend into and emit entries whose name starts with `.`
    pub include_hidden: bool,
}

/// Recursively lists regular files under `root` as `/`-separated relative paths.
///
/// Hidden entries are skipped, including everything below a hidden directory,
/// unless `include_hidden` is set. The root itself is never treated as hidden.
/// Symlinks are neither followed nor emitted.
///
/// Entries are visited in file-name order, so the result is stable for an
/// unchanged tree.
///
/// # Errors
///
/// Returns an error if `root` cannot be read. Unreadable entries below the
/// root are logged and skipped.
pub fn scan(root: &Path, include_hidden: bool) -> Result<Vec<String>> {
    scan_with(root, ScanOptions { include_hidden })
}

/// Same as [`scan`], taking [`ScanOptions`].
///
/// # Errors
///
/// Returns an error if `root` cannot be read.
pub fn scan_with(root: &Path, options: ScanOptions) -> Result<Vec<String>> {
    let span = span!(Level::DEBUG, "scan", root = %root.display(), include_hidden = options.include_hidden);
    let _guard = span.enter();

    let mut candidates = Vec::new();
    let mut skipped = 0usize;

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0 || options.include_hidden || !is_hidden_name(e.file_name())
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(e)
                    .with_context(|| format!("Failed to read scan root: {}", root.display()));
            }
            Err(e) => {
                skipped += 1;
                warn!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        match relative_key(relative) {
            Some(key) => candidates.push(key),
            None => {
                skipped += 1;
                warn!(path = %entry.path().display(), "Skipping path that is not valid UTF-8");
            }
        }
    }

    debug!(found = candidates.len(), skipped, "Scan complete");
    Ok(candidates)
}
