//! Utility functions and helpers.
//!
//! - [`paths`]: Relative path keys as they appear in manifests
//! - [`thread_pool`]: Worker pool construction and hardware parallelism

/// Path normalization for manifest-style keys
pub mod paths;
/// Thread pool configuration for parallel sweeps
pub mod thread_pool;

use anyhow::{Context, Result};
use memmap2::MmapOptions;
use std::fs::File;
use std::path::Path;

/// Files at or above this size are memory mapped instead of read into a buffer.
pub const DEFAULT_MMAP_THRESHOLD: u64 = 1_048_576;

/// Reads a text file and hands its UTF-8 contents to `f`.
///
/// Small files are read normally. Larger files are memory mapped and validated
/// in place, so a multi-gigabyte manifest is never copied.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, mapped, or is not valid UTF-8.
pub fn with_text_file<T>(
    path: &Path,
    mmap_threshold: u64,
    f: impl FnOnce(&str) -> T,
) -> Result<T> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let len = file
        .metadata()
        .with_context(|| format!("Failed to stat {}", path.display()))?
        .len();

    if len == 0 {
        return Ok(f(""));
    }

    if len < mmap_threshold {
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let content = simdutf8::basic::from_utf8(&bytes)
            .map_err(|e| anyhow::anyhow!("Invalid UTF-8 in {}: {e}", path.display()))?;
        Ok(f(content))
    } else {
        // SAFETY: the mapping is read-only and dropped before returning
        let mmap = unsafe { MmapOptions::new().map(&file) }
            .with_context(|| format!("Failed to map {}", path.display()))?;
        let content = simdutf8::basic::from_utf8(&mmap)
            .map_err(|e| anyhow::anyhow!("Invalid UTF-8 in {}: {e}", path.display()))?;
        Ok(f(content))
    }
}

/// Iterates the lines of `content`, dropping the `\r` of CRLF line endings.
pub fn lines(content: &str) -> impl Iterator<Item = &str> {
    content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}
