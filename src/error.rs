//! Errors that stop a sweep.

use crate::digest::DigestError;

/// A failure that aborts the whole sweep.
///
/// Per-file read failures never reach this type as an abort reason: the
/// dispatcher skips those files and keeps going.
#[derive(Debug, thiserror::Error)]
pub enum SweepError {
    /// Digesting failed.
    #[error(transparent)]
    Digest(#[from] DigestError),
    /// A new file could not be written to the output stream.
    #[error("failed to write report")]
    Sink(#[source] std::io::Error),
    /// The worker pool could not be started.
    #[error("failed to start worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl SweepError {
    /// Whether the error concerns only the file being classified.
    #[must_use]
    pub const fn is_per_file(&self) -> bool {
        matches!(self, Self::Digest(e) if !e.is_fatal())
    }
}
