//! Content digesting behind a pluggable interface.
//!
//! The sweep only needs one thing from a digester: a lowercase 32 character
//! hex string for a file, in the same format the manifest recorded. Three
//! implementations are provided:
//!
//! - [`Md5Digester`]: native MD5, matching `md5sum` manifests (default)
//! - [`Xxh3Digester`]: xxHash3-128, for manifests written with the same hash
//! - [`CommandDigester`]: runs an external `md5sum`-compatible program
//!
//! # Errors
//!
//! A [`DigestError::Io`] concerns a single file and the sweep skips that file.
//! The other variants mean the digesting mechanism itself is broken and the
//! whole run must stop, see [`DigestError::is_fatal`].

mod command;
mod native;

pub use command::CommandDigester;
pub use native::{Md5Digester, Xxh3Digester};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Failure to produce a digest.
#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    /// The file could not be opened or read.
    #[error("failed to read {}", path.display())]
    Io {
        /// File being digested
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },
    /// The digesting mechanism cannot be invoked at all.
    #[error("digest tool `{tool}` is unavailable: {reason}")]
    ToolUnavailable {
        /// Program or algorithm name
        tool: String,
        /// Why it could not be used
        reason: String,
    },
    /// An external tool ran but did not print a digest.
    #[error("digest tool `{tool}` produced unusable output: {output:?}")]
    MalformedToolOutput {
        /// Program name
        tool: String,
        /// First line of what it printed
        output: String,
    },
}

impl DigestError {
    /// Whether this error invalidates the whole run rather than one file.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::Io { .. })
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Computes content digests for files.
///
/// Implementations are shared by every worker, so they must be `Send + Sync`
/// and must not rely on per-call mutable state.
pub trait ContentDigester: Send + Sync {
    /// Digest of the file at `path` as lowercase hex.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::Io`] when the file cannot be read and a fatal
    /// variant when the mechanism itself fails.
    fn digest(&self, path: &Path) -> Result<String, DigestError>;

    /// Short name used in diagnostics.
    fn name(&self) -> &str;
}

/// Digest algorithm selectable from config and the command line.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// Native MD5
    #[default]
    Md5,
    /// Native xxHash3-128
    Xxh3,
    /// External `md5sum`-compatible program
    Md5sum,
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Md5 => "md5",
            Self::Xxh3 => "xxh3",
            Self::Md5sum => "md5sum",
        };
        f.write_str(name)
    }
}

/// Builds the digester for `algorithm`.
///
/// `command` is only used by [`DigestAlgorithm::Md5sum`]; `mmap_threshold`
/// only by the native digesters.
///
/// # Errors
///
/// Returns [`DigestError::ToolUnavailable`] if an external program cannot be
/// located.
pub fn digester_for(
    algorithm: DigestAlgorithm,
    command: &str,
    mmap_threshold: u64,
) -> Result<Box<dyn ContentDigester>, DigestError> {
    Ok(match algorithm {
        DigestAlgorithm::Md5 => Box::new(Md5Digester::new(mmap_threshold)),
        DigestAlgorithm::Xxh3 => Box::new(Xxh3Digester::new(mmap_threshold)),
        DigestAlgorithm::Md5sum => Box::new(CommandDigester::new(command)?),
    })
}

/// Checks that `s` starts with a full-width hex digest and returns it lowercased.
pub(crate) fn leading_digest(s: &str) -> Option<String> {
    s.get(..crate::manifest::DIGEST_WIDTH)
        .filter(|d| d.bytes().all(|b| b.is_ascii_hexdigit()))
        .map(str::to_ascii_lowercase)
}
