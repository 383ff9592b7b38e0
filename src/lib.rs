#![warn(missing_docs)]
// Allow pedantic strict lints that create false positives in this codebase
#![allow(clippy::arithmetic_side_effects)] // Outcome counters cannot overflow
#![allow(clippy::indexing_slicing)] // Lane indices are bounded by the candidate count

//! # unburnt - find files not yet accounted for by burn manifests
//!
//! A burn pass writes `md5sum` manifests of what it processed. `unburnt`
//! scans a folder and reports every file those manifests do not cover,
//! comparing paths first and content digests second.
//!
//! ## Features
//!
//! - **Path variants**: `a.txt` and `a.txt.xz` count as the same file
//! - **Content matching**: renamed or moved copies are recognised by digest
//! - **Prefix ignores**: whole subtrees can be excluded by path prefix
//! - **Parallel sweep**: candidates are striped across a fixed worker pool
//!
//! ## Architecture
//!
//! - [`manifest`]: Manifest parsing and decomposition into lookup sets
//! - [`ignore`]: Prefix ignore rules
//! - [`digest`]: Pluggable content digesters
//! - [`scanner`]: Candidate discovery
//! - [`classify`]: Per-file classification
//! - [`dispatch`]: Striped parallel fan-out
//! - [`output`]: Result sink and stderr diagnostics
//! - [`config`]: TOML configuration and resolved settings
//!
//! ## Example Usage
//!
//! ```no_run
//! use unburnt::SweepContext;
//! use unburnt::config::{Config, Settings};
//! use unburnt::output::sink::MemorySink;
//!
//! # fn main() -> anyhow::Result<()> {
//! let settings = Settings::from_config(
//!     "/srv/archive".into(),
//!     vec!["/srv/burns/*.md5".to_string()],
//!     &Config::default(),
//! );
//! let context = SweepContext::prepare(settings)?;
//!
//! let sink = MemorySink::new();
//! let summary = context.execute(&sink)?;
//! println!("{} new files", summary.new);
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions (argument parsing structures).
pub mod cli;

/// Per-file classification engine.
pub mod classify;

/// Configuration parsing, validation, and resolved settings.
pub mod config;

/// Content digest algorithms.
pub mod digest;

/// Striped parallel dispatch of candidates.
pub mod dispatch;

/// Errors that abort a sweep.
pub mod error;

/// Prefix-based ignore rules.
pub mod ignore;

/// Tracing subscriber setup.
pub mod logging;

/// Burn manifest parsing and lookup sets.
pub mod manifest;

/// Result sink, progress, and stderr diagnostics.
pub mod output;

/// Filesystem scanning.
pub mod scanner;

/// Utility functions and helpers.
pub mod utils;


pub use classify::{Classifier, Outcome};
pub use dispatch::{Dispatcher, SweepSummary};
pub use error::SweepError;

use anyhow::{Context, Result};
use config::Settings;
use digest::ContentDigester;
use ignore::IgnoreSet;
use manifest::{KnownDigests, KnownPaths};
use output::Progress;
use output::sink::ResultSink;
use std::path::PathBuf;
use tracing::{Level, span};

/// Current version of the unburnt binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything a sweep reads, built once before classification starts.
///
/// All lookup structures are immutable from here on and shared by every
/// worker without locking.
pub struct SweepContext {
    /// Settings the context was built from.
    pub settings: Settings,

    /// Canonical scan root.
    pub root: PathBuf,

    /// Digests recorded by the manifests.
    pub known_digests: KnownDigests,

    /// Paths and compression variants recorded by the manifests.
    pub known_paths: KnownPaths,

    /// Prefix ignore rules.
    pub ignore: IgnoreSet,

    /// Files found under the root, in traversal order.
    pub candidates: Vec<String>,

    /// Number of manifest records loaded.
    pub manifest_records: usize,

    /// Content digester shared by all workers.
    digester: Box<dyn ContentDigester>,
}

impl SweepContext {
    /// Loads manifests, scans the root, and loads ignore rules.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The root is missing or not a directory
    /// - A manifest is missing or unreadable
    /// - The ignore file is given but unreadable
    /// - The digest tool is unavailable
    pub fn prepare(settings: Settings) -> Result<Self> {
        let digester = digest::digester_for(
            settings.algorithm,
            &settings.digest_command,
            settings.mmap_threshold,
        )?;
        Self::with_digester(settings, digester)
    }

    /// Same as [`SweepContext::prepare`] with a caller-supplied digester.
    ///
    /// # Errors
    ///
    /// Returns an error under the same conditions as [`SweepContext::prepare`].
    pub fn with_digester(settings: Settings, digester: Box<dyn ContentDigester>) -> Result<Self> {
        let span = span!(Level::DEBUG, "prepare", root = %settings.root.display());
        let _guard = span.enter();

        if !settings.root.is_dir() {
            anyhow::bail!(
                "Folder does not exist or is not a directory: {}",
                settings.root.display()
            );
        }
        let root = settings
            .root
            .canonicalize()
            .with_context(|| format!("Failed to resolve folder: {}", settings.root.display()))?;

        let parsed = manifest::load_manifests(&settings.manifests, settings.mmap_threshold)?;
        let (known_digests, known_paths) =
            manifest::decompose(&parsed.records, &settings.compressed_suffix);
        output::info(&format!("Loaded {} md5s", parsed.records.len()));
        if parsed.malformed > 0 {
            output::warning(&format!(
                "Skipped {} malformed manifest line(s)",
                parsed.malformed
            ));
        }

        let candidates = scanner::scan(&root, settings.include_hidden)?;
        output::info(&format!("Found {} files", candidates.len()));

        let ignore = match &settings.ignore_file {
            Some(path) => IgnoreSet::load(path, settings.mmap_threshold)?,
            None => IgnoreSet::new(),
        };
        output::info(&format!("Loaded {} ignore rules", ignore.len()));

        Ok(Self {
            settings,
            root,
            known_digests,
            known_paths,
            ignore,
            candidates,
            manifest_records: parsed.records.len(),
            digester,
        })
    }

    /// Classifier borrowing this context's lookup structures.
    #[must_use]
    pub fn classifier(&self) -> Classifier<'_> {
        Classifier::new(
            &self.known_digests,
            &self.known_paths,
            &self.ignore,
            &self.root,
            self.digester.as_ref(),
        )
    }

    /// Classifies every candidate, reporting new files to `sink`.
    ///
    /// # Errors
    ///
    /// Returns an error if the digest mechanism fails or the sink cannot be
    /// written. No further reports are made once this happens.
    pub fn execute<S: ResultSink + ?Sized>(&self, sink: &S) -> Result<SweepSummary> {
        output::info("Processing files");

        let progress = Progress::new("Classifying files", self.candidates.len());
        let summary = Dispatcher::new(self.settings.workers)
            .run(&self.candidates, &self.classifier(), sink, Some(&progress))
            .context("Sweep aborted")?;
        progress.finish();

        Ok(summary)
    }
}

/// Prepares and executes a sweep, printing new files to stdout.
///
/// # Errors
///
/// Returns an error if preparation or the sweep fails.
pub fn run(settings: Settings) -> Result<SweepSummary> {
    let context = SweepContext::prepare(settings)?;
    context.execute(&output::sink::LineSink::stdout())
}
