//! Command-line interface definitions for unburnt.
//!
//! Shared between the main binary and xtask (man page generation).
//!
//! Note: Field-level documentation is provided via clap attributes, so we
//! allow missing_docs for this module to avoid redundant documentation.

#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use crate::config::{Config, Settings};
use crate::digest::DigestAlgorithm;
use crate::output::Verbosity;
use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Main CLI structure for unburnt.
#[derive(Parser, Debug)]
#[command(
    name = "unburnt",
    version = crate::VERSION,
    about = "List files not yet accounted for by burn manifests",
    long_about = "Scans a folder and prints every file that is neither listed in the given \
                  md5 manifests (by path, compressed variant, or content) nor ignored."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Folder containing the files to scan
    #[arg(short = 'f', long = "folder", value_name = "DIR")]
    pub folder: Option<PathBuf>,

    /// Manifest file or glob pattern (repeatable)
    #[arg(short = 'm', long = "md5", value_name = "PATTERN")]
    pub manifests: Vec<String>,

    /// File listing path prefixes to ignore, one per line
    #[arg(short = 'i', long = "ignore", value_name = "FILE")]
    pub ignore: Option<PathBuf>,

    /// Number of worker threads (0 or 1 runs single-threaded)
    #[arg(short = 't', long = "threads", env = "UNBURNT_THREADS", value_name = "N")]
    pub threads: Option<usize>,

    /// Scan hidden files and directories
    #[arg(short = 'H', long = "hidden")]
    pub hidden: bool,

    /// Content digest algorithm
    #[arg(long, value_enum, value_name = "ALGO")]
    pub algorithm: Option<DigestAlgorithm>,

    /// Suffix of compressed files recorded by the burn pass
    #[arg(long, value_name = "SUFFIX")]
    pub suffix: Option<String>,

    /// Config file (default: <config dir>/unburnt/config.toml)
    #[arg(long, value_name = "FILE", env = crate::config::CONFIG_ENV)]
    pub config: Option<PathBuf>,

    /// Show debug diagnostics
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Auxiliary commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Verbosity selected by `--quiet`/`--verbose`.
    #[must_use]
    pub const fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }

    /// Merges the flags over `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if no folder or manifest is given, or the suffix is empty.
    pub fn settings(&self, config: &Config) -> Result<Settings> {
        let root = self
            .folder
            .clone()
            .ok_or_else(|| anyhow::anyhow!("No folder given (use -f/--folder)"))?;
        if self.manifests.is_empty() {
            anyhow::bail!("No manifest given (use -m/--md5)");
        }

        let mut settings = Settings::from_config(root, self.manifests.clone(), config);
        if let Some(ignore) = &self.ignore {
            settings.ignore_file = Some(ignore.clone());
        }
        if let Some(threads) = self.threads {
            settings.workers = threads;
        }
        if self.hidden {
            settings.include_hidden = true;
        }
        if let Some(algorithm) = self.algorithm {
            settings.algorithm = algorithm;
        }
        if let Some(suffix) = &self.suffix {
            if suffix.is_empty() {
                anyhow::bail!("--suffix must not be empty");
            }
            settings.compressed_suffix.clone_from(suffix);
        }
        Ok(settings)
    }
}
