pub mod parser;

use crate::digest::DigestAlgorithm;
use crate::manifest::DEFAULT_COMPRESSED_SUFFIX;
use crate::utils::DEFAULT_MMAP_THRESHOLD;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "UNBURNT_CONFIG_PATH";

/// Config file location relative to the platform config directory.
pub const DEFAULT_CONFIG_PATH: &str = "unburnt/config.toml";

/// Settings read from the optional TOML config file.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub digest: DigestConfig,

    #[serde(default)]
    pub performance: PerformanceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanConfig {
    /// Scan entries whose name starts with `.`
    #[serde(default)]
    pub include_hidden: bool,
    /// Suffix a burn pass appends when it compresses a file
    #[serde(default = "default_compressed_suffix")]
    pub compressed_suffix: String,
    /// Ignore file used when none is given on the command line
    #[serde(default)]
    pub ignore_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DigestConfig {
    #[serde(default)]
    pub algorithm: DigestAlgorithm,
    /// Program run by the `md5sum` algorithm
    #[serde(default = "default_digest_command")]
    pub command: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PerformanceConfig {
    /// Worker count; 0 means one per hardware thread
    #[serde(default)]
    pub parallel_threads: usize,
    #[serde(default = "default_mmap_threshold")]
    pub mmap_threshold: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            include_hidden: false,
            compressed_suffix: default_compressed_suffix(),
            ignore_file: None,
        }
    }
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            algorithm: DigestAlgorithm::default(),
            command: default_digest_command(),
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            parallel_threads: 0,
            mmap_threshold: default_mmap_threshold(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The file contains invalid TOML
    /// - A value fails validation
    pub fn load(path: &Path) -> Result<Self> {
        parser::parse_config_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))
    }

    /// Load the config named on the command line, by the environment, or at
    /// the default location, in that order.
    ///
    /// An explicitly named file must exist. A missing default file yields the
    /// built-in defaults; it is never created.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing or any file is invalid.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::load(Path::new(&path));
        }

        match default_config_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

/// `<config_dir>/unburnt/config.toml`, if the platform has a config directory.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(DEFAULT_CONFIG_PATH))
}

/// Fully resolved inputs for one sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory whose files are classified
    pub root: PathBuf,
    /// Manifest paths or glob patterns
    pub manifests: Vec<String>,
    /// Optional prefix ignore file
    pub ignore_file: Option<PathBuf>,
    /// Number of worker lanes; 0 or 1 is single-threaded
    pub workers: usize,
    /// Scan hidden entries
    pub include_hidden: bool,
    /// Content digest algorithm
    pub algorithm: DigestAlgorithm,
    /// Program used by the `md5sum` algorithm
    pub digest_command: String,
    /// Suffix marking compressed variants
    pub compressed_suffix: String,
    /// Size at which files are memory mapped
    pub mmap_threshold: u64,
}

impl Settings {
    /// Settings for `root` and `manifests`, everything else from `config`.
    #[must_use]
    pub fn from_config(root: PathBuf, manifests: Vec<String>, config: &Config) -> Self {
        let workers = match config.performance.parallel_threads {
            0 => crate::utils::thread_pool::available_workers(),
            n => n,
        };
        Self {
            root,
            manifests,
            ignore_file: config.scan.ignore_file.clone(),
            workers,
            include_hidden: config.scan.include_hidden,
            algorithm: config.digest.algorithm,
            digest_command: config.digest.command.clone(),
            compressed_suffix: config.scan.compressed_suffix.clone(),
            mmap_threshold: config.performance.mmap_threshold,
        }
    }
}

// Default functions for serde
fn default_compressed_suffix() -> String {
    DEFAULT_COMPRESSED_SUFFIX.to_string()
}

fn default_digest_command() -> String {
    "md5sum".to_string()
}

const fn default_mmap_threshold() -> u64 {
    DEFAULT_MMAP_THRESHOLD
}
