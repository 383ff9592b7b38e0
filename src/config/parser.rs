use super::Config;
use crate::utils::{DEFAULT_MMAP_THRESHOLD, with_text_file};
use anyhow::{Context, Result};
use std::path::Path;

/// Reads, parses, and validates a TOML config file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid TOML, or holds
/// invalid values.
pub fn parse_config_file(path: &Path) -> Result<Config> {
    with_text_file(path, DEFAULT_MMAP_THRESHOLD, parse_config_str)?
}

/// Parses and validates config text.
///
/// # Errors
///
/// Returns an error if the text is not valid TOML or holds invalid values.
pub fn parse_config_str(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).context("Failed to parse TOML config")?;

    // Validate and return validation errors directly without wrapping
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &Config) -> Result<()> {
    if config.scan.compressed_suffix.is_empty() {
        anyhow::bail!("scan.compressed_suffix must not be empty");
    }

    if config.performance.mmap_threshold == 0 {
        anyhow::bail!("performance.mmap_threshold must be at least 1");
    }

    if config.digest.command.trim().is_empty() {
        anyhow::bail!("digest.command must not be empty");
    }

    Ok(())
}
