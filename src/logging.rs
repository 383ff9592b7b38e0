//! Tracing subscriber setup.
//!
//! Diagnostics go to stderr only; stdout is reserved for reports. `RUST_LOG`
//! overrides the level picked from the verbosity flags.

use crate::output::Verbosity;
use std::sync::OnceLock;
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

static INSTALLED: OnceLock<()> = OnceLock::new();

/// Errors that may occur while initializing logging.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// `RUST_LOG` is set but cannot be parsed.
    #[error("Invalid RUST_LOG directive: {0}")]
    Filter(#[from] tracing_subscriber::filter::FromEnvError),
    /// Failed to set the global tracing subscriber.
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Installs the global subscriber. Subsequent calls are no-ops.
///
/// # Errors
///
/// Returns an error if `RUST_LOG` is malformed or another subscriber is
/// already installed.
pub fn init(verbosity: Verbosity) -> Result<(), LoggingError> {
    if INSTALLED.get().is_some() {
        return Ok(());
    }

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_names(verbosity == Verbosity::Verbose);

    let subscriber = Registry::default()
        .with(build_env_filter(verbosity)?)
        .with(layer);
    tracing::subscriber::set_global_default(subscriber)?;
    let _ = INSTALLED.set(());
    Ok(())
}

fn build_env_filter(verbosity: Verbosity) -> Result<EnvFilter, LoggingError> {
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        return Ok(EnvFilter::try_from_default_env()?);
    }
    Ok(EnvFilter::new(default_directive(verbosity)))
}

const fn default_directive(verbosity: Verbosity) -> &'static str {
    match verbosity {
        Verbosity::Quiet => "error",
        Verbosity::Normal => "warn",
        Verbosity::Verbose => "debug",
    }
}
