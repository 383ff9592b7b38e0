//! Diagnostics on stderr.
//!
//! Standard output carries nothing but new-file reports (see [`sink`]).
//! Everything meant for a human goes to stderr through these helpers, which
//! honour the global verbosity.

mod progress;
/// Serialized destinations for new-file reports
pub mod sink;

use crate::dispatch::SweepSummary;
use colored::Colorize;
use std::sync::atomic::{AtomicU8, Ordering};

pub use progress::Progress;

/// Verbosity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Only warnings and errors.
    Quiet = 0,
    /// Startup counts and the final summary.
    #[default]
    Normal = 1,
    /// Also per-file debug logging.
    Verbose = 2,
}

impl Verbosity {
    /// Verbosity from the `--quiet`/`--verbose` flags.
    #[must_use]
    pub const fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }
}

static VERBOSITY: AtomicU8 = AtomicU8::new(1);

/// Sets the global verbosity level.
pub fn set_verbosity(level: Verbosity) {
    VERBOSITY.store(level as u8, Ordering::Relaxed);
}

/// Gets the global verbosity level.
pub fn get_verbosity() -> Verbosity {
    match VERBOSITY.load(Ordering::Relaxed) {
        0 => Verbosity::Quiet,
        2 => Verbosity::Verbose,
        _ => Verbosity::Normal,
    }
}

/// Prints an error message in bold red (always shown).
pub fn error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}

/// Prints a warning message in bold yellow (always shown).
pub fn warning(message: &str) {
    eprintln!("{}", message.yellow().bold());
}

/// Prints an informational message in dimmed color (respects quiet mode).
pub fn info(message: &str) {
    if get_verbosity() == Verbosity::Quiet {
        return;
    }
    eprintln!("{}", message.dimmed());
}

/// Prints the end-of-run counts.
///
/// The skipped-file warning is always shown; the counts line respects quiet
/// mode.
pub fn summary(summary: &SweepSummary) {
    if summary.skipped > 0 {
        warning(&format!(
            "{} file(s) could not be read and were skipped",
            summary.skipped
        ));
    }
    if get_verbosity() == Verbosity::Quiet {
        return;
    }
    eprintln!("{} {}", "Done:".dimmed().bold(), summary_line(summary));
}

fn summary_line(summary: &SweepSummary) -> String {
    format!(
        "{} candidates, {} new, {} burnt by path, {} burnt by digest, {} ignored, {} skipped",
        summary.visited(),
        summary.new,
        summary.known_by_path,
        summary.known_by_digest,
        summary.ignored,
        summary.skipped,
    )
}
