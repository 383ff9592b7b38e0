//! Progress display shared by all sweep workers.

use colored::Colorize;
use std::io::{self, IsTerminal, Write};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};

use super::{Verbosity, get_verbosity};

/// A progress line that updates in place on TTY terminals.
///
/// Workers call [`Progress::inc`] concurrently. The line is redrawn only when
/// the percentage changes, e.g. "Classifying files: 42% (420/1000)".
pub struct Progress {
    /// Title displayed before the counts
    title: String,
    /// Total number of items to process
    total: usize,
    /// Items processed so far
    current: AtomicUsize,
    /// Whether the line is drawn at all
    visible: bool,
    /// Last displayed percentage (to avoid redundant redraws)
    last_percent: AtomicU8,
    /// Serializes redraws
    draw: Mutex<()>,
    /// Set once the final line has been printed
    finished: AtomicBool,
}

impl Progress {
    /// Creates a progress line for `total` items.
    ///
    /// Drawn only when stderr is a TTY and verbosity is not quiet.
    #[must_use]
    pub fn new(title: &str, total: usize) -> Self {
        let visible =
            io::stderr().is_terminal() && get_verbosity() != Verbosity::Quiet && total > 0;

        let progress = Self {
            title: title.to_string(),
            total,
            current: AtomicUsize::new(0),
            visible,
            last_percent: AtomicU8::new(0),
            draw: Mutex::new(()),
            finished: AtomicBool::new(false),
        };
        progress.display(0);
        progress
    }

    /// Marks one more item as processed.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn inc(&self) {
        let current = (self.current.fetch_add(1, Ordering::Relaxed) + 1).min(self.total);
        if self.total == 0 {
            return;
        }

        let percent = ((current as f64 / self.total as f64) * 100.0) as u8;
        if self.last_percent.swap(percent, Ordering::Relaxed) != percent {
            self.display(current);
        }
    }

    /// Items processed so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.current.load(Ordering::Relaxed).min(self.total)
    }

    /// Prints the final line with a "done" suffix.
    pub fn finish(&self) {
        if self.finished.swap(true, Ordering::Relaxed) || !self.visible {
            return;
        }
        let _lock = self.draw.lock();
        eprintln!(
            "\r{}: 100% ({}/{}), done.",
            self.title.dimmed(),
            self.total,
            self.total
        );
    }

    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn display(&self, current: usize) {
        if !self.visible || self.finished.load(Ordering::Relaxed) {
            return;
        }

        let _lock = self.draw.lock();
        let percent = (current as f64 / self.total as f64) * 100.0;
        eprint!(
            "\r{}: {}% ({}/{})",
            self.title.dimmed(),
            (percent as u8).to_string().dimmed(),
            current,
            self.total
        );
        let _ = io::stderr().flush();
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        if self.visible && !self.finished.load(Ordering::Relaxed) {
            eprintln!();
        }
    }
}
