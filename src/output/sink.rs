//! Destinations for "new file" reports.
//!
//! Workers never touch the output stream directly. They call
//! [`ResultSink::report`], and the sink serializes whole lines behind a
//! single lock.

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

/// Receives the paths of files classified as new.
///
/// Implementations must accept concurrent calls and must never interleave two
/// reports. Ordering between concurrent reports is unspecified.
pub trait ResultSink: Send + Sync {
    /// Records one new file.
    ///
    /// # Errors
    ///
    /// Returns an error if the report cannot be written.
    fn report(&self, path: &str) -> io::Result<()>;
}

/// Writes one path per line to a shared writer.
pub struct LineSink<W: Write + Send> {
    /// Lock held for the duration of one line
    writer: Mutex<W>,
}

impl LineSink<io::Stdout> {
    /// Sink writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> LineSink<W> {
    /// Wraps `writer`.
    pub const fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> ResultSink for LineSink<W> {
    fn report(&self, path: &str) -> io::Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(writer, "{path}")?;
        writer.flush()
    }
}

/// Collects reports in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports received so far, in arrival order.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Consumes the sink, returning its reports.
    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.lines
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ResultSink for MemorySink {
    fn report(&self, path: &str) -> io::Result<()> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_owned());
        Ok(())
    }
}
