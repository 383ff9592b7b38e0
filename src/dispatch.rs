//! Fan-out of candidates across a fixed set of workers.
//!
//! Candidates are split into lanes by residue class: worker `k` of `n`
//! handles indices `k, k + n, k + 2n, ...`. Neighbouring files in traversal
//! order tend to have similar sizes, so striding spreads a directory of large
//! files across all workers instead of handing it to one.
//!
//! Each lane runs to completion on its own pool thread. There is no work
//! stealing between lanes; the sweep ends when the slowest lane does.

use crate::classify::{Classifier, Outcome};
use crate::error::SweepError;
use crate::output::Progress;
use crate::output::sink::ResultSink;
use crate::utils::thread_pool::build_pool;
use rayon::prelude::*;
use std::iter::StepBy;
use std::ops::{Add, Range};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{Level, debug, span, warn};

/// Counts of outcomes over a sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepSummary {
    /// Matched an ignore prefix
    pub ignored: usize,
    /// Known by path or compression variant
    pub known_by_path: usize,
    /// Known by content digest
    pub known_by_digest: usize,
    /// Reported as new
    pub new: usize,
    /// Could not be read; neither reported nor counted as known
    pub skipped: usize,
}

impl SweepSummary {
    /// Counts one outcome.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Ignored => self.ignored += 1,
            Outcome::KnownByPath => self.known_by_path += 1,
            Outcome::KnownByDigest => self.known_by_digest += 1,
            Outcome::New => self.new += 1,
        }
    }

    /// Total candidates visited, skipped ones included.
    #[must_use]
    pub const fn visited(&self) -> usize {
        self.ignored + self.known_by_path + self.known_by_digest + self.new + self.skipped
    }
}

impl Add for SweepSummary {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            ignored: self.ignored + rhs.ignored,
            known_by_path: self.known_by_path + rhs.known_by_path,
            known_by_digest: self.known_by_digest + rhs.known_by_digest,
            new: self.new + rhs.new,
            skipped: self.skipped + rhs.skipped,
        }
    }
}

/// Indices of lane `id` out of `lanes` over `len` candidates.
#[must_use]
pub fn lane(len: usize, lanes: usize, id: usize) -> StepBy<Range<usize>> {
    (id.min(len)..len).step_by(lanes.max(1))
}

/// Runs the classifier over a candidate list with a fixed number of workers.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher {
    workers: usize,
}

impl Dispatcher {
    /// A dispatcher with `workers` lanes. 0 and 1 both run on the calling
    /// thread.
    #[must_use]
    pub const fn new(workers: usize) -> Self {
        Self { workers }
    }

    /// Number of lanes the candidates are split into.
    #[must_use]
    pub const fn lanes(&self) -> usize {
        if self.workers == 0 { 1 } else { self.workers }
    }

    /// Classifies every candidate exactly once, reporting new files to `sink`.
    ///
    /// Files that cannot be read are logged and counted as skipped. A fatal
    /// digest error or a sink failure stops all lanes and is returned.
    ///
    /// # Errors
    ///
    /// Returns the first fatal [`SweepError`] raised by any lane.
    pub fn run<S: ResultSink + ?Sized>(
        &self,
        candidates: &[String],
        classifier: &Classifier<'_>,
        sink: &S,
        progress: Option<&Progress>,
    ) -> Result<SweepSummary, SweepError> {
        let lanes = self.lanes();
        let span = span!(Level::DEBUG, "sweep", candidates = candidates.len(), lanes);
        let _guard = span.enter();

        let abort = AtomicBool::new(false);
        let worker = Lane {
            candidates,
            lanes,
            classifier,
            sink,
            progress,
            abort: &abort,
        };

        let summary = if lanes == 1 {
            worker.run(0)?
        } else {
            let pool = build_pool(lanes)?;
            pool.install(|| {
                (0..lanes)
                    .into_par_iter()
                    .map(|id| worker.run(id))
                    .try_reduce(SweepSummary::default, |a, b| Ok(a + b))
            })?
        };

        debug!(?summary, "Sweep complete");
        Ok(summary)
    }
}

/// Shared state for lane workers.
struct Lane<'r, 'c, S: ?Sized> {
    candidates: &'r [String],
    lanes: usize,
    classifier: &'r Classifier<'c>,
    sink: &'r S,
    progress: Option<&'r Progress>,
    abort: &'r AtomicBool,
}

impl<S: ResultSink + ?Sized> Lane<'_, '_, S> {
    fn run(&self, id: usize) -> Result<SweepSummary, SweepError> {
        let mut summary = SweepSummary::default();

        for idx in lane(self.candidates.len(), self.lanes, id) {
            if self.abort.load(Ordering::Relaxed) {
                break;
            }

            let path = &self.candidates[idx];
            let result = self.classifier.classify(path).map_err(SweepError::from);
            // another lane may have failed while this file was being digested
            if self.abort.load(Ordering::Relaxed) {
                break;
            }
            match result.and_then(|outcome| {
                Classifier::emit(path, outcome, self.sink)?;
                Ok(outcome)
            }) {
                Ok(outcome) => summary.record(outcome),
                Err(e) if e.is_per_file() => {
                    summary.skipped += 1;
                    warn!(path = %path, error = %ErrorChain(&e), "Skipping unreadable file");
                }
                Err(e) => {
                    self.abort.store(true, Ordering::Relaxed);
                    return Err(e);
                }
            }

            if let Some(progress) = self.progress {
                progress.inc();
            }
        }

        Ok(summary)
    }
}

/// Displays an error followed by its sources, `a: b: c`.
struct ErrorChain<'a>(&'a dyn std::error::Error);

impl std::fmt::Display for ErrorChain<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)?;
        let mut source = self.0.source();
        while let Some(err) = source {
            write!(f, ": {err}")?;
            source = err.source();
        }
        Ok(())
    }
}
