//! Per-file classification.
//!
//! Each candidate goes through three checks, cheapest first, and stops at the
//! first that matches:
//!
//! 1. an ignore rule is a prefix of its path: [`Outcome::Ignored`]
//! 2. its path or a compression variant is in the manifest: [`Outcome::KnownByPath`]
//! 3. its content digest is in the manifest: [`Outcome::KnownByDigest`]
//!
//! Anything else is [`Outcome::New`] and gets reported. Only the last check
//! reads file contents.

use crate::digest::{ContentDigester, DigestError};
use crate::error::SweepError;
use crate::ignore::IgnoreSet;
use crate::manifest::{KnownDigests, KnownPaths};
use crate::output::sink::ResultSink;
use std::path::Path;
use tracing::debug;

/// Classification of one candidate file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Matched an ignore prefix.
    Ignored,
    /// Path or a compression variant is in the manifest.
    KnownByPath,
    /// Content digest is in the manifest.
    KnownByDigest,
    /// Not accounted for; reported.
    New,
}

/// Read-only view over everything needed to classify candidates.
///
/// Holds only shared references, so one classifier is used by all workers.
#[derive(Clone, Copy)]
pub struct Classifier<'a> {
    digests: &'a KnownDigests,
    paths: &'a KnownPaths,
    ignore: &'a IgnoreSet,
    root: &'a Path,
    digester: &'a dyn ContentDigester,
}

impl<'a> Classifier<'a> {
    /// Creates a classifier resolving candidate paths against `root`.
    #[must_use]
    pub fn new(
        digests: &'a KnownDigests,
        paths: &'a KnownPaths,
        ignore: &'a IgnoreSet,
        root: &'a Path,
        digester: &'a dyn ContentDigester,
    ) -> Self {
        Self {
            digests,
            paths,
            ignore,
            root,
            digester,
        }
    }

    /// Classifies `path` without reporting it.
    ///
    /// # Errors
    ///
    /// Returns the digester's error when the path-level checks are
    /// inconclusive and the file cannot be digested.
    pub fn classify(&self, path: &str) -> Result<Outcome, DigestError> {
        if self.ignore.is_ignored(path) {
            return Ok(Outcome::Ignored);
        }

        if self.paths.contains(path) {
            return Ok(Outcome::KnownByPath);
        }

        let digest = self.digester.digest(&self.root.join(path))?;
        if self.digests.contains(&digest) {
            Ok(Outcome::KnownByDigest)
        } else {
            Ok(Outcome::New)
        }
    }

    /// Classifies `path` and reports it to `sink` when it is new.
    ///
    /// # Errors
    ///
    /// Returns an error if digesting fails or the sink rejects the report.
    pub fn process<S: ResultSink + ?Sized>(
        &self,
        path: &str,
        sink: &S,
    ) -> Result<Outcome, SweepError> {
        let outcome = self.classify(path)?;
        Self::emit(path, outcome, sink)?;
        Ok(outcome)
    }

    /// Reports a classified `path` to `sink` if it is new, logging the rest.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::Sink`] if the sink rejects the report.
    pub fn emit<S: ResultSink + ?Sized>(
        path: &str,
        outcome: Outcome,
        sink: &S,
    ) -> Result<(), SweepError> {
        match outcome {
            Outcome::New => sink.report(path).map_err(SweepError::Sink)?,
            Outcome::Ignored => debug!(path, "Ignored"),
            Outcome::KnownByPath => debug!(path, "Burnt"),
            Outcome::KnownByDigest => debug!(path, "Burnt by digest"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{ManifestRecord, decompose};
    use crate::output::sink::MemorySink;
    use crate::test_utils::fixtures::{FakeDigester, FailingDigester};
    use std::path::PathBuf;

    struct Setup {
        digests: KnownDigests,
        paths: KnownPaths,
        ignore: IgnoreSet,
        root: PathBuf,
    }

    fn setup(records: &[ManifestRecord], ignore: &[&str]) -> Setup {
        let (digests, paths) = decompose(records, ".xz");
        Setup {
            digests,
            paths,
            ignore: ignore.iter().map(|s| (*s).to_owned()).collect(),
            root: PathBuf::from("/burn"),
        }
    }

    impl Setup {
        fn classifier<'a>(&'a self, digester: &'a dyn ContentDigester) -> Classifier<'a> {
            Classifier::new(&self.digests, &self.paths, &self.ignore, &self.root, digester)
        }
    }

    #[test]
    fn test_known_path_skips_digesting() {
        let s = setup(&[ManifestRecord::new("a".repeat(32), "x/f1.bin")], &[]);
        let digester = FakeDigester::new(&[]);
        let classifier = s.classifier(&digester);

        assert_eq!(classifier.classify("x/f1.bin").unwrap(), Outcome::KnownByPath);
        assert_eq!(classifier.classify("x/f1.bin.xz").unwrap(), Outcome::KnownByPath);
        assert_eq!(digester.calls(), 0);
    }

    #[test]
    fn test_renamed_copy_known_by_digest() {
        let s = setup(&[ManifestRecord::new("a".repeat(32), "old/name.bin")], &[]);
        let digester = FakeDigester::new(&[("/burn/new/name.bin", "a".repeat(32))]);
        let classifier = s.classifier(&digester);

        assert_eq!(
            classifier.classify("new/name.bin").unwrap(),
            Outcome::KnownByDigest
        );
        assert_eq!(digester.calls(), 1);
    }

    #[test]
    fn test_novel_file_is_new() {
        let s = setup(&[ManifestRecord::new("a".repeat(32), "x/f1.bin")], &[]);
        let digester = FakeDigester::new(&[("/burn/x/f2.bin", "b".repeat(32))]);
        let classifier = s.classifier(&digester);

        assert_eq!(classifier.classify("x/f2.bin").unwrap(), Outcome::New);
    }

    #[test]
    fn test_ignore_wins_over_everything() {
        let s = setup(&[ManifestRecord::new("a".repeat(32), "y/known.txt")], &["y/"]);
        let digester = FakeDigester::new(&[("/burn/y/secret.txt", "c".repeat(32))]);
        let classifier = s.classifier(&digester);

        assert_eq!(classifier.classify("y/secret.txt").unwrap(), Outcome::Ignored);
        assert_eq!(classifier.classify("y/known.txt").unwrap(), Outcome::Ignored);
        assert_eq!(digester.calls(), 0);
    }

    #[test]
    fn test_process_reports_only_new() {
        let s = setup(&[ManifestRecord::new("a".repeat(32), "x/f1.bin")], &["skip/"]);
        let digester = FakeDigester::new(&[
            ("/burn/x/f2.bin", "b".repeat(32)),
            ("/burn/x/copy.bin", "a".repeat(32)),
        ]);
        let classifier = s.classifier(&digester);
        let sink = MemorySink::new();

        for path in ["x/f1.bin", "x/f2.bin", "x/copy.bin", "skip/me"] {
            classifier.process(path, &sink).unwrap();
        }
        assert_eq!(sink.lines(), vec!["x/f2.bin"]);
    }

    #[test]
    fn test_digest_failure_is_not_classified() {
        let s = setup(&[], &[]);
        let digester = FailingDigester::per_file();
        let classifier = s.classifier(&digester);
        let sink = MemorySink::new();

        let err = classifier.process("gone.bin", &sink).unwrap_err();
        assert!(err.is_per_file());
        assert!(sink.lines().is_empty());
    }
}
