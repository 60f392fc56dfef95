// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Walks a directory tree, probes every regular file and feeds matching dependencies into the store.

mod elf;
mod matcher;
mod totals;
mod walker;

pub use elf::{is_executable, Elf, ElfError, ElfProbe, ElfType, Probe, ProbeResult};
pub use matcher::{DependencyMatcher, LibraryPattern, MatcherError};
pub use totals::{ElfTotals, ScanTotals};
pub use walker::{DirectoryWalker, WalkErrors};

use rayon::prelude::*;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::architecture::Architecture;
use crate::store::AggregationStore;

/// Files probed in parallel before their results are recorded.
pub const DEFAULT_BATCH_SIZE: usize = 256;

/// Progress is logged every time this many executables have been probed.
const PROGRESS_INTERVAL: usize = 100;

/// Errors that prevent a scan from starting. Per-file problems never surface here.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Cannot open directory {path:?}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to build worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// One matched dependency of one file.
#[derive(Debug)]
struct Fact<'a> {
    architecture: Architecture,
    library: &'a LibraryPattern,
}

/// Everything learned about a single file.
#[derive(Debug, Default)]
struct FileReport<'a> {
    totals: ScanTotals,
    facts: Vec<Fact<'a>>,
}

/// Drives a scan: directory walk, probing, matching and recording.
///
/// Probing runs in parallel per batch, recording happens sequentially in walk order,
/// so the resulting store does not depend on worker timing.
pub struct Scanner<P = ElfProbe> {
    probe: P,
    matcher: DependencyMatcher,
    jobs: Option<usize>,
    batch_size: usize,
}

impl Scanner<ElfProbe> {
    #[must_use]
    pub fn new(matcher: DependencyMatcher) -> Self {
        Self::with_probe(ElfProbe, matcher)
    }
}

impl<P: Probe> Scanner<P> {
    #[must_use]
    pub fn with_probe(probe: P, matcher: DependencyMatcher) -> Self {
        Self {
            probe,
            matcher,
            jobs: None,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Number of worker threads. `None` uses one per CPU.
    #[must_use]
    pub fn jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    #[must_use]
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    #[must_use]
    pub fn matcher(&self) -> &DependencyMatcher {
        &self.matcher
    }

    /// Scan `root` recursively and record every match into `store`.
    ///
    /// # Errors
    /// Returns an error only if the root cannot be opened or the worker pool cannot be built.
    pub fn scan(&self, root: &Path, store: &mut AggregationStore) -> Result<ScanTotals, ScanError> {
        let walker = DirectoryWalker::new(root)?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs.unwrap_or(0))
            .build()?;

        let libraries: Vec<&str> = self
            .matcher
            .patterns()
            .iter()
            .map(LibraryPattern::token)
            .collect();
        tracing::info!(root = %walker.root().display(), ?libraries, "Scanning directory");

        let mut totals = ScanTotals::default();
        let mut walk_errors = WalkErrors::default();
        {
            let mut files = walker.files(&mut walk_errors);
            loop {
                let batch: Vec<PathBuf> = files.by_ref().take(self.batch_size).collect();
                if batch.is_empty() {
                    break;
                }
                let reports: Vec<FileReport<'_>> =
                    pool.install(|| batch.par_iter().map(|path| self.inspect(path)).collect());
                for (path, report) in batch.iter().zip(reports) {
                    Self::apply(path, report, store, &mut totals);
                }
            }
        }
        totals.walk_errors = walk_errors.directories + walk_errors.entries;

        tracing::info!(
            files = totals.files,
            executables = totals.elfs.total,
            matched = totals.matched,
            recorded = store.total_executables(),
            "Scan completed"
        );
        Ok(totals)
    }

    /// Probe and match a single file. Pure with respect to the store.
    fn inspect(&self, path: &Path) -> FileReport<'_> {
        let mut report = FileReport {
            totals: ScanTotals {
                files: 1,
                ..ScanTotals::default()
            },
            facts: Vec::new(),
        };
        let elf = match self.probe.probe(path) {
            Ok(Some(elf)) => elf,
            Ok(None) => return report,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to probe file");
                report.totals.probe_errors = 1;
                return report;
            }
        };
        report.totals.elfs = ElfTotals::of(elf.kind());

        let architecture = elf.architecture();
        if !architecture.is_supported() {
            tracing::debug!(path = %path.display(), ?architecture, "Unsupported architecture, skipping");
            report.totals.unsupported = 1;
            return report;
        }

        report.facts = self
            .matcher
            .match_all(elf.dependencies())
            .map(|(dependency, library)| {
                tracing::trace!(path = %path.display(), dependency, library = library.as_str(), "Match");
                Fact {
                    architecture,
                    library,
                }
            })
            .collect();
        if !report.facts.is_empty() {
            report.totals.matched = 1;
        }
        report
    }

    fn apply(
        path: &Path,
        report: FileReport<'_>,
        store: &mut AggregationStore,
        totals: &mut ScanTotals,
    ) {
        for fact in &report.facts {
            store.record(fact.architecture, fact.library.as_str(), path);
        }
        let probed_before = totals.elfs.total;
        *totals = *totals + report.totals;
        if totals.elfs.total > probed_before && totals.elfs.total % PROGRESS_INTERVAL == 0 {
            tracing::info!(
                "Scanned {} executables so far, found {} matches",
                totals.elfs.total,
                totals.matched
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    /// Probe answering from a table keyed by file name.
    struct TableProbe(HashMap<String, (Architecture, Vec<String>)>);

    impl Probe for TableProbe {
        fn probe(&self, path: &Path) -> ProbeResult<Option<Elf>> {
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            if name == "corrupt" {
                return Err(ElfError::Io {
                    path: path.to_path_buf(),
                    source: io::Error::other("short read"),
                });
            }
            Ok(self
                .0
                .get(name)
                .map(|(arch, deps)| Elf::new(ElfType::Executable, *arch, deps.clone())))
        }
    }

    fn tree(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in names {
            fs::write(dir.path().join(name), name).unwrap();
        }
        dir
    }

    fn scanner(entries: Vec<(&str, Architecture, Vec<&str>)>, libs: &[&str]) -> Scanner<TableProbe> {
        let table = entries
            .into_iter()
            .map(|(name, arch, deps)| {
                let deps = deps.into_iter().map(str::to_string).collect();
                (name.to_string(), (arch, deps))
            })
            .collect();
        Scanner::with_probe(TableProbe(table), DependencyMatcher::new(libs).unwrap())
    }

    #[test]
    fn test_scan_records_matches() {
        let dir = tree(&["a", "b", "c", "notes"]);
        let scanner = scanner(
            vec![
                ("a", Architecture::X86_64, vec!["libm.so.6", "libpthread.so.0"]),
                ("b", Architecture::X86_64, vec!["libm.so.6"]),
                ("c", Architecture::X86_64, vec!["libc.so.6"]),
            ],
            &["m", "pthread"],
        );
        let mut store = AggregationStore::default();
        let totals = scanner.scan(dir.path(), &mut store).unwrap();

        assert_eq!(totals.files, 4);
        assert_eq!(totals.elfs.total, 3);
        assert_eq!(totals.matched, 2);
        assert_eq!(store.total_executables(), 3);

        let snapshot = store.snapshot_sorted();
        let libm = snapshot.library("x86_64", "libm.so").unwrap();
        assert_eq!(libm.executables, vec![dir.path().join("a"), dir.path().join("b")]);
        assert_eq!(
            snapshot.library("x86_64", "libpthread.so").unwrap().executables,
            vec![dir.path().join("a")]
        );
    }

    #[test]
    fn test_scan_excludes_unknown_architecture() {
        let dir = tree(&["riscv"]);
        let scanner = scanner(
            vec![("riscv", Architecture::Unknown(243), vec!["libm.so.6"])],
            &["m"],
        );
        let mut store = AggregationStore::default();
        let totals = scanner.scan(dir.path(), &mut store).unwrap();
        assert_eq!(totals.unsupported, 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_scan_continues_after_probe_error() {
        let dir = tree(&["corrupt", "good"]);
        let scanner = scanner(vec![("good", Architecture::Aarch64, vec!["libssl.so.3"])], &["ssl"]);
        let mut store = AggregationStore::default();
        let totals = scanner.scan(dir.path(), &mut store).unwrap();
        assert_eq!(totals.probe_errors, 1);
        assert!(store.snapshot_sorted().library("aarch64", "libssl.so").is_some());
    }

    #[test]
    fn test_repeated_dependency_is_recorded_once() {
        let dir = tree(&["a"]);
        let scanner = scanner(
            vec![("a", Architecture::X86_64, vec!["libssl.so.1.1", "libssl.so.3"])],
            &["ssl"],
        );
        let mut store = AggregationStore::default();
        scanner.scan(dir.path(), &mut store).unwrap();
        assert_eq!(store.total_executables(), 1);
    }

    #[test]
    fn test_scan_is_independent_of_parallelism() {
        let names: Vec<String> = (0..40).map(|i| format!("bin{i:02}")).collect();
        let dir = TempDir::new().unwrap();
        for name in &names {
            fs::write(dir.path().join(name), name).unwrap();
        }
        let entries = || {
            names
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    let arch = if i % 3 == 0 {
                        Architecture::Armv7
                    } else {
                        Architecture::X86_64
                    };
                    let deps = if i % 2 == 0 {
                        vec!["libm.so.6", "libz.so.1"]
                    } else {
                        vec!["libz.so.1"]
                    };
                    (name.as_str(), arch, deps)
                })
                .collect::<Vec<_>>()
        };

        let mut sequential = AggregationStore::default();
        scanner(entries(), &["z", "m"])
            .jobs(Some(1))
            .batch_size(1)
            .scan(dir.path(), &mut sequential)
            .unwrap();
        let mut parallel = AggregationStore::default();
        scanner(entries(), &["z", "m"])
            .jobs(Some(4))
            .batch_size(7)
            .scan(dir.path(), &mut parallel)
            .unwrap();

        assert_eq!(sequential.snapshot_sorted(), parallel.snapshot_sorted());
    }

    #[test]
    fn test_scan_rejects_missing_root() {
        let dir = TempDir::new().unwrap();
        let scanner = scanner(Vec::new(), &["m"]);
        let mut store = AggregationStore::default();
        let result = scanner.scan(&dir.path().join("missing"), &mut store);
        assert!(matches!(result, Err(ScanError::RootUnreadable { .. })));
    }
}
