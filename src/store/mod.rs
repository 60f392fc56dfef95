// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Hierarchical, deduplicated accumulation of architecture -> library -> executable facts.

mod capacity;
mod snapshot;

pub use capacity::{Capacity, CapacityKind, DroppedFacts};
pub use snapshot::{ArchitectureSnapshot, LibrarySnapshot, Snapshot};

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::architecture::Architecture;

/// Result of recording a single fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    Inserted,
    /// The executable was already recorded for this library.
    Duplicate,
    Dropped(CapacityKind),
    /// Unknown architectures are never aggregated.
    Unsupported,
}

#[derive(Debug)]
struct LibraryBucket {
    name: String,
    executables: Vec<PathBuf>,
    members: HashSet<PathBuf>,
    overflow_reported: bool,
}

#[derive(Debug)]
struct ArchitectureBucket {
    architecture: Architecture,
    libraries: Vec<LibraryBucket>,
    index: HashMap<String, usize>,
    overflow_reported: bool,
}

/// Owns every fact recorded during a scan.
///
/// Buckets keep first-encountered order. Architecture names are unique in the store,
/// library names are unique per architecture and executables are unique per library.
#[derive(Debug, Default)]
pub struct AggregationStore {
    capacity: Capacity,
    architectures: Vec<ArchitectureBucket>,
    total_executables: usize,
    dropped: DroppedFacts,
    overflow_reported: bool,
}

impl AggregationStore {
    #[must_use]
    pub fn new(capacity: Capacity) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Record that `executable` declares a dependency matching `library` under `architecture`.
    ///
    /// Recording the same triple twice is a no-op.
    pub fn record(
        &mut self,
        architecture: Architecture,
        library: &str,
        executable: &Path,
    ) -> RecordOutcome {
        if !architecture.is_supported() {
            return RecordOutcome::Unsupported;
        }
        let outcome = self.insert(architecture, library, executable);
        match outcome {
            RecordOutcome::Inserted => self.total_executables += 1,
            RecordOutcome::Dropped(kind) => self.dropped += kind,
            RecordOutcome::Duplicate | RecordOutcome::Unsupported => {}
        }
        outcome
    }

    fn insert(
        &mut self,
        architecture: Architecture,
        library: &str,
        executable: &Path,
    ) -> RecordOutcome {
        let Some(arch_idx) = self.find_or_add_architecture(architecture) else {
            return RecordOutcome::Dropped(CapacityKind::Architectures);
        };
        let max_libraries = self.capacity.max_libraries;
        let max_executables = self.capacity.max_executables;
        let bucket = &mut self.architectures[arch_idx];

        let Some(lib_idx) = bucket.find_or_add_library(library, max_libraries) else {
            return RecordOutcome::Dropped(CapacityKind::Libraries);
        };
        bucket.libraries[lib_idx].add_executable(executable, max_executables)
    }

    fn find_or_add_architecture(&mut self, architecture: Architecture) -> Option<usize> {
        // A handful of entries at most, linear search is fine.
        if let Some(idx) = self
            .architectures
            .iter()
            .position(|a| a.architecture == architecture)
        {
            return Some(idx);
        }
        if !Capacity::allows(self.capacity.max_architectures, self.architectures.len()) {
            if !self.overflow_reported {
                self.overflow_reported = true;
                tracing::error!(
                    architecture = %architecture,
                    limit = self.architectures.len(),
                    "Too many architectures, dropping further architectures"
                );
            }
            return None;
        }
        self.architectures.push(ArchitectureBucket {
            architecture,
            libraries: Vec::new(),
            index: HashMap::new(),
            overflow_reported: false,
        });
        Some(self.architectures.len() - 1)
    }

    /// Global counter of recorded (library, executable) pairs across all architectures.
    #[must_use]
    pub fn total_executables(&self) -> usize {
        self.total_executables
    }

    #[must_use]
    pub fn architecture_count(&self) -> usize {
        self.architectures.len()
    }

    #[must_use]
    pub fn dropped(&self) -> DroppedFacts {
        self.dropped
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.architectures.is_empty()
    }

    /// Sorted view for the renderers.
    ///
    /// Architectures keep first-encountered order. Libraries are ordered by descending
    /// executable count, ties broken by ascending library name, so the result does not
    /// depend on the order in which libraries were first seen.
    #[must_use]
    pub fn snapshot_sorted(&self) -> Snapshot {
        let architectures = self
            .architectures
            .iter()
            .map(|arch| {
                let mut libraries: Vec<LibrarySnapshot> = arch
                    .libraries
                    .iter()
                    .map(|lib| LibrarySnapshot {
                        name: lib.name.clone(),
                        count: lib.executables.len(),
                        executables: lib.executables.clone(),
                    })
                    .collect();
                libraries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
                ArchitectureSnapshot {
                    name: arch.architecture.name().to_string(),
                    libraries,
                }
            })
            .collect();
        Snapshot {
            total_executables: self.total_executables,
            dropped: self.dropped,
            architectures,
        }
    }
}

impl ArchitectureBucket {
    fn find_or_add_library(&mut self, name: &str, limit: Option<usize>) -> Option<usize> {
        if let Some(idx) = self.index.get(name) {
            return Some(*idx);
        }
        if !Capacity::allows(limit, self.libraries.len()) {
            if !self.overflow_reported {
                self.overflow_reported = true;
                tracing::error!(
                    architecture = %self.architecture,
                    library = name,
                    "Too many libraries for architecture, dropping further libraries"
                );
            }
            return None;
        }
        self.libraries.push(LibraryBucket {
            name: name.to_string(),
            executables: Vec::new(),
            members: HashSet::new(),
            overflow_reported: false,
        });
        let idx = self.libraries.len() - 1;
        self.index.insert(name.to_string(), idx);
        Some(idx)
    }
}

impl LibraryBucket {
    fn add_executable(&mut self, executable: &Path, limit: Option<usize>) -> RecordOutcome {
        if self.members.contains(executable) {
            return RecordOutcome::Duplicate;
        }
        if !Capacity::allows(limit, self.executables.len()) {
            if !self.overflow_reported {
                self.overflow_reported = true;
                tracing::error!(
                    library = %self.name,
                    executable = %executable.display(),
                    "Too many executables for library, dropping further executables"
                );
            }
            return RecordOutcome::Dropped(CapacityKind::Executables);
        }
        self.members.insert(executable.to_path_buf());
        self.executables.push(executable.to_path_buf());
        RecordOutcome::Inserted
    }
}
