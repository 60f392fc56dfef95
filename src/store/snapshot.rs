// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Sorted, read-only view of the aggregation store consumed by the report renderers.

use serde::Serialize;
use std::path::PathBuf;

use super::DroppedFacts;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub total_executables: usize,
    pub dropped: DroppedFacts,
    pub architectures: Vec<ArchitectureSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchitectureSnapshot {
    pub name: String,
    /// Ordered by descending executable count, then by library name.
    pub libraries: Vec<LibrarySnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibrarySnapshot {
    pub name: String,
    pub count: usize,
    /// In the order the executables were recorded.
    pub executables: Vec<PathBuf>,
}

impl Snapshot {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.architectures.is_empty()
    }

    /// Look up a library bucket by architecture and pattern.
    #[must_use]
    pub fn library(&self, architecture: &str, library: &str) -> Option<&LibrarySnapshot> {
        self.architectures
            .iter()
            .find(|a| a.name == architecture)
            .and_then(|a| a.libraries.iter().find(|l| l.name == library))
    }
}
