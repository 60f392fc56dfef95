// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! bldd (backward ldd): find the executables that dynamically link against given shared libraries.
//!
//! This crate provides functionality to:
//! - Walk a directory tree and probe regular files for ELF architecture and `DT_NEEDED` entries
//! - Match declared dependencies against requested library names
//! - Aggregate matches per architecture and library, deduplicated and ranked
//! - Render text, PDF and JSON reports from a deterministic snapshot

pub mod architecture;
pub mod report;
pub mod scan;
pub mod store;

// Re-export key types for convenience
pub use architecture::Architecture;
pub use report::{OutputRequest, ReportFormat};
pub use scan::{DependencyMatcher, ElfProbe, LibraryPattern, Probe, ScanTotals, Scanner};
pub use store::{AggregationStore, Capacity, Snapshot};
