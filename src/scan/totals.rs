// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Statistics collected while scanning.

use serde::Serialize;
use std::ops::Add;

use super::elf::ElfType;

/// Probed ELF objects by `e_type`.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ElfTotals {
    pub none: usize,
    pub binaries: usize,
    pub shared_libraries: usize,
    pub relocatable: usize,
    pub core: usize,
    /// OS- or processor-specific object types.
    pub other: usize,
    pub total: usize,
}

impl ElfTotals {
    pub(crate) fn of(kind: ElfType) -> Self {
        let mut totals = Self {
            total: 1,
            ..Self::default()
        };
        let slot = match kind {
            ElfType::None => &mut totals.none,
            ElfType::Executable => &mut totals.binaries,
            ElfType::SharedObject => &mut totals.shared_libraries,
            ElfType::Relocatable => &mut totals.relocatable,
            ElfType::Core => &mut totals.core,
            ElfType::Other(_) => &mut totals.other,
        };
        *slot = 1;
        totals
    }
}

impl Add for ElfTotals {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            none: self.none + rhs.none,
            binaries: self.binaries + rhs.binaries,
            shared_libraries: self.shared_libraries + rhs.shared_libraries,
            relocatable: self.relocatable + rhs.relocatable,
            core: self.core + rhs.core,
            other: self.other + rhs.other,
            total: self.total + rhs.total,
        }
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScanTotals {
    /// Regular files visited by the walker.
    pub files: usize,
    /// Executable ELF objects that were probed successfully.
    pub elfs: ElfTotals,
    /// ELF objects whose machine is outside the supported set.
    pub unsupported: usize,
    /// ELF objects with at least one matching dependency.
    pub matched: usize,
    pub probe_errors: usize,
    pub walk_errors: usize,
}

impl Add for ScanTotals {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            files: self.files + other.files,
            elfs: self.elfs + other.elfs,
            unsupported: self.unsupported + other.unsupported,
            matched: self.matched + other.matched,
            probe_errors: self.probe_errors + other.probe_errors,
            walk_errors: self.walk_errors + other.walk_errors,
        }
    }
}
