// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Ceilings for the aggregation store and accounting of facts dropped because of them.

use serde::Serialize;
use std::fmt;
use std::ops::AddAssign;

/// Optional ceilings per bucket kind. `None` means unbounded.
///
/// Exceeding a ceiling never aborts a scan: the fact is dropped, an error is
/// logged once for the offending bucket and the drop is counted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    pub max_architectures: Option<usize>,
    pub max_libraries: Option<usize>,
    pub max_executables: Option<usize>,
}

impl Capacity {
    #[must_use]
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub(crate) fn allows(limit: Option<usize>, current: usize) -> bool {
        limit.is_none_or(|max| current < max)
    }
}

/// Which ceiling caused a fact to be dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CapacityKind {
    Architectures,
    Libraries,
    Executables,
}

impl fmt::Display for CapacityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Architectures => "architectures",
            Self::Libraries => "libraries",
            Self::Executables => "executables",
        })
    }
}

/// Number of facts discarded per ceiling.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DroppedFacts {
    pub architectures: usize,
    pub libraries: usize,
    pub executables: usize,
}

impl DroppedFacts {
    #[must_use]
    pub fn total(&self) -> usize {
        self.architectures + self.libraries + self.executables
    }
}

impl AddAssign<CapacityKind> for DroppedFacts {
    fn add_assign(&mut self, kind: CapacityKind) {
        match kind {
            CapacityKind::Architectures => self.architectures += 1,
            CapacityKind::Libraries => self.libraries += 1,
            CapacityKind::Executables => self.executables += 1,
        }
    }
}
