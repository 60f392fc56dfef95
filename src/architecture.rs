// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! CPU/ABI classes used as the top-level grouping key of the report.

use goblin::elf::header::{EM_386, EM_AARCH64, EM_ARM, EM_X86_64};
use std::fmt;

/// Target architecture of an ELF object, derived from the header's `e_machine` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Architecture {
    X86_64,
    X86,
    Aarch64,
    Armv7,
    /// Any machine outside the supported set. Never aggregated.
    Unknown(u16),
}

impl Architecture {
    /// Map an ELF `e_machine` value to an architecture tag.
    #[must_use]
    pub fn from_machine(machine: u16) -> Self {
        match machine {
            EM_X86_64 => Self::X86_64,
            EM_386 => Self::X86,
            EM_AARCH64 => Self::Aarch64,
            EM_ARM => Self::Armv7,
            other => Self::Unknown(other),
        }
    }

    /// Name used in reports.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::X86 => "x86",
            Self::Aarch64 => "aarch64",
            Self::Armv7 => "armv7",
            Self::Unknown(_) => "unknown",
        }
    }

    #[must_use]
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_machine_supported() {
        assert_eq!(Architecture::from_machine(EM_X86_64), Architecture::X86_64);
        assert_eq!(Architecture::from_machine(EM_386), Architecture::X86);
        assert_eq!(Architecture::from_machine(EM_AARCH64), Architecture::Aarch64);
        assert_eq!(Architecture::from_machine(EM_ARM), Architecture::Armv7);
    }

    #[test]
    fn test_from_machine_unknown() {
        // EM_RISCV
        let arch = Architecture::from_machine(243);
        assert_eq!(arch, Architecture::Unknown(243));
        assert!(!arch.is_supported());
        assert_eq!(arch.to_string(), "unknown");
    }

    #[test]
    fn test_names() {
        assert_eq!(Architecture::X86_64.to_string(), "x86_64");
        assert_eq!(Architecture::Armv7.name(), "armv7");
        assert!(Architecture::Aarch64.is_supported());
    }
}
