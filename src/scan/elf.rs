// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Probes candidate files for their architecture and `DT_NEEDED` entries. Uses the `goblin` crate for ELF parsing.

use goblin::elf::Elf as GoblinElf;
use nix::unistd::{access, AccessFlags};
use serde::Serialize;
use std::fs;
use std::io;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::architecture::Architecture;

pub type ProbeResult<T> = std::result::Result<T, ElfError>;

/// Per-file probe failures.
#[derive(Debug, Error)]
pub enum ElfError {
    #[error("{path:?} has {size} bytes, less than an ELF header")]
    TooSmall { path: PathBuf, size: u64 },
    #[error("{path:?} does not start with the ELF magic")]
    NotElf { path: PathBuf },
    #[error("Cannot read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Malformed ELF object {path:?}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: goblin::error::Error,
    },
}

impl ElfError {
    fn io(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Object file type from `e_type`.
///
/// OS- and processor-specific values are kept as `Other` rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ElfType {
    None,
    Relocatable,
    Executable,
    SharedObject,
    Core,
    Other(u16),
}

impl ElfType {
    #[must_use]
    pub fn from_e_type(e_type: u16) -> Self {
        use goblin::elf::header::{ET_CORE, ET_DYN, ET_EXEC, ET_NONE, ET_REL};
        match e_type {
            ET_NONE => Self::None,
            ET_REL => Self::Relocatable,
            ET_EXEC => Self::Executable,
            ET_DYN => Self::SharedObject,
            ET_CORE => Self::Core,
            other => Self::Other(other),
        }
    }
}

/// What the scanner needs to know about one ELF object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Elf {
    kind: ElfType,
    architecture: Architecture,
    dependencies: Vec<String>,
}

/// Classifies a single path.
///
/// `Ok(None)` means the file is not a candidate: it is not executable by the
/// invoking user or it is not an ELF object. Errors are per-file and never
/// abort a scan.
pub trait Probe: Sync {
    /// Probe the file at `path`.
    ///
    /// # Errors
    /// Returns an error if the file looks like an ELF object but cannot be read or parsed.
    fn probe(&self, path: &Path) -> ProbeResult<Option<Elf>>;
}

/// Production probe backed by `goblin`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ElfProbe;

impl Probe for ElfProbe {
    fn probe(&self, path: &Path) -> ProbeResult<Option<Elf>> {
        if !is_executable(path) {
            return Ok(None);
        }
        match Elf::from_path(path) {
            Ok(elf) => Ok(Some(elf)),
            Err(ElfError::NotElf { .. } | ElfError::TooSmall { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Check execute permission for the invoking user without opening the file.
#[must_use]
pub fn is_executable(path: &Path) -> bool {
    access(path, AccessFlags::X_OK).is_ok()
}

impl Elf {
    #[must_use]
    pub fn new(kind: ElfType, architecture: Architecture, dependencies: Vec<String>) -> Self {
        Self {
            kind,
            architecture,
            dependencies,
        }
    }

    /// Parse an ELF file from a path.
    ///
    /// # Errors
    /// Returns an error if the file is not an ELF file or cannot be read or parsed.
    pub fn from_path(path: &Path) -> ProbeResult<Self> {
        let bytes = Self::read(path)?;
        Self::parse(path, &bytes)
    }

    /// Get the ELF file type (executable, shared object, etc.).
    #[must_use]
    pub fn kind(&self) -> ElfType {
        self.kind
    }

    #[must_use]
    pub fn architecture(&self) -> Architecture {
        self.architecture
    }

    /// Get the list of dynamic dependencies (`DT_NEEDED` entries), in dynamic-section order.
    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Load the whole object, rejecting files that cannot hold an ELF header
    /// or lack the magic before reading the rest.
    ///
    /// # Errors
    /// Returns an error if the file is not an ELF object or cannot be read.
    fn read(path: &Path) -> ProbeResult<Vec<u8>> {
        const ELF_MAGIC: &[u8; 4] = b"\x7fELF";
        const MIN_SIZE: u64 = 64;

        let mut file = fs::File::open(path).map_err(ElfError::io(path))?;
        let size = file.metadata().map_err(ElfError::io(path))?.len();
        if size < MIN_SIZE {
            return Err(ElfError::TooSmall {
                path: path.to_path_buf(),
                size,
            });
        }

        let mut bytes = vec![0u8; ELF_MAGIC.len()];
        file.read_exact(&mut bytes).map_err(ElfError::io(path))?;
        if bytes != ELF_MAGIC {
            return Err(ElfError::NotElf {
                path: path.to_path_buf(),
            });
        }
        bytes.reserve(usize::try_from(size).unwrap_or(0));
        file.read_to_end(&mut bytes).map_err(ElfError::io(path))?;
        Ok(bytes)
    }

    fn parse(path: &Path, bytes: &[u8]) -> ProbeResult<Self> {
        let elf = GoblinElf::parse(bytes).map_err(|source| ElfError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

        let mut dependencies = Vec::new();
        if let Some(dynamic) = &elf.dynamic {
            // Order matters: the matcher resolves each entry independently in sequence.
            for dyn_entry in &dynamic.dyns {
                if dyn_entry.d_tag != goblin::elf::dynamic::DT_NEEDED {
                    continue;
                }
                if let Ok(strtab_idx) = usize::try_from(dyn_entry.d_val) {
                    if let Some(dep_name) = elf.dynstrtab.get_at(strtab_idx) {
                        dependencies.push(dep_name.to_string());
                    }
                }
            }
        }

        Ok(Self {
            kind: ElfType::from_e_type(elf.header.e_type),
            architecture: Architecture::from_machine(elf.header.e_machine),
            dependencies,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &[u8], mode: u32) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    #[test]
    fn test_file_too_small() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "small", b"not an elf file", 0o755);
        match Elf::from_path(&path) {
            Err(ElfError::TooSmall { size: 15, .. }) => {}
            other => panic!("Expected TooSmall, got {other:?}"),
        }
    }

    #[test]
    fn test_not_elf_file() {
        let dir = TempDir::new().unwrap();
        let content = "#!/bin/sh\n# This is not an ELF file, just a shell script long enough to pass the size check.\n";
        let path = write_file(&dir, "script.sh", content.as_bytes(), 0o755);
        match Elf::from_path(&path) {
            Err(ElfError::NotElf { .. }) => {}
            other => panic!("Expected NotElf, got {other:?}"),
        }
    }

    #[test]
    fn test_truncated_elf_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let mut content = vec![0x7f, b'E', b'L', b'F', 2, 1, 1];
        content.resize(80, 0xff);
        let path = write_file(&dir, "broken", &content, 0o755);
        match Elf::from_path(&path) {
            Err(ElfError::Malformed { .. }) => {}
            other => panic!("Expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn test_probe_skips_non_elf_silently() {
        let dir = TempDir::new().unwrap();
        let content = "#!/bin/sh\necho 'an executable script is not a candidate for dependency probing'\n";
        let path = write_file(&dir, "run", content.as_bytes(), 0o755);
        assert!(ElfProbe.probe(&path).unwrap().is_none());
    }

    #[test]
    fn test_probe_missing_file_is_not_executable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing");
        assert!(!is_executable(&path));
        assert!(ElfProbe.probe(&path).unwrap().is_none());
    }

    #[test]
    fn test_elf_type_keeps_os_specific_values() {
        use goblin::elf::header::{ET_DYN, ET_EXEC};
        assert_eq!(ElfType::from_e_type(ET_EXEC), ElfType::Executable);
        assert_eq!(ElfType::from_e_type(ET_DYN), ElfType::SharedObject);
        assert_eq!(ElfType::from_e_type(0xfe00), ElfType::Other(0xfe00));
        assert_eq!(ElfType::from_e_type(0xff01), ElfType::Other(0xff01));
    }

    #[test]
    fn test_elf_accessors() {
        let elf = Elf::new(
            ElfType::Executable,
            Architecture::X86_64,
            vec!["libm.so.6".to_string(), "libc.so.6".to_string()],
        );
        assert_eq!(elf.kind(), ElfType::Executable);
        assert_eq!(elf.architecture(), Architecture::X86_64);
        assert_eq!(elf.dependencies(), ["libm.so.6", "libc.so.6"]);
    }
}
