// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Synthetic ELF fixtures: a header, one `PT_LOAD` covering the file, one `PT_DYNAMIC`
//! with `DT_NEEDED` entries and a string table. Enough for the dependency probe, no
//! toolchain required.
#![allow(dead_code)]

use goblin::elf::dynamic::{DT_NEEDED, DT_NULL, DT_STRSZ, DT_STRTAB};
use goblin::elf::header::{ET_DYN, ET_EXEC};
use goblin::elf::program_header::{PT_DYNAMIC, PT_LOAD};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

pub use goblin::elf::header::{EM_386, EM_AARCH64, EM_ARM, EM_X86_64};

/// `EM_RISCV`, outside the supported set.
pub const EM_RISCV: u16 = 243;

#[derive(Debug, Clone)]
pub struct ElfFixture {
    is_64: bool,
    machine: u16,
    kind: u16,
    needed: Vec<String>,
    dynamic: bool,
}

impl ElfFixture {
    pub fn new(machine: u16, is_64: bool) -> Self {
        Self {
            is_64,
            machine,
            kind: ET_EXEC,
            needed: Vec::new(),
            dynamic: true,
        }
    }

    pub fn x86_64() -> Self {
        Self::new(EM_X86_64, true)
    }

    pub fn aarch64() -> Self {
        Self::new(EM_AARCH64, true)
    }

    pub fn x86() -> Self {
        Self::new(EM_386, false)
    }

    pub fn armv7() -> Self {
        Self::new(EM_ARM, false)
    }

    pub fn needs(mut self, libraries: &[&str]) -> Self {
        self.needed = libraries.iter().map(|l| (*l).to_string()).collect();
        self
    }

    pub fn shared_object(mut self) -> Self {
        self.kind = ET_DYN;
        self
    }

    /// Raw `e_type`, e.g. an OS-specific value.
    pub fn object_type(mut self, e_type: u16) -> Self {
        self.kind = e_type;
        self
    }

    /// No program headers at all, like a fully static binary.
    pub fn static_binary(mut self) -> Self {
        self.dynamic = false;
        self
    }

    /// Write the fixture with mode `0o755`.
    pub fn write(&self, dir: &Path, name: &str) -> PathBuf {
        self.write_with_mode(dir, name, 0o755)
    }

    pub fn write_with_mode(&self, dir: &Path, name: &str, mode: u32) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, self.bytes()).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    pub fn bytes(&self) -> Vec<u8> {
        let (ehsize, phentsize, dynsize) = if self.is_64 { (64, 56, 16) } else { (52, 32, 8) };
        let phnum = if self.dynamic { 2 } else { 0 };

        let mut strtab = vec![0u8];
        let mut name_offsets = Vec::new();
        for name in &self.needed {
            name_offsets.push(strtab.len() as u64);
            strtab.extend_from_slice(name.as_bytes());
            strtab.push(0);
        }

        let dyn_offset = ehsize + phentsize * phnum;
        let dyn_count = self.needed.len() + 3;
        let strtab_offset = dyn_offset + dynsize * dyn_count;
        let total = if self.dynamic {
            strtab_offset + strtab.len()
        } else {
            // Pad so the file passes the minimum size check.
            ehsize.max(64) + 16
        };

        let mut out = Writer::new(self.is_64);
        // e_ident
        out.raw(&[0x7f, b'E', b'L', b'F']);
        out.raw(&[if self.is_64 { 2 } else { 1 }, 1, 1, 0]);
        out.raw(&[0; 8]);
        out.u16(self.kind);
        out.u16(self.machine);
        out.u32(1);
        out.word(0); // e_entry
        out.word(if self.dynamic { ehsize as u64 } else { 0 }); // e_phoff
        out.word(0); // e_shoff
        out.u32(0); // e_flags
        out.u16(ehsize as u16);
        out.u16(phentsize as u16);
        out.u16(phnum as u16);
        out.u16(if self.is_64 { 64 } else { 40 });
        out.u16(0);
        out.u16(0);

        if self.dynamic {
            out.program_header(PT_LOAD, 0, total as u64, 5);
            out.program_header(PT_DYNAMIC, dyn_offset as u64, (dynsize * dyn_count) as u64, 6);
            for offset in &name_offsets {
                out.dyn_entry(DT_NEEDED, *offset);
            }
            out.dyn_entry(DT_STRTAB, strtab_offset as u64);
            out.dyn_entry(DT_STRSZ, strtab.len() as u64);
            out.dyn_entry(DT_NULL, 0);
            out.raw(&strtab);
        }
        let mut bytes = out.finish();
        bytes.resize(total, 0);
        bytes
    }
}

/// Little-endian writer for either ELF class.
struct Writer {
    is_64: bool,
    bytes: Vec<u8>,
}

impl Writer {
    fn new(is_64: bool) -> Self {
        Self {
            is_64,
            bytes: Vec::new(),
        }
    }

    fn raw(&mut self, data: &[u8]) {
        self.bytes.extend_from_slice(data);
    }

    fn u16(&mut self, value: u16) {
        self.raw(&value.to_le_bytes());
    }

    fn u32(&mut self, value: u32) {
        self.raw(&value.to_le_bytes());
    }

    /// Address/offset sized field.
    fn word(&mut self, value: u64) {
        if self.is_64 {
            self.raw(&value.to_le_bytes());
        } else {
            self.u32(value as u32);
        }
    }

    /// Identity-mapped segment: file offset == virtual address.
    fn program_header(&mut self, kind: u32, offset: u64, size: u64, flags: u32) {
        if self.is_64 {
            self.u32(kind);
            self.u32(flags);
            self.word(offset);
            self.word(offset);
            self.word(offset);
            self.word(size);
            self.word(size);
            self.word(8);
        } else {
            self.u32(kind);
            self.word(offset);
            self.word(offset);
            self.word(offset);
            self.word(size);
            self.word(size);
            self.u32(flags);
            self.word(4);
        }
    }

    fn dyn_entry(&mut self, tag: u64, value: u64) {
        self.word(tag);
        self.word(value);
    }

    fn finish(self) -> Vec<u8> {
        self.bytes
    }
}
