// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Plain text report.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::{ReportError, ReportResult, SEPARATOR, TITLE};
use crate::store::Snapshot;

const RULE: &str = "------------------------------------------------------------";

/// Render the snapshot as text: one section per architecture, libraries by descending count.
///
/// # Errors
/// Returns an error if writing to `out` fails.
pub fn render_text<W: Write>(snapshot: &Snapshot, out: &mut W) -> io::Result<()> {
    writeln!(out, "{TITLE}")?;
    writeln!(out, "{RULE}")?;
    for arch in &snapshot.architectures {
        writeln!(out, "{SEPARATOR} {} {SEPARATOR}", arch.name)?;
        for lib in &arch.libraries {
            writeln!(out, "{} ({} execs)", lib.name, lib.count)?;
            for exe in &lib.executables {
                writeln!(out, "-> {}", exe.display())?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Write the text report to `path`.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_text_report(snapshot: &Snapshot, path: &Path) -> ReportResult<()> {
    let file = File::create(path).map_err(|e| ReportError::CreateFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);
    render_text(snapshot, &mut writer)
        .and_then(|()| writer.flush())
        .map_err(|e| ReportError::WriteFailed {
            path: path.to_path_buf(),
            source: e,
        })
}
