// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Machine-readable export of the snapshot and scan totals.

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::{ReportError, ReportResult};
use crate::scan::{LibraryPattern, ScanTotals};
use crate::store::Snapshot;

#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    root: &'a Path,
    libraries: &'a [LibraryPattern],
    totals: &'a ScanTotals,
    report: &'a Snapshot,
}

impl<'a> JsonReport<'a> {
    #[must_use]
    pub fn new(
        root: &'a Path,
        libraries: &'a [LibraryPattern],
        totals: &'a ScanTotals,
        report: &'a Snapshot,
    ) -> Self {
        Self {
            root,
            libraries,
            totals,
            report,
        }
    }

    /// Write the report to a file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or the report cannot be serialized.
    pub fn write(&self, dest: &Path) -> ReportResult<()> {
        let file = File::create(dest).map_err(|e| ReportError::CreateFailed {
            path: dest.to_path_buf(),
            source: e,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self).map_err(|e| ReportError::SerializeFailed {
            path: dest.to_path_buf(),
            source: e,
        })?;
        writer.flush().map_err(|e| ReportError::WriteFailed {
            path: dest.to_path_buf(),
            source: e,
        })
    }
}
