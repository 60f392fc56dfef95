// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Paginated PDF report.

mod layout;
mod metrics;
mod writer;

pub use layout::{fit_path, layout, Document, Face, Page, PageGeometry, TextRun};
pub use writer::to_pdf;

use std::fs;
use std::path::Path;

use super::{ReportError, ReportResult};
use crate::store::Snapshot;

/// Lay out the snapshot on A4 pages and write it to `path`.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_pdf_report(snapshot: &Snapshot, path: &Path) -> ReportResult<()> {
    let document = layout(snapshot, PageGeometry::A4);
    tracing::debug!(pages = document.pages.len(), "PDF layout completed");
    fs::write(path, to_pdf(&document)).map_err(|e| ReportError::WriteFailed {
        path: path.to_path_buf(),
        source: e,
    })
}
