// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Report renderers consuming the sorted snapshot.

mod console;
mod json;
pub mod pdf;
mod text;

pub use console::summarize_report;
pub use json::JsonReport;
pub use pdf::write_pdf_report;
pub use text::{render_text, write_text_report};

use clap::ValueEnum;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::scan::{LibraryPattern, ScanTotals};
use crate::store::Snapshot;

pub(crate) const TITLE: &str = "Report on dynamic used libraries by ELF executables";
pub(crate) const SEPARATOR: &str = "----------";

pub type ReportResult<T> = std::result::Result<T, ReportError>;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Cannot create output file: {path:?}")]
    CreateFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Cannot write output file: {path:?}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to serialize report to JSON: {path:?}")]
    SerializeFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("None of the {requested} requested reports could be written")]
    AllFailed { requested: usize },
}

/// Document formats selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Txt,
    Pdf,
    Both,
}

impl ReportFormat {
    #[must_use]
    pub fn text(self) -> bool {
        matches!(self, Self::Txt | Self::Both)
    }

    #[must_use]
    pub fn pdf(self) -> bool {
        matches!(self, Self::Pdf | Self::Both)
    }
}

/// Which reports to write and where.
#[derive(Debug, Clone)]
pub struct OutputRequest {
    pub format: ReportFormat,
    /// Base name; each renderer appends its own extension.
    pub base: PathBuf,
    pub json: Option<PathBuf>,
}

impl OutputRequest {
    fn with_extension(&self, extension: &str) -> PathBuf {
        let mut name = self.base.clone().into_os_string();
        name.push(".");
        name.push(extension);
        PathBuf::from(name)
    }
}

/// Write every requested report.
///
/// A failing renderer is logged and does not stop the others.
///
/// # Errors
/// Returns an error only if every requested report failed.
pub fn render_reports(
    snapshot: &Snapshot,
    totals: &ScanTotals,
    root: &Path,
    libraries: &[LibraryPattern],
    request: &OutputRequest,
) -> ReportResult<Vec<PathBuf>> {
    let mut jobs: Vec<(PathBuf, ReportResult<()>)> = Vec::new();
    if request.format.text() {
        let path = request.with_extension("txt");
        let result = write_text_report(snapshot, &path);
        jobs.push((path, result));
    }
    if request.format.pdf() {
        let path = request.with_extension("pdf");
        let result = write_pdf_report(snapshot, &path);
        jobs.push((path, result));
    }
    if let Some(path) = &request.json {
        let result = JsonReport::new(root, libraries, totals, snapshot).write(path);
        jobs.push((path.clone(), result));
    }

    let requested = jobs.len();
    let mut written = Vec::new();
    for (path, result) in jobs {
        match result {
            Ok(()) => {
                tracing::info!(file = %path.display(), "Report saved");
                written.push(path);
            }
            Err(e) => {
                tracing::error!(file = %path.display(), error = %e, "Failed to write report");
            }
        }
    }
    if written.is_empty() && requested > 0 {
        return Err(ReportError::AllFailed { requested });
    }
    Ok(written)
}
