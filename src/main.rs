// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.
mod args;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use std::num::NonZeroUsize;
use std::path::Path;

use args::Args;
use bldd::report::{render_reports, summarize_report};
use bldd::{AggregationStore, DependencyMatcher, ScanTotals, Scanner, Snapshot};

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.log_level())?;

    let matcher = DependencyMatcher::new(&args.libs).context("Invalid library selection")?;
    let scanner = Scanner::new(matcher).jobs(args.jobs.map(NonZeroUsize::get));
    let mut store = AggregationStore::new(args.capacity());
    let totals = scan_directory(&scanner, &args.dir, &mut store)?;

    let snapshot = store.snapshot_sorted();
    write_reports(&args, &scanner, &snapshot, &totals)?;
    summarize_report(&snapshot, &totals);
    Ok(())
}

/// Scan the directory tree into the store.
///
/// # Errors
/// Returns an error if the scan root cannot be opened. Per-file problems are only logged.
fn scan_directory(
    scanner: &Scanner,
    dir: &Path,
    store: &mut AggregationStore,
) -> Result<ScanTotals> {
    scanner
        .scan(dir, store)
        .with_context(|| format!("Failed to scan directory: {}", dir.display()))
}

/// Write the requested reports.
///
/// # Errors
/// Returns an error if none of the requested reports could be written.
fn write_reports(
    args: &Args,
    scanner: &Scanner,
    snapshot: &Snapshot,
    totals: &ScanTotals,
) -> Result<()> {
    render_reports(
        snapshot,
        totals,
        &args.dir,
        scanner.matcher().patterns(),
        &args.output_request(),
    )
    .with_context(|| format!("Failed to write reports: {}", args.output.display()))?;
    Ok(())
}
