// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Formats and prints scan summaries to the console.

use comfy_table::{Cell, Table};

use crate::scan::ScanTotals;
use crate::store::Snapshot;

/// Summarize the scan to the console.
///
/// Prints the libraries found per architecture, ELF statistics, scan statistics
/// and a one-line summary.
pub fn summarize_report(snapshot: &Snapshot, totals: &ScanTotals) {
    if !snapshot.is_empty() {
        println!("{}\n", libraries_table(snapshot));
    }
    println!("{}\n", elf_table(totals));
    println!("{}\n", scan_table(snapshot, totals));
    println!("{}", summary_line(snapshot));
}

/// Create a table with the default preset styling.
fn default_table_preset() -> Table {
    let mut table = Table::new();
    table
        .load_preset(comfy_table::presets::UTF8_FULL_CONDENSED)
        .apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS)
        .set_content_arrangement(comfy_table::ContentArrangement::Dynamic);
    table
}

fn bold(text: &str) -> Cell {
    Cell::new(text).add_attribute(comfy_table::Attribute::Bold)
}

/// Create a table of matched libraries, in report order.
fn libraries_table(snapshot: &Snapshot) -> Table {
    let mut table = default_table_preset();
    table.set_header(vec![bold("Architecture"), bold("Library"), bold("Executables")]);
    for arch in &snapshot.architectures {
        for lib in &arch.libraries {
            table.add_row(vec![
                Cell::new(&arch.name),
                Cell::new(&lib.name),
                Cell::new(lib.count),
            ]);
        }
    }
    table
}

/// Create a table showing ELF file type statistics.
fn elf_table(totals: &ScanTotals) -> Table {
    let mut table = default_table_preset();
    table
        .set_header(vec![bold("ELF Type"), bold("Count")])
        .add_row(vec![Cell::new("Binaries"), Cell::new(totals.elfs.binaries)])
        .add_row(vec![
            Cell::new("Shared libraries"),
            Cell::new(totals.elfs.shared_libraries),
        ])
        .add_row(vec![
            Cell::new("Relocatable"),
            Cell::new(totals.elfs.relocatable),
        ])
        .add_row(vec![Cell::new("Core"), Cell::new(totals.elfs.core)])
        .add_row(vec![Cell::new("None"), Cell::new(totals.elfs.none)])
        .add_row(vec![Cell::new("Other"), Cell::new(totals.elfs.other)])
        .add_row(vec![
            bold("Total"),
            Cell::new(totals.elfs.total).add_attribute(comfy_table::Attribute::Bold),
        ]);
    table
}

/// Create a table showing how the scan went.
fn scan_table(snapshot: &Snapshot, totals: &ScanTotals) -> Table {
    let mut table = default_table_preset();
    table
        .set_header(vec![bold("Scan"), bold("Count")])
        .add_row(vec![Cell::new("Files visited"), Cell::new(totals.files)])
        .add_row(vec![
            Cell::new("Unsupported architecture"),
            Cell::new(totals.unsupported),
        ])
        .add_row(vec![Cell::new("Matching ELF files"), Cell::new(totals.matched)])
        .add_row(vec![Cell::new("Probe errors"), Cell::new(totals.probe_errors)])
        .add_row(vec![Cell::new("Walk errors"), Cell::new(totals.walk_errors)])
        .add_row(vec![
            Cell::new("Dropped facts"),
            Cell::new(snapshot.dropped.total()),
        ]);
    table
}

fn summary_line(snapshot: &Snapshot) -> String {
    format!(
        "Summary: Found {} executables across {} architectures",
        snapshot.total_executables,
        snapshot.architectures.len()
    )
}
