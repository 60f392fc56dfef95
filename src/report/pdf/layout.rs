// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Paginates a snapshot into positioned text runs.
//!
//! Layout is a pure function of the snapshot and the page geometry, so the same
//! snapshot always yields the same pages.

use std::path::Path;

use super::metrics::text_width;
use crate::report::{SEPARATOR, TITLE};
use crate::store::Snapshot;

const TITLE_SIZE: f32 = 16.0;
const ARCH_SIZE: f32 = 14.0;
const LIBRARY_SIZE: f32 = 12.0;
const ENTRY_SIZE: f32 = 10.0;

const TITLE_ADVANCE: f32 = 30.0;
const ARCH_ADVANCE: f32 = 20.0;
const LIBRARY_ADVANCE: f32 = 15.0;
const ENTRY_ADVANCE: f32 = 12.0;
const LIBRARY_GAP: f32 = 10.0;

/// Headers need this much room above the bottom margin, otherwise a new page is started.
const HEADER_RESERVE: f32 = 50.0;

const ARROW_INDENT: f32 = 10.0;
const PATH_INDENT: f32 = 30.0;
const PATH_SLACK: f32 = 20.0;

/// Page geometry in PDF points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageGeometry {
    /// A4 portrait with 50pt margins.
    pub const A4: Self = Self {
        width: 595.276,
        height: 841.89,
        margin: 50.0,
    };

    fn top(&self) -> f32 {
        self.height - self.margin
    }

    /// Widest path that fits next to the arrow.
    fn max_path_width(&self) -> f32 {
        self.width - self.margin * 2.0 - PATH_SLACK
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Regular,
    Bold,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub face: Face,
    pub size: f32,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub runs: Vec<TextRun>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,
}

struct Cursor {
    geometry: PageGeometry,
    pages: Vec<Page>,
    y: f32,
}

impl Cursor {
    fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: vec![Page::default()],
            y: geometry.top(),
        }
    }

    fn ensure_room(&mut self, floor: f32) {
        if self.y < floor {
            self.pages.push(Page::default());
            self.y = self.geometry.top();
        }
    }

    fn put(&mut self, x: f32, face: Face, size: f32, text: String) {
        let run = TextRun {
            x,
            y: self.y,
            face,
            size,
            text,
        };
        // There is always at least one page.
        if let Some(page) = self.pages.last_mut() {
            page.runs.push(run);
        }
    }
}

/// Shorten `path` to `.../<basename>` when it would overflow `max_width` at the entry font size.
#[must_use]
pub fn fit_path(path: &Path, max_width: f32) -> String {
    let full = path.to_string_lossy();
    if text_width(&full, ENTRY_SIZE) <= max_width {
        return full.into_owned();
    }
    let base = path
        .file_name()
        .map_or_else(|| full.clone(), |name| name.to_string_lossy());
    format!(".../{base}")
}

/// Lay out the whole report.
#[must_use]
pub fn layout(snapshot: &Snapshot, geometry: PageGeometry) -> Document {
    let margin = geometry.margin;
    let header_floor = margin + HEADER_RESERVE;
    let mut cursor = Cursor::new(geometry);

    cursor.put(margin, Face::Bold, TITLE_SIZE, TITLE.to_string());
    cursor.y -= TITLE_ADVANCE;

    for arch in &snapshot.architectures {
        cursor.ensure_room(header_floor);
        cursor.put(
            margin,
            Face::Bold,
            ARCH_SIZE,
            format!("{SEPARATOR} {} {SEPARATOR}", arch.name),
        );
        cursor.y -= ARCH_ADVANCE;

        for lib in &arch.libraries {
            cursor.ensure_room(header_floor);
            cursor.put(
                margin,
                Face::Bold,
                LIBRARY_SIZE,
                format!("{} ({} execs)", lib.name, lib.count),
            );
            cursor.y -= LIBRARY_ADVANCE;

            for exe in &lib.executables {
                cursor.ensure_room(margin);
                cursor.put(margin + ARROW_INDENT, Face::Regular, ENTRY_SIZE, "-> ".to_string());
                cursor.put(
                    margin + PATH_INDENT,
                    Face::Regular,
                    ENTRY_SIZE,
                    fit_path(exe, geometry.max_path_width()),
                );
                cursor.y -= ENTRY_ADVANCE;
            }
            cursor.y -= LIBRARY_GAP;
        }
    }

    Document {
        geometry,
        pages: cursor.pages,
    }
}
