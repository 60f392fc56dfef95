// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Glyph widths of the standard Helvetica font (from the Adobe AFM, 1/1000 em).

/// Widths for the printable ASCII range `0x20..=0x7e`.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];

/// Characters outside printable ASCII are written as `?`.
pub(crate) const REPLACEMENT: char = '?';

fn glyph_width(c: char) -> u16 {
    let c = if c.is_ascii() && !c.is_ascii_control() {
        c
    } else {
        REPLACEMENT
    };
    // `c` is printable ASCII here, so the index is in range.
    HELVETICA_WIDTHS[(c as usize) - 0x20]
}

/// Width of `text` in points when set in Helvetica at `size`.
#[must_use]
pub(crate) fn text_width(text: &str, size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(glyph_width(c))).sum();
    // Realistic strings stay far below f32's exact integer range.
    #[allow(clippy::cast_precision_loss)]
    let units = units as f32;
    units * size / 1000.0
}
