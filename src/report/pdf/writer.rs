// Copyright (C) 2026 Checkmk GmbH - License: GNU General Public License v2
// This file is part of Checkmk (https://checkmk.com). It is subject to the terms and
// conditions defined in the file COPYING, which is part of this source code package.

//! Minimal PDF 1.4 serializer for text-only documents using the standard Type1 fonts.

use std::fmt::Write as _;

use super::layout::{Document, Face, TextRun};
use super::metrics::REPLACEMENT;

const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;
const REGULAR_FONT_ID: usize = 3;
const BOLD_FONT_ID: usize = 4;
const FIRST_PAGE_ID: usize = 5;

/// Accumulates objects and remembers their byte offsets for the cross-reference table.
struct PdfBuffer {
    bytes: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfBuffer {
    fn new() -> Self {
        let mut bytes = Vec::new();
        // Header plus a binary comment so transfer tools treat the file as binary.
        bytes.extend_from_slice(b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n");
        Self {
            bytes,
            offsets: Vec::new(),
        }
    }

    /// Append object `id`. Objects must be added in ascending id order.
    fn object(&mut self, id: usize, body: &str) {
        debug_assert_eq!(id, self.offsets.len() + 1);
        self.offsets.push(self.bytes.len());
        self.bytes
            .extend_from_slice(format!("{id} 0 obj\n{body}\nendobj\n").as_bytes());
    }

    fn stream(&mut self, id: usize, content: &str) {
        let body = format!(
            "<< /Length {} >>\nstream\n{content}\nendstream",
            content.len()
        );
        self.object(id, &body);
    }

    fn finish(mut self) -> Vec<u8> {
        let xref_offset = self.bytes.len();
        let mut trailer = String::new();
        let _ = writeln!(trailer, "xref\n0 {}", self.offsets.len() + 1);
        trailer.push_str("0000000000 65535 f \n");
        for offset in &self.offsets {
            let _ = writeln!(trailer, "{offset:010} 00000 n ");
        }
        let _ = write!(
            trailer,
            "trailer\n<< /Size {} /Root {CATALOG_ID} 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            self.offsets.len() + 1
        );
        self.bytes.extend_from_slice(trailer.as_bytes());
        self.bytes
    }
}

/// Escape text for a PDF literal string. Anything outside printable ASCII becomes `?`.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '(' | ')' => {
                escaped.push('\\');
                escaped.push(c);
            }
            c if c.is_ascii() && !c.is_ascii_control() => escaped.push(c),
            _ => escaped.push(REPLACEMENT),
        }
    }
    escaped
}

fn content_stream(runs: &[TextRun]) -> String {
    let mut content = String::new();
    for run in runs {
        let font = match run.face {
            Face::Regular => "F1",
            Face::Bold => "F2",
        };
        let _ = writeln!(
            content,
            "BT /{font} {:.1} Tf {:.2} {:.2} Td ({}) Tj ET",
            run.size,
            run.x,
            run.y,
            escape(&run.text)
        );
    }
    content
}

/// Serialize a laid-out document.
#[must_use]
pub fn to_pdf(document: &Document) -> Vec<u8> {
    let mut pdf = PdfBuffer::new();
    let page_count = document.pages.len();
    // Each page takes two objects: the page dictionary and its content stream.
    let page_ids: Vec<usize> = (0..page_count).map(|i| FIRST_PAGE_ID + i * 2).collect();

    pdf.object(
        CATALOG_ID,
        &format!("<< /Type /Catalog /Pages {PAGES_ID} 0 R >>"),
    );
    let kids = page_ids
        .iter()
        .map(|id| format!("{id} 0 R"))
        .collect::<Vec<_>>()
        .join(" ");
    pdf.object(
        PAGES_ID,
        &format!("<< /Type /Pages /Kids [{kids}] /Count {page_count} >>"),
    );
    pdf.object(
        REGULAR_FONT_ID,
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>",
    );
    pdf.object(
        BOLD_FONT_ID,
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>",
    );

    let geometry = document.geometry;
    for (page, page_id) in document.pages.iter().zip(&page_ids) {
        let content_id = page_id + 1;
        pdf.object(
            *page_id,
            &format!(
                "<< /Type /Page /Parent {PAGES_ID} 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Resources << /Font << /F1 {REGULAR_FONT_ID} 0 R /F2 {BOLD_FONT_ID} 0 R >> >> \
                 /Contents {content_id} 0 R >>",
                geometry.width, geometry.height
            ),
        );
        pdf.stream(content_id, &content_stream(&page.runs));
    }
    pdf.finish()
}
