//! PDF text extraction and re-encoding.
//!
//! Extraction yields one unit per page. Writing puts each unit on a fresh
//! page, so a document with no overflowing pages keeps its page count.

use super::{DocumentWriter, TextExtractor};
use crate::error::{RedactorError, RedactorResult};
use printpdf::{BuiltinFont, Mm, PdfDocument};
use std::io::{BufWriter, Write};
use tracing::warn;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const FONT_SIZE_PT: f32 = 11.0;
const LINE_HEIGHT_MM: f32 = 5.0;
const MAX_LINE_CHARS: usize = 90;

/// Extracts per-page text with lopdf.
#[derive(Debug, Clone, Default)]
pub struct PdfExtractor;

impl TextExtractor for PdfExtractor {
    fn extract(&self, bytes: &[u8]) -> RedactorResult<Vec<String>> {
        let document = lopdf::Document::load_mem(bytes).map_err(|e| RedactorError::TextExtraction {
            format: "PDF".to_string(),
            reason: e.to_string(),
        })?;

        if document.is_encrypted() {
            return Err(RedactorError::TextExtraction {
                format: "PDF".to_string(),
                reason: "document is encrypted".to_string(),
            });
        }

        let pages = document.get_pages();
        let mut units = Vec::with_capacity(pages.len());
        for page_number in pages.keys() {
            match document.extract_text(&[*page_number]) {
                Ok(text) => units.push(text),
                Err(e) => {
                    // A page without decodable text still counts as a page.
                    warn!(page = page_number, error = %e, "No extractable text on page");
                    units.push(String::new());
                }
            }
        }

        Ok(units)
    }

    fn name(&self) -> &str {
        "pdf"
    }
}

/// Writes text units as a plain Helvetica PDF, one unit per page.
#[derive(Debug, Clone)]
pub struct PdfWriter {
    title: String,
}

impl PdfWriter {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new("Masked document")
    }
}

impl DocumentWriter for PdfWriter {
    fn write(&self, blocks: &[String]) -> RedactorResult<Vec<u8>> {
        let (doc, first_page, first_layer) = PdfDocument::new(
            &self.title,
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1",
        );
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| printpdf_error("Failed to load Helvetica", e))?;

        let lines_per_page = ((PAGE_HEIGHT_MM - 2.0 * MARGIN_MM) / LINE_HEIGHT_MM) as usize;
        let mut layer = doc.get_page(first_page).get_layer(first_layer);
        let mut line_on_page = 0;
        let mut first = true;

        for block in blocks {
            if !first {
                let (page, page_layer) =
                    doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
                layer = doc.get_page(page).get_layer(page_layer);
                line_on_page = 0;
            }
            first = false;

            for line in wrap_lines(block) {
                if line_on_page == lines_per_page {
                    let (page, page_layer) =
                        doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
                    layer = doc.get_page(page).get_layer(page_layer);
                    line_on_page = 0;
                }
                let y = PAGE_HEIGHT_MM - MARGIN_MM - LINE_HEIGHT_MM * line_on_page as f32;
                layer.use_text(line, FONT_SIZE_PT, Mm(MARGIN_MM), Mm(y), &font);
                line_on_page += 1;
            }
        }

        let mut bytes = Vec::new();
        {
            let mut writer = BufWriter::new(&mut bytes);
            doc.save(&mut writer)
                .map_err(|e| printpdf_error("Failed to save PDF", e))?;
            writer
                .flush()
                .map_err(|e| RedactorError::backend("printpdf", "Failed to flush PDF", e))?;
        }
        Ok(bytes)
    }

    fn extension(&self) -> &str {
        "pdf"
    }
}

fn printpdf_error(message: &str, err: impl std::fmt::Display) -> RedactorError {
    RedactorError::BackendError {
        backend: "printpdf".to_string(),
        message: format!("{}: {}", message, err),
        source: None,
    }
}

/// Splits a unit into printable lines no longer than [`MAX_LINE_CHARS`].
fn wrap_lines(block: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for raw in block.lines() {
        let chars: Vec<char> = raw.chars().collect();
        if chars.is_empty() {
            lines.push(String::new());
            continue;
        }
        for chunk in chars.chunks(MAX_LINE_CHARS) {
            lines.push(chunk.iter().collect());
        }
    }
    lines
}
