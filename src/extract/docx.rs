//! Word-processing (DOCX) paragraph extraction and re-encoding.
//!
//! Only the paragraph text of `word/document.xml` is read. The writer
//! produces a minimal package with one paragraph per unit; styling from the
//! source document is not carried over.

use super::{DocumentWriter, TextExtractor};
use crate::error::{RedactorError, RedactorResult};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const DOCUMENT_PART: &str = "word/document.xml";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_HEAD: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#;

const DOCUMENT_TAIL: &str = "<w:sectPr/></w:body></w:document>";

fn extraction_error(reason: impl ToString) -> RedactorError {
    RedactorError::TextExtraction {
        format: "DOCX".to_string(),
        reason: reason.to_string(),
    }
}

/// Reads one unit per `w:p` paragraph.
#[derive(Debug, Clone, Default)]
pub struct DocxExtractor;

impl TextExtractor for DocxExtractor {
    fn extract(&self, bytes: &[u8]) -> RedactorResult<Vec<String>> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).map_err(extraction_error)?;
        let mut xml = String::new();
        archive
            .by_name(DOCUMENT_PART)
            .map_err(extraction_error)?
            .read_to_string(&mut xml)
            .map_err(extraction_error)?;
        parse_paragraphs(&xml)
    }

    fn name(&self) -> &str {
        "docx"
    }
}

/// Collects paragraph text from WordprocessingML.
///
/// Tabs and breaks inside a run become `\t` and `\n` so the paragraph text
/// reads the way it renders. Paragraphs nested inside another one (text
/// boxes) become their own unit after the enclosing paragraph, which keeps
/// all of its own text.
pub fn parse_paragraphs(xml: &str) -> RedactorResult<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut open: Vec<usize> = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:p" => {
                    open.push(paragraphs.len());
                    paragraphs.push(String::new());
                }
                b"w:t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:p" => paragraphs.push(String::new()),
                b"w:tab" => push_to_open(&mut paragraphs, &open, "\t"),
                b"w:br" | b"w:cr" => push_to_open(&mut paragraphs, &open, "\n"),
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:p" => {
                    open.pop();
                }
                b"w:t" => in_text = false,
                _ => {}
            },
            Ok(Event::Text(t)) if in_text => {
                let text = t.unescape().map_err(extraction_error)?;
                push_to_open(&mut paragraphs, &open, &text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(extraction_error(format!(
                    "XML error at position {}: {}",
                    reader.error_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    Ok(paragraphs)
}

/// Appends to the innermost open paragraph; text outside any paragraph is ignored.
fn push_to_open(paragraphs: &mut [String], open: &[usize], text: &str) {
    if let Some(&index) = open.last() {
        paragraphs[index].push_str(text);
    }
}

/// Writes units as paragraphs of a minimal DOCX package.
#[derive(Debug, Clone, Default)]
pub struct DocxWriter;

impl DocxWriter {
    fn document_xml(blocks: &[String]) -> String {
        let mut xml = String::from(DOCUMENT_HEAD);
        for block in blocks {
            xml.push_str("<w:p><w:r>");
            let mut segment = String::new();
            for ch in block.chars() {
                match ch {
                    '\t' | '\n' => {
                        push_text(&mut xml, &segment);
                        segment.clear();
                        xml.push_str(if ch == '\t' { "<w:tab/>" } else { "<w:br/>" });
                    }
                    '\r' => {}
                    _ => segment.push(ch),
                }
            }
            push_text(&mut xml, &segment);
            xml.push_str("</w:r></w:p>");
        }
        xml.push_str(DOCUMENT_TAIL);
        xml
    }
}

fn push_text(xml: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    xml.push_str(r#"<w:t xml:space="preserve">"#);
    xml.push_str(&quick_xml::escape::escape(text));
    xml.push_str("</w:t>");
}

impl DocumentWriter for DocxWriter {
    fn write(&self, blocks: &[String]) -> RedactorResult<Vec<u8>> {
        let archive_error = |e: zip::result::ZipError| {
            RedactorError::backend("zip", "Failed to build DOCX package", e)
        };
        let io_error =
            |e: std::io::Error| RedactorError::backend("zip", "Failed to write DOCX part", e);

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        let parts = [
            ("[Content_Types].xml", CONTENT_TYPES.to_string()),
            ("_rels/.rels", PACKAGE_RELS.to_string()),
            (DOCUMENT_PART, Self::document_xml(blocks)),
        ];
        for (name, content) in parts {
            let options =
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
            zip.start_file(name, options).map_err(archive_error)?;
            zip.write_all(content.as_bytes()).map_err(io_error)?;
        }

        let cursor = zip.finish().map_err(archive_error)?;
        Ok(cursor.into_inner())
    }

    fn extension(&self) -> &str {
        "docx"
    }
}
