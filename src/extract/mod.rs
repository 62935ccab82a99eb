//! Adapters between file formats and text units.
//!
//! Nothing in here makes redaction decisions. Extractors turn a source into
//! ordered text units, writers turn units back into a file, and the OCR
//! engine turns pixels into positioned words.

pub mod docx;
pub mod frames;
pub mod ocr;
pub mod pdf;

pub use docx::{DocxExtractor, DocxWriter};
pub use frames::FrameDirectory;
pub use ocr::{OcrEngine, TesseractEngine};
pub use pdf::{PdfExtractor, PdfWriter};

use crate::error::{RedactorError, RedactorResult};
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;

/// Produces ordered text units from a document.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> RedactorResult<Vec<String>>;

    fn name(&self) -> &str;
}

/// Encodes ordered text units as a document.
pub trait DocumentWriter: Send + Sync {
    fn write(&self, blocks: &[String]) -> RedactorResult<Vec<u8>>;

    /// File extension of the produced format.
    fn extension(&self) -> &str;
}

/// Plain UTF-8 text; units are paragraphs separated by blank lines.
#[derive(Debug, Clone, Default)]
pub struct PlainText;

impl TextExtractor for PlainText {
    fn extract(&self, bytes: &[u8]) -> RedactorResult<Vec<String>> {
        let text = std::str::from_utf8(bytes).map_err(|e| RedactorError::TextExtraction {
            format: "text".to_string(),
            reason: e.to_string(),
        })?;
        let normalized = text.replace("\r\n", "\n");
        Ok(normalized.split("\n\n").map(str::to_string).collect())
    }

    fn name(&self) -> &str {
        "text"
    }
}

impl DocumentWriter for PlainText {
    fn write(&self, blocks: &[String]) -> RedactorResult<Vec<u8>> {
        Ok(blocks.join("\n\n").into_bytes())
    }

    fn extension(&self) -> &str {
        "txt"
    }
}

/// Input categories, each with its own redaction path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Docx,
    Pdf,
    Image(ImageFormat),
}

impl DocumentKind {
    /// Picks the kind from a file extension.
    pub fn from_path(path: &Path) -> RedactorResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| RedactorError::UnsupportedFormat(path.display().to_string()))?;

        match extension.as_str() {
            "txt" | "text" | "md" | "csv" | "log" => Ok(Self::PlainText),
            "docx" => Ok(Self::Docx),
            "pdf" => Ok(Self::Pdf),
            "png" => Ok(Self::Image(ImageFormat::Png)),
            "jpg" | "jpeg" => Ok(Self::Image(ImageFormat::Jpeg)),
            "bmp" => Ok(Self::Image(ImageFormat::Bmp)),
            "tif" | "tiff" => Ok(Self::Image(ImageFormat::Tiff)),
            _ => Err(RedactorError::UnsupportedFormat(format!(
                "'.{}' ({})",
                extension,
                path.display()
            ))),
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image(_))
    }

    /// Extractor for text kinds; images go through OCR instead.
    pub fn extractor(&self) -> Option<Box<dyn TextExtractor>> {
        match self {
            Self::PlainText => Some(Box::new(PlainText)),
            Self::Docx => Some(Box::new(DocxExtractor)),
            Self::Pdf => Some(Box::new(PdfExtractor)),
            Self::Image(_) => None,
        }
    }

    pub fn writer(&self) -> Option<Box<dyn DocumentWriter>> {
        match self {
            Self::PlainText => Some(Box::new(PlainText)),
            Self::Docx => Some(Box::new(DocxWriter)),
            Self::Pdf => Some(Box::new(PdfWriter::default())),
            Self::Image(_) => None,
        }
    }
}

/// Decodes any supported raster format into RGBA.
pub fn decode_image(bytes: &[u8]) -> RedactorResult<RgbaImage> {
    Ok(image::load_from_memory(bytes)?.to_rgba8())
}

/// Encodes an RGBA image; formats without alpha get an RGB copy.
pub fn encode_image(image: &RgbaImage, format: ImageFormat) -> RedactorResult<Vec<u8>> {
    let dynamic = match format {
        ImageFormat::Jpeg | ImageFormat::Bmp => {
            DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(image.clone()).to_rgb8())
        }
        _ => DynamicImage::ImageRgba8(image.clone()),
    };
    let mut buffer = Cursor::new(Vec::new());
    dynamic.write_to(&mut buffer, format)?;
    Ok(buffer.into_inner())
}
