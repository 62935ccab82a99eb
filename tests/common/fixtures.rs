//! Test fixtures, fake OCR engines and document builders.
//!
//! Raster tests never shell out to tesseract. Frames carry their own id in
//! the red channel of pixel (0, 0), which [`ScriptedOcr`] reads to decide
//! which words to report for that frame.

use image::{ImageBuffer, Rgba, RgbaImage};
use piimask::{
    BoundingBox, CancellationToken, DocumentKind, MaskConfig, OcrEngine, PositionedToken, RedactorError,
    RedactorResult, RedactionService,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// The canonical sentence used across text tests.
pub const CONTACT_LINE: &str = "Contact me at jane.doe@example.com or 9876543210";

pub const EMAIL: &str = "jane.doe@example.com";
pub const PHONE: &str = "9876543210";

/// OCR engine answering from a script keyed on the frame id.
///
/// # Example
///
/// ```no_run
/// let ocr = ScriptedOcr::new()
///     .on_frame(1, vec![token("jane.doe@example.com", 0, 0, 8, 4)])
///     .failing_on(2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedOcr {
    by_frame: HashMap<u8, Vec<PositionedToken>>,
    fallback: Vec<PositionedToken>,
    failing: Vec<u8>,
    cancel_on: Option<(u8, CancellationToken)>,
}

impl ScriptedOcr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports the same tokens for every image.
    pub fn always(tokens: Vec<PositionedToken>) -> Self {
        Self {
            fallback: tokens,
            ..Self::default()
        }
    }

    pub fn on_frame(mut self, id: u8, tokens: Vec<PositionedToken>) -> Self {
        self.by_frame.insert(id, tokens);
        self
    }

    pub fn failing_on(mut self, id: u8) -> Self {
        self.failing.push(id);
        self
    }

    /// Cancels `token` while reading frame `id`, as a user would mid-run.
    pub fn cancelling_on(mut self, id: u8, token: CancellationToken) -> Self {
        self.cancel_on = Some((id, token));
        self
    }
}

impl OcrEngine for ScriptedOcr {
    fn recognize(&self, image: &RgbaImage) -> RedactorResult<Vec<PositionedToken>> {
        let id = frame_id(image);
        if let Some((cancel_id, token)) = &self.cancel_on {
            if *cancel_id == id {
                token.cancel();
            }
        }
        if self.failing.contains(&id) {
            return Err(RedactorError::Ocr {
                reason: format!("scripted failure on frame {}", id),
            });
        }
        Ok(self
            .by_frame
            .get(&id)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone()))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Shorthand for a positioned token.
pub fn token(text: &str, x: i32, y: i32, width: u32, height: u32) -> PositionedToken {
    PositionedToken::new(text, BoundingBox::new(x, y, width, height))
}

/// Builds a service around a scripted OCR engine.
pub fn service_with(ocr: ScriptedOcr, config: &MaskConfig) -> RedactionService {
    RedactionService::with_ocr(config, Arc::new(ocr)).expect("Valid test configuration")
}

/// Reads the id a frame was built with.
pub fn frame_id(image: &RgbaImage) -> u8 {
    image.get_pixel(0, 0)[0]
}

/// A frame of alternating black and white columns, tagged with `id`.
///
/// Stripes make blurring visible: every pixel of a blurred region moves
/// towards grey.
pub fn striped_frame(id: u8, width: u32, height: u32) -> RgbaImage {
    let mut image: RgbaImage = ImageBuffer::from_fn(width, height, |x, _| {
        if x % 2 == 0 {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 0, 255])
        }
    });
    image.put_pixel(0, 0, Rgba([id, 255, 255, 255]));
    image
}

/// A sequence of striped frames with ids starting at 1.
pub fn frame_sequence(count: u8, width: u32, height: u32) -> Vec<RgbaImage> {
    (1..=count)
        .map(|id| striped_frame(id, width, height))
        .collect()
}

/// Builder for test documents in any text format.
#[derive(Debug, Clone, Default)]
pub struct TestDocumentBuilder {
    paragraphs: Vec<String>,
}

impl TestDocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_paragraph(mut self, text: &str) -> Self {
        self.paragraphs.push(text.to_string());
        self
    }

    pub fn with_email(self, email: &str) -> Self {
        self.with_paragraph(&format!("Reach me at {}", email))
    }

    pub fn with_phone(self, phone: &str) -> Self {
        self.with_paragraph(&format!("Call {} after six", phone))
    }

    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }

    /// Encodes the document in `kind` and returns the bytes.
    pub fn to_bytes(&self, kind: DocumentKind) -> Vec<u8> {
        kind.writer()
            .expect("Text document kind")
            .write(&self.paragraphs)
            .expect("Writable test document")
    }

    /// Writes the document to `path`, picking the format from the extension.
    pub fn build(&self, path: &Path) -> anyhow::Result<()> {
        let kind = DocumentKind::from_path(path)?;
        std::fs::write(path, self.to_bytes(kind))?;
        Ok(())
    }
}
