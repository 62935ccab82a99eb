//! Redaction components and the service that wires them together.
//!
//! [`RedactionService`] is the entry point for callers. It owns one of each
//! component, built from a [`MaskConfig`], and exposes one operation per
//! source modality. The service holds no per-request state and can be shared
//! across threads.

pub mod frames;
pub mod masker;
pub mod spatial;
pub mod strategy;
pub mod text;

pub use frames::{CancellationToken, FrameSequenceOutput, FrameSequencePipeline};
pub use masker::ImageMasker;
pub use spatial::{SpatialRedactor, DETECTION_GAP_NOTICE};
pub use strategy::{
    FrameFallback, MaskMode, ObscureMode, RedactionResult, DEFAULT_LABEL, DEFAULT_MASK_CHAR,
};
pub use text::{TextRedaction, TextRedactor};

use crate::config::MaskConfig;
use crate::domain::{BoundingBox, PatternRegistry, RedactionSelection};
use crate::error::RedactorResult;
use crate::extract::{self, DocumentKind, OcrEngine, TesseractEngine};
use image::RgbaImage;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A masked image and the boxes that were obscured on it.
#[derive(Debug, Clone)]
pub struct ImageRedaction {
    pub image: RgbaImage,
    pub boxes: Vec<BoundingBox>,

    /// False when OCR failed or found no words; the image is then returned untouched
    pub text_extracted: bool,
}

/// A masked document, re-encoded in its source format.
#[derive(Debug, Clone, Default)]
pub struct MaskedDocument {
    pub bytes: Vec<u8>,

    /// Redacted text units (empty for images)
    pub blocks: Vec<String>,

    /// Boxes obscured (images only)
    pub boxes: Vec<BoundingBox>,

    pub result: RedactionResult,

    /// False when nothing could be extracted from the source
    pub text_extracted: bool,
}

impl MaskedDocument {
    fn nothing_extracted() -> Self {
        Self::default()
    }
}

/// Redaction service coordinating extraction, detection and masking.
pub struct RedactionService {
    registry: Arc<PatternRegistry>,
    text: TextRedactor,
    spatial: SpatialRedactor,
    frames: FrameSequencePipeline,
    masker: ImageMasker,
    ocr: Arc<dyn OcrEngine>,
}

impl RedactionService {
    /// Creates a service that runs OCR through tesseract as configured.
    pub fn new(config: &MaskConfig) -> RedactorResult<Self> {
        let mut engine = TesseractEngine::new(&config.ocr.binary_path);
        if let Some(language) = &config.ocr.language {
            engine = engine.with_language(language.clone());
        }
        Self::with_ocr(config, Arc::new(engine))
    }

    /// Creates a service with the default configuration.
    pub fn with_defaults() -> RedactorResult<Self> {
        Self::new(&MaskConfig::default())
    }

    /// Creates a service around a caller-supplied OCR engine.
    pub fn with_ocr(config: &MaskConfig, ocr: Arc<dyn OcrEngine>) -> RedactorResult<Self> {
        let registry = Arc::new(config.registry()?);
        let text = TextRedactor::new(Arc::clone(&registry), config.mask_mode())?;
        let spatial = SpatialRedactor::new(Arc::clone(&registry));
        let masker = ImageMasker::new(config.obscure_mode())?.with_padding(config.box_padding);
        let frames = FrameSequencePipeline::new(Arc::clone(&ocr), spatial.clone(), masker.clone())
            .with_fallback(config.frame_fallback)
            .with_parallelism(config.parallel_frames);

        Ok(Self {
            registry,
            text,
            spatial,
            frames,
            masker,
            ocr,
        })
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    /// Redacts text units in place of their originals.
    pub fn mask_text(&self, blocks: &[String], selection: &RedactionSelection) -> TextRedaction {
        self.text.redact(blocks, selection)
    }

    /// Runs OCR on an image and obscures the words that match.
    ///
    /// OCR failure is not an error here: the image comes back unchanged
    /// with `text_extracted` unset and the caller decides what to tell the
    /// user. An image with no recognised words is treated the same way.
    pub fn mask_image(&self, image: &RgbaImage, selection: &RedactionSelection) -> ImageRedaction {
        if selection.is_empty() {
            return ImageRedaction {
                image: image.clone(),
                boxes: Vec::new(),
                text_extracted: true,
            };
        }

        let unchanged = || ImageRedaction {
            image: image.clone(),
            boxes: Vec::new(),
            text_extracted: false,
        };
        let tokens = match self.ocr.recognize(image) {
            Ok(tokens) => tokens,
            Err(err) => {
                warn!(engine = self.ocr.name(), error = %err, "No text extracted from image");
                return unchanged();
            }
        };
        if tokens.iter().all(|t| t.is_blank()) {
            warn!(engine = self.ocr.name(), "OCR found no words in image");
            return unchanged();
        }

        let boxes = self.spatial.select_boxes(&tokens, selection);
        info!(words = tokens.len(), boxes = boxes.len(), "Image scanned");
        ImageRedaction {
            image: self.masker.apply(image, &boxes),
            boxes,
            text_extracted: true,
        }
    }

    /// Redacts an ordered frame sequence, one output frame per input frame.
    pub fn mask_video(
        &self,
        frames: &[RgbaImage],
        selection: &RedactionSelection,
        cancel: Option<&CancellationToken>,
    ) -> RedactorResult<FrameSequenceOutput> {
        self.frames.process(frames, selection, cancel)
    }

    /// Extracts text units from a document without redacting them.
    pub fn extract_blocks(&self, bytes: &[u8], kind: DocumentKind) -> RedactorResult<Vec<String>> {
        match kind.extractor() {
            Some(extractor) => {
                let blocks = extractor.extract(bytes)?;
                debug!(extractor = extractor.name(), units = blocks.len(), "Text extracted");
                Ok(blocks)
            }
            None => {
                let image = extract::decode_image(bytes)?;
                let tokens = self.ocr.recognize(&image)?;
                Ok(vec![extract::ocr::tokens_to_text(&tokens)])
            }
        }
    }

    /// Extracts, redacts and re-encodes a whole document.
    ///
    /// An empty selection returns the input bytes untouched, except that an
    /// image is transcoded when `kind` names another image format. Extraction
    /// failures come back as a document with `text_extracted` unset rather
    /// than as an error.
    pub fn mask_document(
        &self,
        bytes: &[u8],
        kind: DocumentKind,
        selection: &RedactionSelection,
    ) -> RedactorResult<MaskedDocument> {
        if selection.is_empty() {
            let bytes = match kind {
                DocumentKind::Image(format) if image::guess_format(bytes).ok() != Some(format) => {
                    extract::encode_image(&extract::decode_image(bytes)?, format)?
                }
                _ => bytes.to_vec(),
            };
            return Ok(MaskedDocument {
                bytes,
                text_extracted: true,
                ..Default::default()
            });
        }

        if let DocumentKind::Image(format) = kind {
            let image = extract::decode_image(bytes)?;
            let masked = self.mask_image(&image, selection);
            if !masked.text_extracted {
                return Ok(MaskedDocument::nothing_extracted());
            }
            let mut result = RedactionResult::none();
            result.record_unit(masked.boxes.len());
            return Ok(MaskedDocument {
                bytes: extract::encode_image(&masked.image, format)?,
                blocks: Vec::new(),
                boxes: masked.boxes,
                result,
                text_extracted: true,
            });
        }

        let blocks = match self.extract_blocks(bytes, kind) {
            Ok(blocks) => blocks,
            Err(err) if err.is_extraction_failure() => {
                warn!(error = %err, "No text extracted from document");
                return Ok(MaskedDocument::nothing_extracted());
            }
            Err(err) => return Err(err),
        };
        if blocks.iter().all(|b| b.trim().is_empty()) {
            warn!("Document contains no text");
            return Ok(MaskedDocument::nothing_extracted());
        }

        let redaction = self.mask_text(&blocks, selection);
        let bytes = match kind.writer() {
            Some(writer) => writer.write(&redaction.blocks)?,
            None => Vec::new(),
        };

        Ok(MaskedDocument {
            bytes,
            blocks: redaction.blocks,
            boxes: Vec::new(),
            result: redaction.result,
            text_extracted: true,
        })
    }
}
