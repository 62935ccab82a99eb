//! Pattern-based PII redaction for documents, images and video frames.
//!
//! Text sources (plain text, DOCX paragraphs, PDF pages) are redacted by
//! substituting every matched span. Raster sources (images and decoded video
//! frames) go through OCR, and the boxes of words that match are blurred or
//! filled. Detection is purely pattern based.
//!
//! # Architecture
//!
//! - [`domain`]: PII categories, their patterns and the registry
//! - [`redaction`]: text, spatial and pixel redaction plus the service layer
//! - [`extract`]: format adapters and the OCR engine
//! - [`config`]: startup configuration
//! - [`error`]: error handling
//!
//! # Quick Start
//!
//! ```
//! use piimask::{RedactionSelection, RedactionService};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let service = RedactionService::with_defaults()?;
//! let masked = service.mask_text(
//!     &["Contact me at jane.doe@example.com or 9876543210".to_string()],
//!     &RedactionSelection::new(["Email", "PhoneNumber"]),
//! );
//! assert_eq!(masked.blocks[0], "Contact me at [DATA HIDDEN] or [DATA HIDDEN]");
//! # Ok(())
//! # }
//! ```
//!
//! # Limitations
//!
//! Image and video detection matches whole OCR words. A value the OCR engine
//! splits into several words, or misreads, is not detected.

pub mod config;
pub mod domain;
pub mod error;
pub mod extract;
pub mod redaction;

pub use config::MaskConfig;
pub use domain::{
    BoundingBox, BuiltinCategory, PatternMatcher, PatternRegistry, PiiCategory, PositionedToken,
    RedactionSelection,
};
pub use error::{RedactorError, RedactorResult};
pub use extract::{DocumentKind, OcrEngine, TesseractEngine};
pub use redaction::{
    CancellationToken, FrameFallback, FrameSequenceOutput, FrameSequencePipeline, ImageMasker,
    ImageRedaction, MaskMode, MaskedDocument, ObscureMode, RedactionResult, RedactionService,
    SpatialRedactor, TextRedaction, TextRedactor,
};
