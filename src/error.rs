//! Error types for the PII masking library.
//!
//! Errors are grouped by where they arise: configuration and pattern
//! compilation happen once at startup, extraction and OCR failures happen at
//! the boundary of each modality, and the redaction logic itself only fails
//! on cancellation.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for masking operations.
pub type RedactorResult<T> = Result<T, RedactorError>;

/// Error type for all masking operations.
#[derive(Debug, Error)]
pub enum RedactorError {
    /// Error occurred while reading or writing files
    #[error("IO error for path '{}': {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    /// A category name that is not registered was selected
    #[error("Unknown PII category '{name}'")]
    UnknownCategory { name: String },

    /// Pattern matching or regex compilation error
    #[error("Pattern error for '{pattern}': {reason}")]
    PatternError { pattern: String, reason: String },

    /// Document text extraction failed
    #[error("Text extraction failed for {format}: {reason}")]
    TextExtraction { format: String, reason: String },

    /// The OCR engine failed or produced unreadable output
    #[error("OCR failed: {reason}")]
    Ocr { reason: String },

    /// Input has a format no extractor handles
    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    /// Invalid configuration or parameters
    #[error("Invalid input for '{parameter}': {reason}")]
    InvalidInput { parameter: String, reason: String },

    /// Configuration file could not be parsed
    #[error("Invalid configuration in '{}': {reason}", .path.display())]
    Config { path: PathBuf, reason: String },

    /// The caller cancelled a long-running operation
    #[error("Operation cancelled after {completed} of {total} frame(s)")]
    Cancelled { completed: usize, total: usize },

    /// Backend-specific error (image codec, PDF writer, archive, etc.)
    #[error("{backend} backend error: {message}")]
    BackendError {
        backend: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl RedactorError {
    /// Wraps a backend library error, keeping it as the error source.
    pub fn backend<E>(backend: &str, message: impl Into<String>, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::BackendError {
            backend: backend.to_string(),
            message: message.into(),
            source: Some(Box::new(err)),
        }
    }

    /// Returns true for failures that happen while reading a source
    /// (document parsing or OCR) rather than while redacting it.
    pub fn is_extraction_failure(&self) -> bool {
        matches!(self, Self::TextExtraction { .. } | Self::Ocr { .. })
    }
}

impl From<regex::Error> for RedactorError {
    fn from(err: regex::Error) -> Self {
        Self::PatternError {
            pattern: "<unknown>".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<image::ImageError> for RedactorError {
    fn from(err: image::ImageError) -> Self {
        Self::backend("image", err.to_string(), err)
    }
}
