//! Redaction modes and supporting types.
//!
//! A mode decides what replaces detected PII: a label or a mask run for
//! text, a blur or a solid fill for pixels, and what happens to a frame the
//! OCR engine could not read.

use serde::{Deserialize, Serialize};

/// Default label substituted for detected text spans.
pub const DEFAULT_LABEL: &str = "[DATA HIDDEN]";

/// Default character used by length-preserving masking.
pub const DEFAULT_MASK_CHAR: char = '*';

/// How a matched text span is replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskMode {
    /// Replace the whole span with a constant label.
    Label(String),

    /// Replace every character of the span with the mask character.
    PreserveLength(char),
}

impl MaskMode {
    pub fn label() -> Self {
        Self::Label(DEFAULT_LABEL.to_string())
    }

    pub fn preserve_length() -> Self {
        Self::PreserveLength(DEFAULT_MASK_CHAR)
    }

    /// Produces the replacement for a matched span.
    pub fn replacement(&self, matched: &str) -> String {
        match self {
            Self::Label(label) => label.clone(),
            Self::PreserveLength(mask) => {
                std::iter::repeat(*mask).take(matched.chars().count()).collect()
            }
        }
    }

    /// Every marker this mode can write for spans of up to 32 characters.
    pub fn marker_samples(&self) -> Vec<String> {
        match self {
            Self::Label(label) => vec![label.clone()],
            Self::PreserveLength(mask) => (1..=32).map(|n| mask.to_string().repeat(n)).collect(),
        }
    }
}

impl Default for MaskMode {
    fn default() -> Self {
        Self::label()
    }
}

/// How a pixel region is obscured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObscureMode {
    /// Gaussian blur with the given radius (sigma, in pixels).
    Blur { radius: f32 },

    /// Solid black rectangle.
    Fill,
}

impl Default for ObscureMode {
    fn default() -> Self {
        Self::Blur { radius: 5.0 }
    }
}

/// What replaces a frame whose text could not be extracted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameFallback {
    /// Keep the frame as it was.
    #[default]
    Original,

    /// Obscure the entire frame.
    BlurWhole,
}

/// Statistics about a redaction operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedactionResult {
    /// Number of spans or boxes redacted
    pub instances_redacted: usize,

    /// Units processed (paragraphs, pages, images or frames)
    pub units_processed: usize,

    /// Units with at least one redaction
    pub units_modified: usize,
}

impl RedactionResult {
    /// Creates a result indicating no redactions were needed.
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns true if any redactions were applied.
    pub fn has_redactions(&self) -> bool {
        self.instances_redacted > 0
    }

    /// Folds the statistics of one unit into the total.
    pub fn record_unit(&mut self, instances: usize) {
        self.units_processed += 1;
        if instances > 0 {
            self.units_modified += 1;
            self.instances_redacted += instances;
        }
    }
}
