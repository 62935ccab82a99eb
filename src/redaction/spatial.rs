//! Selection of OCR token boxes that hold PII.
//!
//! Matching happens per token against the anchored token patterns. When the
//! OCR engine splits one value over several tokens ("jane.doe@" and
//! "example.com"), neither fragment matches and the value stays visible.
//! That gap is inherent to working from OCR segmentation and is reported to
//! users as a confidence caveat rather than papered over here.

use crate::domain::{BoundingBox, PatternMatcher, PatternRegistry, PositionedToken, RedactionSelection};
use std::sync::Arc;
use tracing::trace;

/// Caveat shown alongside image and video results.
pub const DETECTION_GAP_NOTICE: &str =
    "Detection works on whole OCR words: values the OCR engine splits or misreads may remain visible.";

/// Picks the boxes of tokens that match a selected category.
#[derive(Debug, Clone)]
pub struct SpatialRedactor {
    registry: Arc<PatternRegistry>,
}

impl SpatialRedactor {
    pub fn new(registry: Arc<PatternRegistry>) -> Self {
        Self { registry }
    }

    /// Returns one box per matching token, in token order, without
    /// duplicates.
    pub fn select_boxes(
        &self,
        tokens: &[PositionedToken],
        selection: &RedactionSelection,
    ) -> Vec<BoundingBox> {
        if selection.is_empty() {
            return Vec::new();
        }

        let categories = self.registry.resolve(selection);
        let mut boxes: Vec<BoundingBox> = Vec::new();

        for token in tokens.iter().filter(|t| !t.is_blank()) {
            let hit = categories.iter().find(|c| c.matches_token(&token.text));
            if let Some(category) = hit {
                trace!(category = category.name(), bbox = ?token.bbox, "Token matched");
                if !boxes.contains(&token.bbox) {
                    boxes.push(token.bbox);
                }
            }
        }

        boxes
    }
}
