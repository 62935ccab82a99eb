//! Text redaction over ordered blocks.

use super::strategy::{MaskMode, RedactionResult};
use crate::domain::{PatternMatcher, PatternRegistry, RedactionSelection};
use crate::error::{RedactorError, RedactorResult};
use regex::Captures;
use std::sync::Arc;
use tracing::debug;

/// Output of a text redaction: the blocks plus statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextRedaction {
    pub blocks: Vec<String>,
    pub result: RedactionResult,
}

/// Replaces PII spans in text blocks.
///
/// Categories are applied one after another in selection order, each on the
/// output of the previous one, so overlapping matches from different
/// categories compose rather than compete.
#[derive(Debug, Clone)]
pub struct TextRedactor {
    registry: Arc<PatternRegistry>,
    mode: MaskMode,
}

impl TextRedactor {
    /// Creates a redactor, refusing markers that would themselves be
    /// detected as PII by `registry` (redacting twice must change nothing).
    pub fn new(registry: Arc<PatternRegistry>, mode: MaskMode) -> RedactorResult<Self> {
        for sample in mode.marker_samples() {
            if sample.trim().is_empty() {
                return Err(RedactorError::InvalidInput {
                    parameter: "marker".to_string(),
                    reason: "Redaction marker must not be blank".to_string(),
                });
            }
            if let Some(category) = registry.conflicting_category(&sample) {
                return Err(RedactorError::InvalidInput {
                    parameter: "marker".to_string(),
                    reason: format!(
                        "Marker '{}' would be detected as {}",
                        sample,
                        category.name()
                    ),
                });
            }
        }
        Ok(Self { registry, mode })
    }

    /// Redacts every block, preserving block count and order.
    pub fn redact(
        &self,
        blocks: &[String],
        selection: &RedactionSelection,
    ) -> TextRedaction {
        if selection.is_empty() {
            return TextRedaction {
                blocks: blocks.to_vec(),
                result: RedactionResult {
                    units_processed: blocks.len(),
                    ..Default::default()
                },
            };
        }

        let categories = self.registry.resolve(selection);
        let mut result = RedactionResult::none();
        let mut redacted = Vec::with_capacity(blocks.len());

        for (index, block) in blocks.iter().enumerate() {
            let mut text = block.clone();
            let mut instances = 0;

            for category in &categories {
                let found = category.text_pattern().find_iter(&text).count();
                if found == 0 {
                    continue;
                }
                instances += found;
                text = category
                    .text_pattern()
                    .replace_all(&text, |caps: &Captures| self.mode.replacement(&caps[0]))
                    .into_owned();
            }

            if instances > 0 {
                debug!(block = index, instances, "Redacted text block");
            }
            result.record_unit(instances);
            redacted.push(text);
        }

        TextRedaction {
            blocks: redacted,
            result,
        }
    }
}
