//! Redaction of ordered frame sequences (decoded video).
//!
//! Every frame goes through OCR, box selection and masking on its own; no
//! state carries over between frames, so a value detected in one frame and
//! missed in the next will flicker. Frames run in parallel and come back in
//! input order.

use super::masker::ImageMasker;
use super::spatial::SpatialRedactor;
use super::strategy::{FrameFallback, RedactionResult};
use crate::domain::RedactionSelection;
use crate::error::{RedactorError, RedactorResult};
use crate::extract::OcrEngine;
use image::RgbaImage;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Cooperative cancellation flag, checked before each frame.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Redacted frames plus what happened along the way.
#[derive(Debug, Clone, Default)]
pub struct FrameSequenceOutput {
    pub frames: Vec<RgbaImage>,

    /// Indices of frames that could not be read and got the fallback
    pub failed_frames: Vec<usize>,

    /// Boxes obscured across all frames
    pub boxes_found: usize,

    pub result: RedactionResult,
}

struct FrameOutcome {
    frame: RgbaImage,
    boxes: usize,
    failed: bool,
}

/// Applies OCR, box selection and masking to every frame of a sequence.
pub struct FrameSequencePipeline {
    ocr: Arc<dyn OcrEngine>,
    spatial: SpatialRedactor,
    masker: ImageMasker,
    fallback: FrameFallback,
    parallel: bool,
}

impl FrameSequencePipeline {
    pub fn new(ocr: Arc<dyn OcrEngine>, spatial: SpatialRedactor, masker: ImageMasker) -> Self {
        Self {
            ocr,
            spatial,
            masker,
            fallback: FrameFallback::default(),
            parallel: true,
        }
    }

    pub fn with_fallback(mut self, fallback: FrameFallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Runs frames one at a time instead of on the rayon pool.
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Redacts every frame, one output frame per input frame, in order.
    ///
    /// A frame whose OCR fails does not stop the sequence; it is replaced
    /// according to the fallback policy and its index is reported. Only
    /// cancellation aborts the whole run.
    pub fn process(
        &self,
        frames: &[RgbaImage],
        selection: &RedactionSelection,
        cancel: Option<&CancellationToken>,
    ) -> RedactorResult<FrameSequenceOutput> {
        if selection.is_empty() {
            return Ok(FrameSequenceOutput {
                frames: frames.to_vec(),
                result: RedactionResult {
                    units_processed: frames.len(),
                    ..Default::default()
                },
                ..Default::default()
            });
        }

        let total = frames.len();
        let completed = AtomicUsize::new(0);

        let run = |index: usize, frame: &RgbaImage| -> RedactorResult<FrameOutcome> {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                return Err(RedactorError::Cancelled {
                    completed: completed.load(Ordering::SeqCst),
                    total,
                });
            }
            let outcome = self.process_frame(index, frame, selection);
            completed.fetch_add(1, Ordering::SeqCst);
            Ok(outcome)
        };

        let outcomes: Vec<FrameOutcome> = if self.parallel {
            frames
                .par_iter()
                .enumerate()
                .map(|(index, frame)| run(index, frame))
                .collect::<RedactorResult<Vec<_>>>()?
        } else {
            frames
                .iter()
                .enumerate()
                .map(|(index, frame)| run(index, frame))
                .collect::<RedactorResult<Vec<_>>>()?
        };

        let mut output = FrameSequenceOutput {
            frames: Vec::with_capacity(total),
            ..Default::default()
        };
        for (index, outcome) in outcomes.into_iter().enumerate() {
            if outcome.failed {
                output.failed_frames.push(index);
            }
            output.boxes_found += outcome.boxes;
            output.result.record_unit(outcome.boxes);
            output.frames.push(outcome.frame);
        }

        info!(
            frames = total,
            boxes = output.boxes_found,
            failed = output.failed_frames.len(),
            "Frame sequence redacted"
        );
        Ok(output)
    }

    fn process_frame(
        &self,
        index: usize,
        frame: &RgbaImage,
        selection: &RedactionSelection,
    ) -> FrameOutcome {
        match self.ocr.recognize(frame) {
            Ok(tokens) => {
                let boxes = self.spatial.select_boxes(&tokens, selection);
                debug!(frame = index, words = tokens.len(), boxes = boxes.len(), "Frame scanned");
                FrameOutcome {
                    frame: self.masker.apply(frame, &boxes),
                    boxes: boxes.len(),
                    failed: false,
                }
            }
            Err(err) => {
                warn!(frame = index, error = %err, fallback = ?self.fallback, "Frame extraction failed");
                let frame = match self.fallback {
                    FrameFallback::Original => frame.clone(),
                    FrameFallback::BlurWhole => self.masker.obscure_all(frame),
                };
                FrameOutcome {
                    frame,
                    boxes: 0,
                    failed: true,
                }
            }
        }
    }
}
