//! OCR engines producing word-level positioned tokens.
//!
//! The engine is a black box to the rest of the crate: an image goes in, a
//! list of words with pixel boxes comes out. [`TesseractEngine`] drives the
//! `tesseract` command line tool in TSV mode.

use crate::domain::{BoundingBox, PositionedToken};
use crate::error::{RedactorError, RedactorResult};
use image::{ImageFormat, RgbaImage};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Recognises words on an image.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &RgbaImage) -> RedactorResult<Vec<PositionedToken>>;

    /// Returns a human-readable name for this engine.
    fn name(&self) -> &str;
}

/// Joins recognised words into a single text unit.
pub fn tokens_to_text(tokens: &[PositionedToken]) -> String {
    tokens
        .iter()
        .filter(|t| !t.is_blank())
        .map(|t| t.text.trim())
        .collect::<Vec<_>>()
        .join(" ")
}

/// OCR through the tesseract command line tool.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    binary: PathBuf,
    language: Option<String>,
}

impl TesseractEngine {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            language: None,
        }
    }

    /// Sets the tesseract language pack (`-l`), e.g. `eng` or `eng+hin`.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    fn run(&self, image_path: &Path) -> RedactorResult<String> {
        let mut command = Command::new(&self.binary);
        command.arg(image_path).arg("stdout");
        if let Some(language) = &self.language {
            command.arg("-l").arg(language);
        }
        command.arg("tsv");

        let output = command.output().map_err(|e| RedactorError::Ocr {
            reason: format!("failed to run '{}': {}", self.binary.display(), e),
        })?;

        if !output.status.success() {
            return Err(RedactorError::Ocr {
                reason: format!(
                    "'{}' exited with {}: {}",
                    self.binary.display(),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &RgbaImage) -> RedactorResult<Vec<PositionedToken>> {
        // Removed when dropped, on success and on every error path.
        let scratch = tempfile::Builder::new()
            .prefix("piimask-ocr-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| RedactorError::Io {
                path: std::env::temp_dir(),
                source: e,
            })?;

        image.save_with_format(scratch.path(), ImageFormat::Png)?;
        let tsv = self.run(scratch.path())?;
        let tokens = parse_tsv(&tsv)?;
        debug!(words = tokens.len(), "Tesseract recognised words");
        Ok(tokens)
    }

    fn name(&self) -> &str {
        "tesseract"
    }
}

/// Word rows in tesseract's TSV output have level 5.
const WORD_LEVEL: &str = "5";

/// Parses tesseract TSV output into word tokens.
///
/// Columns: level, page_num, block_num, par_num, line_num, word_num, left,
/// top, width, height, conf, text.
pub fn parse_tsv(tsv: &str) -> RedactorResult<Vec<PositionedToken>> {
    let mut tokens = Vec::new();

    for (line_no, line) in tsv.lines().enumerate() {
        if line_no == 0 && line.starts_with("level") {
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        let columns: Vec<&str> = line.splitn(12, '\t').collect();
        if columns.len() < 11 {
            return Err(RedactorError::Ocr {
                reason: format!("malformed TSV row {}: '{}'", line_no + 1, line),
            });
        }
        if columns[0] != WORD_LEVEL {
            continue;
        }

        let text = columns.get(11).copied().unwrap_or_default();
        if text.trim().is_empty() {
            continue;
        }

        let number = |index: usize| -> RedactorResult<i64> {
            columns[index].trim().parse::<i64>().map_err(|e| RedactorError::Ocr {
                reason: format!("bad value in TSV row {} column {}: {}", line_no + 1, index + 1, e),
            })
        };

        let bbox = BoundingBox::new(
            clamp_i32(number(6)?),
            clamp_i32(number(7)?),
            clamp_u32(number(8)?),
            clamp_u32(number(9)?),
        );

        let mut token = PositionedToken::new(text, bbox);
        if let Ok(confidence) = columns[10].trim().parse::<f32>() {
            if confidence >= 0.0 {
                token = token.with_confidence(confidence);
            }
        }
        tokens.push(token);
    }

    Ok(tokens)
}

fn clamp_i32(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

fn clamp_u32(value: i64) -> u32 {
    value.clamp(0, i64::from(u32::MAX)) as u32
}
