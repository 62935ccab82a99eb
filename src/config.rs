//! Startup configuration.
//!
//! Everything the pipeline needs to know about its environment (where the
//! OCR binary lives, how strongly to blur, how to mark redacted text) comes
//! from a [`MaskConfig`], loaded from TOML or built from defaults.

use crate::domain::PatternRegistry;
use crate::error::{RedactorError, RedactorResult};
use crate::redaction::{FrameFallback, MaskMode, ObscureMode, DEFAULT_LABEL, DEFAULT_MASK_CHAR};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaskConfig {
    #[serde(default)]
    pub ocr: OcrConfig,

    #[serde(default = "default_blur_radius")]
    pub blur_radius: f32,

    #[serde(default)]
    pub mask_mode: MaskModeSetting,

    #[serde(default = "default_label")]
    pub label: String,

    #[serde(default = "default_mask_char")]
    pub mask_char: char,

    #[serde(default)]
    pub obscure: ObscureSetting,

    /// Extra pixels obscured around every OCR box
    #[serde(default)]
    pub box_padding: u32,

    #[serde(default)]
    pub frame_fallback: FrameFallback,

    #[serde(default = "default_parallel_frames")]
    pub parallel_frames: bool,

    #[serde(default)]
    pub custom_patterns: Vec<CustomPattern>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    #[serde(default = "default_ocr_binary")]
    pub binary_path: PathBuf,

    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaskModeSetting {
    #[default]
    Label,
    PreserveLength,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObscureSetting {
    #[default]
    Blur,
    Fill,
}

/// A user-defined category: a name and a substring regex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomPattern {
    pub name: String,
    pub pattern: String,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            ocr: OcrConfig::default(),
            blur_radius: default_blur_radius(),
            mask_mode: MaskModeSetting::default(),
            label: default_label(),
            mask_char: default_mask_char(),
            obscure: ObscureSetting::default(),
            box_padding: 0,
            frame_fallback: FrameFallback::default(),
            parallel_frames: default_parallel_frames(),
            custom_patterns: Vec::new(),
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            binary_path: default_ocr_binary(),
            language: None,
        }
    }
}

fn default_blur_radius() -> f32 {
    5.0
}

fn default_label() -> String {
    DEFAULT_LABEL.to_string()
}

fn default_mask_char() -> char {
    DEFAULT_MASK_CHAR
}

fn default_parallel_frames() -> bool {
    true
}

fn default_ocr_binary() -> PathBuf {
    PathBuf::from("tesseract")
}

impl MaskConfig {
    /// Loads configuration from a TOML file.
    pub fn load(path: &Path) -> RedactorResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| RedactorError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content, path)
    }

    /// Parses TOML content; `origin` only labels errors.
    pub fn from_toml(content: &str, origin: &Path) -> RedactorResult<Self> {
        toml::from_str(content).map_err(|e| RedactorError::Config {
            path: origin.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn mask_mode(&self) -> MaskMode {
        match self.mask_mode {
            MaskModeSetting::Label => MaskMode::Label(self.label.clone()),
            MaskModeSetting::PreserveLength => MaskMode::PreserveLength(self.mask_char),
        }
    }

    pub fn obscure_mode(&self) -> ObscureMode {
        match self.obscure {
            ObscureSetting::Blur => ObscureMode::Blur {
                radius: self.blur_radius,
            },
            ObscureSetting::Fill => ObscureMode::Fill,
        }
    }

    /// Built-in categories plus the configured custom ones.
    pub fn registry(&self) -> RedactorResult<PatternRegistry> {
        let mut registry = PatternRegistry::builtin();
        for custom in &self.custom_patterns {
            registry.register(&custom.name, &custom.pattern)?;
        }
        Ok(registry)
    }
}
