//! Tests for error construction, display and classification.

use piimask::config::MaskModeSetting;
use piimask::{
    MaskConfig, MaskMode, ObscureMode, PatternRegistry, RedactionService, RedactorError,
    TesseractEngine, TextRedactor,
};
use std::error::Error;
use std::path::Path;
use std::sync::Arc;

#[test]
fn test_unknown_category_display() {
    let registry = PatternRegistry::builtin();
    let err = registry.lookup("Passport").unwrap_err();
    assert!(matches!(err, RedactorError::UnknownCategory { .. }));
    assert!(err.to_string().contains("Passport"));
}

#[test]
fn test_invalid_custom_pattern() {
    let mut registry = PatternRegistry::builtin();
    let err = registry.register("Broken", r"EMP-(\d{5}").unwrap_err();
    assert!(matches!(err, RedactorError::PatternError { .. }));

    let err = registry.register("Everything", r"\d*").unwrap_err();
    assert!(err.to_string().contains("empty string"));

    assert!(registry.register("  ", r"\d+").is_err());
}

#[test]
fn test_marker_that_looks_like_pii_is_rejected() {
    let registry = Arc::new(PatternRegistry::builtin());
    let err = TextRedactor::new(Arc::clone(&registry), MaskMode::Label("9876543210".into()))
        .unwrap_err();
    assert!(matches!(err, RedactorError::InvalidInput { .. }));
    assert!(err.to_string().contains("PhoneNumber"));

    assert!(TextRedactor::new(Arc::clone(&registry), MaskMode::Label(" ".into())).is_err());
    assert!(TextRedactor::new(registry, MaskMode::PreserveLength('#')).is_ok());
}

#[test]
fn test_custom_category_can_conflict_with_marker() {
    let config = MaskConfig {
        mask_mode: MaskModeSetting::PreserveLength,
        mask_char: 'X',
        custom_patterns: vec![piimask::config::CustomPattern {
            name: "Shouting".to_string(),
            pattern: "XXX+".to_string(),
        }],
        ..Default::default()
    };
    assert!(RedactionService::new(&config).is_err());
}

#[test]
fn test_invalid_blur_radius_is_rejected() {
    for radius in [0.0, -2.5, f32::INFINITY] {
        let config = MaskConfig {
            blur_radius: radius,
            ..Default::default()
        };
        let err = RedactionService::new(&config).err().expect("radius rejected");
        assert!(err.to_string().contains("blur_radius"), "{}", err);
    }
    assert!(piimask::ImageMasker::new(ObscureMode::Fill).is_ok());
}

#[test]
fn test_config_errors_name_the_file() {
    let err = MaskConfig::from_toml("mask_mode = \"sideways\"", Path::new("piimask.toml"))
        .unwrap_err();
    assert!(matches!(err, RedactorError::Config { .. }));
    assert!(err.to_string().contains("piimask.toml"));

    let err = MaskConfig::load(Path::new("/nonexistent/piimask.toml")).unwrap_err();
    assert!(matches!(err, RedactorError::Io { .. }));
    assert!(err.source().is_some());
}

#[test]
fn test_missing_tesseract_is_an_extraction_failure() {
    use piimask::OcrEngine;

    let engine = TesseractEngine::new("/nonexistent/bin/tesseract");
    let image = image::RgbaImage::new(4, 4);
    let err = engine.recognize(&image).unwrap_err();
    assert!(err.is_extraction_failure(), "{:?}", err);
}

#[test]
fn test_extraction_failure_classification() {
    let ocr = RedactorError::Ocr {
        reason: "no words".to_string(),
    };
    let extraction = RedactorError::TextExtraction {
        format: "PDF".to_string(),
        reason: "bad xref".to_string(),
    };
    let unsupported = RedactorError::UnsupportedFormat("movie.mp4".to_string());

    assert!(ocr.is_extraction_failure());
    assert!(extraction.is_extraction_failure());
    assert!(!unsupported.is_extraction_failure());
    assert!(extraction.to_string().contains("PDF"));
}

#[test]
fn test_cancelled_display() {
    let err = RedactorError::Cancelled {
        completed: 4,
        total: 10,
    };
    let message = err.to_string();
    assert!(message.contains('4') && message.contains("10"), "{}", message);
}
