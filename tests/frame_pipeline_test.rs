//! Integration tests for frame sequence masking.

mod common;

use common::*;
use piimask::config::ObscureSetting;
use piimask::extract::FrameDirectory;
use piimask::{
    BoundingBox, CancellationToken, FrameFallback, MaskConfig, RedactionSelection, RedactorError,
};
use tempfile::TempDir;

const EMAIL_BOX: BoundingBox = BoundingBox::new(8, 8, 16, 8);

fn fill_config(fallback: FrameFallback) -> MaskConfig {
    MaskConfig {
        obscure: ObscureSetting::Fill,
        frame_fallback: fallback,
        ..Default::default()
    }
}

/// Three frames; the email is on frames 1 and 3 and OCR fails on frame 2.
fn three_frame_ocr() -> ScriptedOcr {
    let email = vec![token(EMAIL, 8, 8, 16, 8), token("Hello", 30, 8, 10, 8)];
    ScriptedOcr::new()
        .on_frame(1, email.clone())
        .on_frame(3, email)
        .failing_on(2)
}

fn selection() -> RedactionSelection {
    RedactionSelection::new(["Email"])
}

#[test]
fn test_failed_frame_keeps_original_by_default() {
    let frames = frame_sequence(3, 48, 24);
    let service = service_with(three_frame_ocr(), &fill_config(FrameFallback::Original));

    let output = service.mask_video(&frames, &selection(), None).unwrap();

    assert_eq!(output.frames.len(), 3);
    assert_eq!(output.failed_frames, vec![1]);
    assert_eq!(output.boxes_found, 2);
    assert_eq!(output.result.units_processed, 3);
    assert_eq!(output.result.units_modified, 2);

    for index in [0, 2] {
        assert_region_changed(&frames[index], &output.frames[index], EMAIL_BOX);
        assert_outside_unchanged(&frames[index], &output.frames[index], EMAIL_BOX);
    }
    assert_same_pixels(&output.frames[1], &frames[1]);
}

#[test]
fn test_failed_frame_blurred_whole_when_configured() {
    let frames = frame_sequence(3, 48, 24);
    let service = service_with(three_frame_ocr(), &fill_config(FrameFallback::BlurWhole));

    let output = service.mask_video(&frames, &selection(), None).unwrap();

    assert_eq!(output.frames.len(), 3);
    assert_eq!(output.failed_frames, vec![1]);
    assert!(output.frames[1].pixels().all(|p| p.0 == [0, 0, 0, 255]));
    assert_region_changed(&frames[0], &output.frames[0], EMAIL_BOX);
    assert_region_changed(&frames[2], &output.frames[2], EMAIL_BOX);
}

#[test]
fn test_output_order_matches_input_order() {
    let frames = frame_sequence(24, 16, 16);
    let ocr = ScriptedOcr::new()
        .on_frame(5, vec![token(PHONE, 2, 2, 8, 8)])
        .on_frame(17, vec![token(PHONE, 2, 2, 8, 8)]);
    let service = service_with(ocr, &fill_config(FrameFallback::Original));

    let output = service
        .mask_video(&frames, &RedactionSelection::new(["PhoneNumber"]), None)
        .unwrap();

    assert_eq!(output.frames.len(), frames.len());
    for (index, frame) in output.frames.iter().enumerate() {
        assert_eq!(frame_id(frame), frame_id(&frames[index]));
        let expect_masked = matches!(frame_id(frame), 5 | 17);
        assert_eq!(
            frame.get_pixel(4, 4).0 == [0, 0, 0, 255],
            expect_masked,
            "frame {}",
            index
        );
    }
}

#[test]
fn test_sequential_run_matches_parallel_run() {
    let frames = frame_sequence(6, 32, 16);
    let ocr = ScriptedOcr::always(vec![token(EMAIL, 4, 4, 12, 6)]).failing_on(4);

    let parallel = service_with(ocr.clone(), &fill_config(FrameFallback::BlurWhole))
        .mask_video(&frames, &selection(), None)
        .unwrap();
    let sequential_config = MaskConfig {
        parallel_frames: false,
        ..fill_config(FrameFallback::BlurWhole)
    };
    let sequential = service_with(ocr, &sequential_config)
        .mask_video(&frames, &selection(), None)
        .unwrap();

    assert_eq!(parallel.frames, sequential.frames);
    assert_eq!(parallel.failed_frames, vec![3]);
    assert_eq!(sequential.failed_frames, vec![3]);
}

#[test]
fn test_empty_selection_returns_frames_unchanged() {
    let frames = frame_sequence(3, 16, 16);
    let service = service_with(three_frame_ocr(), &fill_config(FrameFallback::BlurWhole));

    let output = service
        .mask_video(&frames, &RedactionSelection::none(), None)
        .unwrap();

    assert_eq!(output.frames, frames);
    assert!(output.failed_frames.is_empty());
}

#[test]
fn test_empty_sequence() {
    let service = service_with(three_frame_ocr(), &MaskConfig::default());
    let output = service.mask_video(&[], &selection(), None).unwrap();
    assert!(output.frames.is_empty());
}

#[test]
fn test_cancellation_stops_the_run() {
    let frames = frame_sequence(3, 16, 16);
    let service = service_with(three_frame_ocr(), &MaskConfig::default());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = service
        .mask_video(&frames, &selection(), Some(&cancel))
        .unwrap_err();
    assert!(matches!(err, RedactorError::Cancelled { total: 3, .. }));
}

#[test]
fn test_cancellation_midway_reports_progress() {
    let frames = frame_sequence(5, 16, 16);
    let cancel = CancellationToken::new();
    let ocr = ScriptedOcr::always(vec![token(EMAIL, 2, 2, 8, 8)]).cancelling_on(2, cancel.clone());
    let config = MaskConfig {
        parallel_frames: false,
        ..Default::default()
    };
    let service = service_with(ocr, &config);

    let err = service
        .mask_video(&frames, &selection(), Some(&cancel))
        .unwrap_err();
    match err {
        RedactorError::Cancelled { completed, total } => {
            assert_eq!(completed, 2);
            assert_eq!(total, 5);
        }
        other => panic!("expected cancellation, got {:?}", other),
    }
}

#[test]
fn test_frame_directory_round_trip() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let frames = frame_sequence(3, 16, 16);
    for (index, frame) in frames.iter().enumerate() {
        frame
            .save(input.path().join(format!("{:05}.png", index + 1)))
            .unwrap();
    }
    std::fs::write(input.path().join("notes.txt"), "not a frame").unwrap();

    let (directory, loaded) = FrameDirectory::load(input.path()).unwrap();
    assert_eq!(directory.len(), 3);
    assert_eq!(loaded, frames);

    let service = service_with(three_frame_ocr(), &fill_config(FrameFallback::Original));
    let masked = service.mask_video(&loaded, &selection(), None).unwrap();
    directory.save(output.path(), &masked.frames).unwrap();

    for name in ["00001.png", "00002.png", "00003.png"] {
        assert!(output.path().join(name).exists(), "{} missing", name);
    }
    assert!(!output.path().join("notes.txt").exists());
}
