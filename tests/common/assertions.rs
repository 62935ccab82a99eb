//! Custom assertions for masking tests.
//!
//! Provides domain-specific assertions that make tests more readable
//! and provide better error messages.

use image::RgbaImage;
use piimask::{BoundingBox, DocumentKind, PatternMatcher, PatternRegistry, RedactionSelection};
use std::path::Path;

/// Asserts that no selected category still matches anywhere in `blocks`.
///
/// # Panics
/// Panics with the offending unit and category on the first leftover match.
pub fn assert_no_pii(blocks: &[String], registry: &PatternRegistry, selection: &RedactionSelection) {
    for category in registry.resolve(selection) {
        for (index, block) in blocks.iter().enumerate() {
            let leftovers = category.extract_all(block);
            assert!(
                leftovers.is_empty(),
                "{} still present in unit {}: {:?}\nUnit text: {}",
                category.name(),
                index,
                leftovers,
                block
            );
        }
    }
}

/// Asserts that two images are pixel-identical.
pub fn assert_same_pixels(actual: &RgbaImage, expected: &RgbaImage) {
    assert_eq!(
        actual.dimensions(),
        expected.dimensions(),
        "Image dimensions differ"
    );
    let differing = actual
        .pixels()
        .zip(expected.pixels())
        .filter(|(a, b)| a != b)
        .count();
    assert_eq!(differing, 0, "{} pixel(s) differ", differing);
}

/// Asserts that at least one pixel inside `bbox` changed.
pub fn assert_region_changed(original: &RgbaImage, masked: &RgbaImage, bbox: BoundingBox) {
    assert!(
        count_changed(original, masked, bbox) > 0,
        "Region {:?} should be obscured but is unchanged",
        bbox
    );
}

/// Asserts that every pixel outside `bbox` is untouched.
pub fn assert_outside_unchanged(original: &RgbaImage, masked: &RgbaImage, bbox: BoundingBox) {
    for (x, y, pixel) in masked.enumerate_pixels() {
        if inside(bbox, x, y) {
            continue;
        }
        assert_eq!(
            pixel,
            original.get_pixel(x, y),
            "Pixel ({}, {}) outside {:?} changed",
            x,
            y,
            bbox
        );
    }
}

/// Asserts that `pattern` is absent from the text of a written document.
pub fn assert_redacted(path: &Path, pattern: &str) {
    let text = extract_text_or_panic(path);
    assert!(
        !text.contains(pattern),
        "Pattern '{}' should be masked but was found in '{}'",
        pattern,
        path.display()
    );
}

/// Asserts that `pattern` survives in the text of a written document.
pub fn assert_preserved(path: &Path, pattern: &str) {
    let text = extract_text_or_panic(path);
    assert!(
        text.contains(pattern),
        "Pattern '{}' should be preserved but was not found in '{}'",
        pattern,
        path.display()
    );
}

fn extract_text_or_panic(path: &Path) -> String {
    let kind = DocumentKind::from_path(path)
        .unwrap_or_else(|e| panic!("Unsupported test file '{}': {}", path.display(), e));
    let bytes = std::fs::read(path)
        .unwrap_or_else(|e| panic!("Failed to read '{}': {}", path.display(), e));
    kind.extractor()
        .unwrap_or_else(|| panic!("'{}' is not a text document", path.display()))
        .extract(&bytes)
        .unwrap_or_else(|e| panic!("Failed to extract '{}': {}", path.display(), e))
        .join("\n")
}

fn count_changed(original: &RgbaImage, masked: &RgbaImage, bbox: BoundingBox) -> usize {
    masked
        .enumerate_pixels()
        .filter(|(x, y, _)| inside(bbox, *x, *y))
        .filter(|(x, y, pixel)| *pixel != original.get_pixel(*x, *y))
        .count()
}

fn inside(bbox: BoundingBox, x: u32, y: u32) -> bool {
    let (x, y) = (i64::from(x), i64::from(y));
    x >= i64::from(bbox.x)
        && y >= i64::from(bbox.y)
        && x < i64::from(bbox.x) + i64::from(bbox.width)
        && y < i64::from(bbox.y) + i64::from(bbox.height)
}
