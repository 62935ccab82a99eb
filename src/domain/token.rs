//! Positioned OCR tokens and pixel boxes.

/// Axis-aligned pixel rectangle with a top-left origin.
///
/// Coordinates come straight from the OCR engine and are not trusted: the
/// origin may be negative and the box may extend past the image. Clamping
/// happens where the box meets an actual image, in [`BoundingBox::clamp_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Grows the box by `padding` pixels on every side.
    pub fn inflate(&self, padding: u32) -> Self {
        let pad = i32::try_from(padding).unwrap_or(i32::MAX);
        Self {
            x: self.x.saturating_sub(pad),
            y: self.y.saturating_sub(pad),
            width: self.width.saturating_add(padding.saturating_mul(2)),
            height: self.height.saturating_add(padding.saturating_mul(2)),
        }
    }

    /// Intersects the box with an image of the given size.
    ///
    /// Returns `(x, y, width, height)` in image coordinates, or `None` when
    /// nothing of the box lies on the image.
    pub fn clamp_to(&self, image_width: u32, image_height: u32) -> Option<(u32, u32, u32, u32)> {
        let x0 = i64::from(self.x).max(0);
        let y0 = i64::from(self.y).max(0);
        let x1 = (i64::from(self.x) + i64::from(self.width)).min(i64::from(image_width));
        let y1 = (i64::from(self.y) + i64::from(self.height)).min(i64::from(image_height));

        if x1 <= x0 || y1 <= y0 {
            return None;
        }

        Some((x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32))
    }
}

/// A word recognised by OCR together with where it sits on the image.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken {
    pub text: String,
    pub bbox: BoundingBox,
    pub confidence: Option<f32>,
}

impl PositionedToken {
    pub fn new(text: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            text: text.into(),
            bbox,
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
