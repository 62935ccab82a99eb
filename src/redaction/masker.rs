//! Pixel-region obscuring on raster images.

use super::strategy::ObscureMode;
use crate::domain::BoundingBox;
use crate::error::{RedactorError, RedactorResult};
use image::{imageops, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use tracing::debug;

const FILL_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Obscures boxes on an image.
///
/// The masker never touches the caller's image: [`ImageMasker::apply`]
/// always works on and returns a copy. Boxes are clamped to the image and
/// boxes with no area left after clamping are skipped.
#[derive(Debug, Clone)]
pub struct ImageMasker {
    mode: ObscureMode,
    padding: u32,
}

impl ImageMasker {
    pub fn new(mode: ObscureMode) -> RedactorResult<Self> {
        if let ObscureMode::Blur { radius } = mode {
            if !radius.is_finite() || radius <= 0.0 {
                return Err(RedactorError::InvalidInput {
                    parameter: "blur_radius".to_string(),
                    reason: format!("Blur radius must be a positive number, got {}", radius),
                });
            }
        }
        Ok(Self { mode, padding: 0 })
    }

    /// Grows every box by `padding` pixels before obscuring it.
    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    /// Returns a copy of `image` with every box obscured.
    pub fn apply(&self, image: &RgbaImage, boxes: &[BoundingBox]) -> RgbaImage {
        let mut output = image.clone();
        let (width, height) = output.dimensions();

        for bbox in boxes {
            let Some((x, y, w, h)) = bbox.inflate(self.padding).clamp_to(width, height) else {
                debug!(?bbox, width, height, "Skipping box outside image");
                continue;
            };
            self.obscure_region(&mut output, x, y, w, h);
        }

        output
    }

    /// Returns a copy of `image` obscured from edge to edge.
    pub fn obscure_all(&self, image: &RgbaImage) -> RgbaImage {
        let (width, height) = image.dimensions();
        let whole = BoundingBox::new(0, 0, width, height);
        let mut output = image.clone();
        if let Some((x, y, w, h)) = whole.clamp_to(width, height) {
            self.obscure_region(&mut output, x, y, w, h);
        }
        output
    }

    fn obscure_region(&self, image: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32) {
        match self.mode {
            ObscureMode::Blur { radius } => {
                let region = imageops::crop_imm(&*image, x, y, w, h).to_image();
                let blurred = imageops::blur(&region, radius);
                imageops::replace(image, &blurred, i64::from(x), i64::from(y));
            }
            ObscureMode::Fill => {
                let rect = Rect::at(x as i32, y as i32).of_size(w, h);
                draw_filled_rect_mut(image, rect, FILL_COLOR);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageBuffer;

    fn striped(width: u32, height: u32) -> RgbaImage {
        ImageBuffer::from_fn(width, height, |x, _| {
            if x % 2 == 0 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 255])
            }
        })
    }

    #[test]
    fn test_rejects_non_positive_radius() {
        assert!(ImageMasker::new(ObscureMode::Blur { radius: 0.0 }).is_err());
        assert!(ImageMasker::new(ObscureMode::Blur { radius: -1.0 }).is_err());
        assert!(ImageMasker::new(ObscureMode::Blur { radius: f32::NAN }).is_err());
        assert!(ImageMasker::new(ObscureMode::Fill).is_ok());
    }

    #[test]
    fn test_fill_only_touches_box() {
        let image = RgbaImage::from_pixel(20, 20, Rgba([200, 10, 10, 255]));
        let masker = ImageMasker::new(ObscureMode::Fill).unwrap();
        let out = masker.apply(&image, &[BoundingBox::new(5, 5, 4, 4)]);

        assert_eq!(*out.get_pixel(6, 6), FILL_COLOR);
        assert_eq!(*out.get_pixel(4, 4), Rgba([200, 10, 10, 255]));
        assert_eq!(*out.get_pixel(9, 9), Rgba([200, 10, 10, 255]));
        assert_eq!(*image.get_pixel(6, 6), Rgba([200, 10, 10, 255]));
    }

    #[test]
    fn test_blur_changes_region() {
        let image = striped(40, 40);
        let masker = ImageMasker::new(ObscureMode::default()).unwrap();
        let out = masker.apply(&image, &[BoundingBox::new(10, 10, 20, 20)]);

        assert_ne!(out.get_pixel(20, 20), image.get_pixel(20, 20));
        assert_eq!(out.get_pixel(2, 2), image.get_pixel(2, 2));
        assert_eq!(out.get_pixel(35, 35), image.get_pixel(35, 35));
    }

    #[test]
    fn test_padding_grows_box() {
        let image = RgbaImage::from_pixel(20, 20, Rgba([255, 255, 255, 255]));
        let masker = ImageMasker::new(ObscureMode::Fill).unwrap().with_padding(2);
        let out = masker.apply(&image, &[BoundingBox::new(5, 5, 2, 2)]);
        assert_eq!(*out.get_pixel(3, 3), FILL_COLOR);
        assert_eq!(*out.get_pixel(2, 2), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_obscure_all() {
        let image = RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 255]));
        let masker = ImageMasker::new(ObscureMode::Fill).unwrap();
        let out = masker.obscure_all(&image);
        assert!(out.pixels().all(|p| *p == FILL_COLOR));
    }
}
