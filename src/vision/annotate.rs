//! Frame annotation helpers
//!
//! Pixel-level drawing happens here (the barcode bounding box is burned into
//! the frame, like the source feed would show it); text overlays are painted
//! on top by the shell, which knows the display font.

use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect as PixelRect;

use crate::geometry::Rect;

/// Box color for detected barcodes.
pub const BARCODE_BOX: Rgb<u8> = Rgb([0, 255, 0]);

/// Draw the barcode bounding box into the frame. Degenerate boxes (zero
/// width or height) are skipped.
pub fn draw_barcode_box(image: &mut RgbImage, bounds: Rect) {
    if bounds.width() <= 0 || bounds.height() <= 0 {
        return;
    }
    draw_hollow_rect_mut(
        image,
        PixelRect::at(bounds.left, bounds.top)
            .of_size(bounds.width() as u32, bounds.height() as u32),
        BARCODE_BOX,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draws_box_outline() {
        let mut image = RgbImage::new(64, 64);
        draw_barcode_box(&mut image, Rect::new(10, 10, 30, 30));
        assert_eq!(*image.get_pixel(10, 10), BARCODE_BOX);
        assert_eq!(*image.get_pixel(29, 10), BARCODE_BOX);
        assert_eq!(*image.get_pixel(10, 29), BARCODE_BOX);
        // Interior stays untouched
        assert_eq!(*image.get_pixel(20, 20), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_degenerate_box_is_skipped() {
        let mut image = RgbImage::new(32, 32);
        draw_barcode_box(&mut image, Rect::new(5, 5, 5, 20));
        assert_eq!(*image.get_pixel(5, 5), Rgb([0, 0, 0]));
    }
}
