//! Pixel-level drawing on the export canvas.
//!
//! All coordinates are doc space. Everything clips silently at the canvas
//! edge, so elements may hang partly off the sticker.

use image::{Rgba, RgbaImage};

use crate::document::Color;
use crate::font::GlyphMask;
use crate::geometry::Rect;

/// Fill `rect` (exclusive `x2`/`y2`), clipped to the canvas.
pub fn fill_rect(canvas: &mut RgbaImage, rect: Rect, color: Color) {
    let (w, h) = (canvas.width() as i32, canvas.height() as i32);
    let px = color.to_rgba();
    for y in rect.y1.max(0)..rect.y2.min(h) {
        for x in rect.x1.max(0)..rect.x2.min(w) {
            canvas.put_pixel(x as u32, y as u32, px);
        }
    }
}

/// One pixel wide outline along the canvas edge.
pub fn stroke_border(canvas: &mut RgbaImage, color: Color) {
    let (w, h) = (canvas.width() as i32, canvas.height() as i32);
    fill_rect(canvas, Rect::new(0, 0, w, 1), color);
    fill_rect(canvas, Rect::new(0, h - 1, w, h), color);
    fill_rect(canvas, Rect::new(0, 0, 1, h), color);
    fill_rect(canvas, Rect::new(w - 1, 0, w, h), color);
}

/// Composite a coverage mask in `color` at the mask's own position.
pub fn blend_mask(canvas: &mut RgbaImage, mask: &GlyphMask, color: Color) {
    let (cw, ch) = (canvas.width() as i32, canvas.height() as i32);
    for row in 0..mask.height {
        let y = mask.y + row as i32;
        if y < 0 || y >= ch {
            continue;
        }
        for col in 0..mask.width {
            let x = mask.x + col as i32;
            if x < 0 || x >= cw {
                continue;
            }
            let coverage = mask.coverage[row * mask.width + col];
            if coverage <= 0.0 {
                continue;
            }
            let dst = canvas.get_pixel_mut(x as u32, y as u32);
            *dst = mix(*dst, color, coverage);
        }
    }
}

fn mix(dst: Rgba<u8>, color: Color, coverage: f32) -> Rgba<u8> {
    let a = coverage.clamp(0.0, 1.0);
    let lerp = |bg: u8, fg: u8| (bg as f32 + (fg as f32 - bg as f32) * a).round() as u8;
    Rgba([
        lerp(dst[0], color.r),
        lerp(dst[1], color.g),
        lerp(dst[2], color.b),
        255,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_rect_clips() {
        let mut img = RgbaImage::from_pixel(10, 10, Color::WHITE.to_rgba());
        fill_rect(&mut img, Rect::new(-5, 8, 3, 20), Color::BLACK);
        assert_eq!(*img.get_pixel(0, 9), Color::BLACK.to_rgba());
        assert_eq!(*img.get_pixel(2, 8), Color::BLACK.to_rgba());
        assert_eq!(*img.get_pixel(3, 8), Color::WHITE.to_rgba());
        assert_eq!(*img.get_pixel(0, 7), Color::WHITE.to_rgba());
    }

    #[test]
    fn test_border_is_one_pixel() {
        let mut img = RgbaImage::from_pixel(6, 4, Color::WHITE.to_rgba());
        stroke_border(&mut img, Color::GRAY);
        assert_eq!(*img.get_pixel(0, 0), Color::GRAY.to_rgba());
        assert_eq!(*img.get_pixel(5, 3), Color::GRAY.to_rgba());
        assert_eq!(*img.get_pixel(3, 0), Color::GRAY.to_rgba());
        assert_eq!(*img.get_pixel(1, 1), Color::WHITE.to_rgba());
        assert_eq!(*img.get_pixel(4, 2), Color::WHITE.to_rgba());
    }

    #[test]
    fn test_blend_partial_coverage() {
        let mut img = RgbaImage::from_pixel(4, 4, Color::WHITE.to_rgba());
        let mask = GlyphMask {
            x: 1,
            y: 1,
            width: 2,
            height: 1,
            coverage: vec![1.0, 0.5],
        };
        blend_mask(&mut img, &mask, Color::BLACK);
        assert_eq!(*img.get_pixel(1, 1), Rgba([0, 0, 0, 255]));
        assert_eq!(*img.get_pixel(2, 1), Rgba([128, 128, 128, 255]));
        assert_eq!(*img.get_pixel(0, 0), Color::WHITE.to_rgba());
    }
}
