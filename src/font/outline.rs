//! Outline font rasterization via ab_glyph.
//!
//! Lays out a single line with kerning and renders each glyph to an
//! anti-aliased coverage mask positioned relative to the pen origin
//! (baseline at y = 0).

use ab_glyph::{Font, FontArc, GlyphId, ScaleFont, point};

use super::GlyphMask;

/// Rasterize `text` at `pixel_height` into per-glyph masks.
///
/// Glyphs without an outline (spaces) advance the pen but produce no mask.
pub fn layout_run(font: &FontArc, text: &str, pixel_height: f32) -> Vec<GlyphMask> {
    let scaled = font.as_scaled(pixel_height);

    let mut masks = Vec::new();
    let mut caret_x = 0.0f32;
    let mut previous: Option<GlyphId> = None;

    for ch in text.chars() {
        let glyph_id = font.glyph_id(ch);
        if let Some(prev) = previous {
            caret_x += scaled.kern(prev, glyph_id);
        }
        let glyph = glyph_id.with_scale_and_position(pixel_height, point(caret_x, 0.0));
        caret_x += scaled.h_advance(glyph_id);
        previous = Some(glyph_id);

        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        let width = bounds.width().max(0.0) as usize;
        let height = bounds.height().max(0.0) as usize;
        if width == 0 || height == 0 {
            continue;
        }

        let mut coverage = vec![0.0f32; width * height];
        outlined.draw(|px, py, c| {
            let (px, py) = (px as usize, py as usize);
            if px < width && py < height {
                let idx = py * width + px;
                // Accumulate coverage (clamped)
                coverage[idx] = (coverage[idx] + c).min(1.0);
            }
        });

        let mask = GlyphMask {
            x: bounds.min.x as i32,
            y: bounds.min.y as i32,
            width,
            height,
            coverage,
        };
        if let Some(mask) = mask.trimmed() {
            masks.push(mask);
        }
    }

    masks
}
