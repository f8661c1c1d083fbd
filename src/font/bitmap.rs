//! Built-in fallback glyphs from the Spleen 12×24 bitmap font.
//!
//! Used whenever no outline font resolves. Glyphs are scaled nearest-neighbor
//! to a cell `font_size` tall and half as wide. Characters Spleen lacks
//! (kana, kanji) are drawn as a box outline so they still occupy ink.

use spleen_font::{FONT_12X24, PSF2Font};

use super::GlyphMask;

const SRC_WIDTH: usize = 12;
const SRC_HEIGHT: usize = 24;
/// Baseline row of the 12×24 cell.
const SRC_BASELINE: usize = 19;

/// Cell size for a pixel height: `(width, height)`.
pub fn cell_size(pixel_height: u32) -> (usize, usize) {
    let h = pixel_height.max(1) as usize;
    let w = ((h as f32 / 2.0).round() as usize).max(1);
    (w, h)
}

/// Rasterize `text` into per-glyph masks relative to the pen origin
/// (baseline at y = 0). Every character advances by one cell width.
pub fn layout_run(text: &str, pixel_height: u32) -> Vec<GlyphMask> {
    let (cell_w, cell_h) = cell_size(pixel_height);
    let ascent = (cell_h as f32 * SRC_BASELINE as f32 / SRC_HEIGHT as f32).round() as i32;
    let mut spleen = PSF2Font::new(FONT_12X24).ok();

    let mut masks = Vec::new();
    for (i, ch) in text.chars().enumerate() {
        let mut src = vec![0u8; SRC_WIDTH * SRC_HEIGHT];
        if !ch.is_whitespace() {
            let utf8_bytes = ch.to_string();
            let found = spleen
                .as_mut()
                .and_then(|font| font.glyph_for_utf8(utf8_bytes.as_bytes()));
            match found {
                Some(spleen_glyph) => {
                    for (row_y, row) in spleen_glyph.enumerate() {
                        for (col_x, on) in row.enumerate() {
                            if col_x < SRC_WIDTH && row_y < SRC_HEIGHT {
                                src[row_y * SRC_WIDTH + col_x] = u8::from(on);
                            }
                        }
                    }
                }
                None => draw_box(&mut src),
            }
        }
        let mut coverage = vec![0.0f32; cell_w * cell_h];
        scale_bitmap(&src, &mut coverage, cell_w, cell_h);

        let mask = GlyphMask {
            x: (i * cell_w) as i32,
            y: -ascent,
            width: cell_w,
            height: cell_h,
            coverage,
        };
        if let Some(mask) = mask.trimmed() {
            masks.push(mask);
        }
    }
    masks
}

/// Scale the 12×24 source onto the destination cell using nearest neighbor.
fn scale_bitmap(src: &[u8], dst: &mut [f32], dst_w: usize, dst_h: usize) {
    for dy in 0..dst_h {
        for dx in 0..dst_w {
            let sx = dx * SRC_WIDTH / dst_w;
            let sy = dy * SRC_HEIGHT / dst_h;
            if src.get(sy * SRC_WIDTH + sx).copied().unwrap_or(0) != 0 {
                dst[dy * dst_w + dx] = 1.0;
            }
        }
    }
}

/// Box outline for characters missing from the font, inset from the cell
/// edges so neighbouring boxes stay apart.
fn draw_box(glyph: &mut [u8]) {
    let (left, right) = (1, SRC_WIDTH - 2);
    let (top, bottom) = (3, SRC_BASELINE);
    for x in left..=right {
        glyph[top * SRC_WIDTH + x] = 1;
        glyph[bottom * SRC_WIDTH + x] = 1;
    }
    for y in top..=bottom {
        glyph[y * SRC_WIDTH + left] = 1;
        glyph[y * SRC_WIDTH + right] = 1;
    }
}
