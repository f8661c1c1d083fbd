//! # Text Layout
//!
//! Places a run of glyphs so that the element's anchor point on the measured
//! ink box coincides with the element position.
//!
//! ## Horizontal
//!
//! ```text
//!   nw ──── n ──── ne
//!   │   定価 ¥3,080  │      the whole run is measured once and shifted
//!   w ──  center ── e      so the named point lands on `position`
//!   │                │
//!   sw ──── s ──── se
//! ```
//!
//! ## Vertical
//!
//! Characters stack down the y-axis at a fixed x with pitch
//! `font_size * line_spacing`. The stack ends at `position.y` for `s`, `sw`
//! and `se`, is centered on it for `n`, `w`, `e` and `center`, and starts at
//! it for `nw` and `ne`. Each character is aligned on its own ink box with
//! the element's anchor.

use image::RgbaImage;

use super::ElementError;
use super::canvas;
use crate::document::{Anchor, Color, HAlign, TextElement, VAlign};
use crate::font::{Face, GlyphMask};
use crate::geometry::{Point, Rect};

/// Strikethrough stroke thickness in doc units.
const STRIKE_WIDTH: i32 = 2;

/// Glyphs positioned in doc space with their union ink box.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub glyphs: Vec<GlyphMask>,
    pub bbox: Rect,
}

/// Lay out `text` for a text element.
pub fn layout(face: &Face<'_>, text: &str, element: &TextElement) -> Result<TextRun, ElementError> {
    if element.font_size <= 0 {
        return Err(ElementError::NonPositiveFontSize(element.font_size));
    }
    if text.is_empty() {
        return Err(ElementError::EmptyText);
    }
    let size = element.font_size as u32;

    if element.vertical {
        layout_vertical(face, text, size, element)
    } else {
        let mut glyphs = face.layout_run(text, size);
        let ink = ink_bounds(&glyphs).ok_or(ElementError::NoInk)?;
        let (dx, dy, bbox) = place(ink, element.position, element.anchor)?;
        shift(&mut glyphs, dx, dy);
        Ok(TextRun { glyphs, bbox })
    }
}

fn layout_vertical(
    face: &Face<'_>,
    text: &str,
    size: u32,
    element: &TextElement,
) -> Result<TextRun, ElementError> {
    let pitch = size as f64 * element.line_spacing as f64;
    let count = text.chars().count();
    let total = (count - 1) as f64 * pitch;
    let y = element.position.y as f64;
    let start_y = match element.anchor {
        Anchor::S | Anchor::Sw | Anchor::Se => y - total,
        Anchor::N | Anchor::W | Anchor::E | Anchor::Center => y - total / 2.0,
        Anchor::Nw | Anchor::Ne => y,
    };

    let mut glyphs = Vec::new();
    let mut bbox: Option<Rect> = None;
    let mut buf = [0u8; 4];
    for (i, ch) in text.chars().enumerate() {
        let char_y = (start_y + i as f64 * pitch).round() as i32;
        let mut masks = face.layout_run(ch.encode_utf8(&mut buf), size);
        // Whitespace keeps its slot but has no ink
        let Some(ink) = ink_bounds(&masks) else {
            continue;
        };
        let at = Point::new(element.position.x, char_y);
        let (dx, dy, placed) = place(ink, at, element.anchor)?;
        shift(&mut masks, dx, dy);
        bbox = Some(bbox.map_or(placed, |b| b.union(&placed)));
        glyphs.extend(masks);
    }

    let bbox = bbox.ok_or(ElementError::NoInk)?;
    Ok(TextRun { glyphs, bbox })
}

/// Union ink box of a glyph run, `None` when nothing has ink.
fn ink_bounds(glyphs: &[GlyphMask]) -> Option<Rect> {
    glyphs
        .iter()
        .map(GlyphMask::bounds)
        .reduce(|a, b| a.union(&b))
}

/// Offset that moves the anchor point of `ink` onto `at`. `None` when it
/// does not fit in `i32`.
fn align_offset(ink: Rect, at: Point, anchor: Anchor) -> Option<(i32, i32)> {
    let dx = match anchor.halign() {
        HAlign::Left => at.x.checked_sub(ink.x1)?,
        HAlign::Center => at.x.checked_sub(ink.x1 + ink.width().div_euclid(2))?,
        HAlign::Right => at.x.checked_sub(ink.x2)?,
    };
    let dy = match anchor.valign() {
        VAlign::Top => at.y.checked_sub(ink.y1)?,
        VAlign::Middle => at.y.checked_sub(ink.y1 + ink.height().div_euclid(2))?,
        VAlign::Bottom => at.y.checked_sub(ink.y2)?,
    };
    Some((dx, dy))
}

/// Offset and placed box for anchoring `ink` at `at`.
fn place(ink: Rect, at: Point, anchor: Anchor) -> Result<(i32, i32, Rect), ElementError> {
    let (dx, dy) = align_offset(ink, at, anchor).ok_or(ElementError::OutOfRange)?;
    let placed = ink.checked_translate(dx, dy).ok_or(ElementError::OutOfRange)?;
    Ok((dx, dy, placed))
}

fn shift(glyphs: &mut [GlyphMask], dx: i32, dy: i32) {
    for g in glyphs {
        g.x += dx;
        g.y += dy;
    }
}

// ============================================================================
// DRAWING
// ============================================================================

pub fn draw(canvas: &mut RgbaImage, run: &TextRun, color: Color) {
    for glyph in &run.glyphs {
        canvas::blend_mask(canvas, glyph, color);
    }
}

/// Rows covered by the strikethrough through `bbox`.
pub fn strikethrough_rect(bbox: Rect) -> Rect {
    let mid = bbox.y1 + bbox.height().div_euclid(2);
    Rect::new(
        bbox.x1,
        mid.saturating_sub(STRIKE_WIDTH / 2),
        bbox.x2,
        mid.saturating_add(STRIKE_WIDTH - STRIKE_WIDTH / 2),
    )
}

/// Horizontal line through the vertical midpoint of `bbox`, full width.
pub fn draw_strikethrough(canvas: &mut RgbaImage, bbox: Rect, color: Color) {
    canvas::fill_rect(canvas, strikethrough_rect(bbox), color);
}
