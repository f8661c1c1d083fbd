//! # Raster Compositor
//!
//! Turns a [`Document`] into the export raster plus the [`BBoxMap`] that
//! hit-testing runs against.
//!
//! ## Pass
//!
//! 1. White canvas of `export_width × export_height`
//! 2. Price region fill
//! 3. Optional gray border
//! 4. Pricing computed once
//! 5. Elements in draw order (barcode first), each through a fallible
//!    boundary: a failed element is logged and left out of the box map
//!
//! ## Modules
//!
//! - [`text`]: anchor-based text layout, horizontal and vertical
//! - [`barcode`]: Code 128 symbol resampled into a box
//! - [`canvas`]: pixel fill and coverage blending
//! - [`preview`]: letterboxed preview raster

pub mod barcode;
pub mod canvas;
pub mod preview;
pub mod text;

use image::RgbaImage;
use thiserror::Error;

use crate::document::fields::InvalidField;
use crate::document::{Color, Document, Element, Pricing, TextStyle, semantic_text, tags};
use crate::font::{FontBook, FontCategory};
use crate::geometry::{BBoxMap, Rect};

/// Background of the whole sticker.
pub const PAGE_BACKGROUND: Color = Color::WHITE;
/// Border stroke color.
pub const BORDER_COLOR: Color = Color::GRAY;
/// Inset of the price region from the left, right and bottom edges.
pub const PRICE_REGION_INSET: i32 = 20;
/// Top edge of the price region.
pub const PRICE_REGION_TOP: i32 = 200;

/// Why a single element was left out of a render pass.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ElementError {
    #[error("text is empty")]
    EmptyText,

    #[error("font size must be positive, got {0}")]
    NonPositiveFontSize(i32),

    #[error("size must be positive, got {0}x{1}")]
    NonPositiveSize(i32, i32),

    #[error("text has no visible glyphs")]
    NoInk,

    #[error("barcode data is empty")]
    EmptyBarcode,

    #[error("barcode encode failed: {0}")]
    BarcodeEncode(String),

    #[error("element extends past the coordinate range")]
    OutOfRange,

    #[error(transparent)]
    InvalidField(#[from] InvalidField),
}

/// Output of one render pass.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub image: RgbaImage,
    pub boxes: BBoxMap,
}

/// The price information region for a canvas size (exclusive `x2`/`y2`).
pub fn price_region(width: u32, height: u32) -> Rect {
    Rect::new(
        PRICE_REGION_INSET,
        PRICE_REGION_TOP,
        width as i32 - PRICE_REGION_INSET + 1,
        height as i32 - PRICE_REGION_INSET + 1,
    )
}

/// Render the document. Never fails as a whole; bad elements are skipped.
pub fn render(doc: &Document, fonts: &FontBook) -> Rendered {
    let config = doc.config();
    let (width, height) = (config.export_width.max(1), config.export_height.max(1));

    let mut image = RgbaImage::from_pixel(width, height, PAGE_BACKGROUND.to_rgba());
    canvas::fill_rect(&mut image, price_region(width, height), config.price_area_fill);
    if config.show_border {
        canvas::stroke_border(&mut image, BORDER_COLOR);
    }

    let pricing = Pricing::compute(doc.fields(), config.tax_rate);

    let mut boxes = BBoxMap::new();
    for (key, element) in doc.elements().draw_order() {
        match draw_element(&mut image, doc, &pricing, fonts, key, element) {
            Ok(bbox) if bbox.is_valid() => boxes.insert(key, bbox),
            Ok(bbox) => {
                tracing::warn!(element = %key, ?bbox, "element produced an empty box, skipped");
            }
            Err(e) => {
                tracing::warn!(element = %key, error = %e, "element skipped");
            }
        }
    }

    tracing::debug!(width, height, elements = boxes.len(), "render pass complete");
    Rendered { image, boxes }
}

fn draw_element(
    image: &mut RgbaImage,
    doc: &Document,
    pricing: &Pricing,
    fonts: &FontBook,
    key: &str,
    element: &Element,
) -> Result<Rect, ElementError> {
    let config = doc.config();
    match element {
        Element::Text(t) => {
            if t.font_size <= 0 {
                return Err(ElementError::NonPositiveFontSize(t.font_size));
            }
            let content = semantic_text(key, &t.tag, doc.fields(), pricing)?;
            let style = TextStyle::for_tag(&t.tag);
            let family = match style.category {
                FontCategory::Text => &config.text_font,
                FontCategory::Accent => &config.accent_font,
            };
            let face = fonts.resolve(family, style.category);
            let run = text::layout(&face, &content, t)?;
            text::draw(image, &run, style.color);
            if t.tag == tags::LIST_PRICE && config.strikethrough {
                text::draw_strikethrough(image, run.bbox, style.color);
            }
            Ok(run.bbox)
        }
        Element::Barcode(b) => {
            let data = if b.data.is_empty() {
                doc.fields().get(tags::BARCODE_DATA).unwrap_or_default()
            } else {
                b.data.as_str()
            };
            barcode::draw(image, data, b.center, b.size)
        }
    }
}
