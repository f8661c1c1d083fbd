//! Barcode rendering.
//!
//! Uses the barcoders crate for Code 128 encoding. The symbol is drawn at a
//! fixed intrinsic resolution, then resampled into the element's box with a
//! Lanczos filter.

use barcoders::sym::code128::Code128;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use super::ElementError;
use crate::document::Size;
use crate::geometry::{Point, Rect};

/// Pixels per module in the intrinsic raster.
const MODULE_WIDTH: u32 = 2;
/// Bar height of the intrinsic raster.
const MODULE_HEIGHT: u32 = 150;
/// Blank margin on each side of the intrinsic raster.
const QUIET_ZONE: u32 = 20;

/// Encode data as Code 128 modules (1 = bar, 0 = space).
pub fn encode_code128(data: &str) -> Result<Vec<u8>, ElementError> {
    if data.is_empty() {
        return Err(ElementError::EmptyBarcode);
    }
    // Code128 requires a character set prefix:
    // - Character Set A (Ā): uppercase, control chars, digits
    // - Character Set B (Ɓ): uppercase, lowercase, digits, special chars
    // - Character Set C (Ć): digit pairs only (high density)
    // We use Set B as it supports the widest range of printable characters.
    let prefixed_data = format!("\u{0181}{}", data);
    let barcode = Code128::new(&prefixed_data)
        .map_err(|e| ElementError::BarcodeEncode(format!("{:?}", e)))?;
    Ok(barcode.encode())
}

/// Black-on-white raster of the symbol at intrinsic resolution.
pub fn intrinsic_raster(modules: &[u8]) -> RgbaImage {
    let width = modules.len() as u32 * MODULE_WIDTH + 2 * QUIET_ZONE;
    let white = Rgba([255, 255, 255, 255]);
    let black = Rgba([0, 0, 0, 255]);
    RgbaImage::from_fn(width, MODULE_HEIGHT, |x, _| {
        let bar = x
            .checked_sub(QUIET_ZONE)
            .map(|x| (x / MODULE_WIDTH) as usize)
            .and_then(|i| modules.get(i))
            .is_some_and(|&m| m == 1);
        if bar { black } else { white }
    })
}

/// Box of `size` centered on `center`, rounding the origin down. `None`
/// when the box does not fit in doc coordinates.
pub fn placement(center: Point, size: Size) -> Option<Rect> {
    let x = (center.x as f64 - size.width as f64 / 2.0).floor() as i32;
    let y = (center.y as f64 - size.height as f64 / 2.0).floor() as i32;
    Rect::checked_from_origin(x, y, size.width, size.height)
}

/// Encode, resample and paste the barcode. Returns the covered box.
pub fn draw(canvas: &mut RgbaImage, data: &str, center: Point, size: Size) -> Result<Rect, ElementError> {
    if !size.is_positive() {
        return Err(ElementError::NonPositiveSize(size.width, size.height));
    }
    let bbox = placement(center, size).ok_or(ElementError::OutOfRange)?;
    let modules = encode_code128(data)?;
    let raster = intrinsic_raster(&modules);
    let resized = imageops::resize(
        &raster,
        size.width as u32,
        size.height as u32,
        FilterType::Lanczos3,
    );

    imageops::overlay(canvas, &resized, bbox.x1 as i64, bbox.y1 as i64);
    Ok(bbox)
}
