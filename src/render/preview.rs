//! Letterboxed preview raster.
//!
//! The export image is Lanczos-resized by the mapper's scale and centered
//! on a white surface of the preview size.

use image::RgbaImage;
use image::imageops::{self, FilterType};

use super::PAGE_BACKGROUND;
use crate::transform::CoordinateMapper;

/// Scale `export` into a preview-sized surface. A degenerate preview size
/// returns the export unchanged.
pub fn letterbox(export: &RgbaImage, mapper: &CoordinateMapper) -> RgbaImage {
    let (pw, ph) = mapper.preview_size();
    if !(pw >= 1.0 && ph >= 1.0) {
        return export.clone();
    }

    let scale = mapper.scale();
    let w = ((export.width() as f64 * scale).round() as u32).max(1);
    let h = ((export.height() as f64 * scale).round() as u32).max(1);
    let scaled = imageops::resize(export, w, h, FilterType::Lanczos3);

    let mut surface = RgbaImage::from_pixel(pw as u32, ph as u32, PAGE_BACKGROUND.to_rgba());
    let offset = mapper.offset();
    imageops::overlay(
        &mut surface,
        &scaled,
        offset.x.round() as i64,
        offset.y.round() as i64,
    );
    surface
}
