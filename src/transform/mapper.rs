//! Doc ↔ preview coordinate mapping.
//!
//! The export canvas is scaled uniformly to fit the preview surface and
//! centered, leaving letterbox bars on one axis:
//!
//! ```text
//! scale  = min(preview_w / export_w, preview_h / export_h)
//! offset = ((preview_w - export_w·scale) / 2, (preview_h - export_h·scale) / 2)
//! ```

use crate::geometry::{PointF, Rect, RectF};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    preview_width: f64,
    preview_height: f64,
    export_width: u32,
    export_height: u32,
    scale: f64,
    offset: PointF,
}

impl CoordinateMapper {
    pub fn new(preview_width: f64, preview_height: f64, export_width: u32, export_height: u32) -> Self {
        let mut mapper = Self {
            preview_width,
            preview_height,
            export_width,
            export_height,
            scale: 1.0,
            offset: PointF::default(),
        };
        mapper.recompute();
        mapper
    }

    /// Preview surface the same size as the export.
    pub fn identity(export_width: u32, export_height: u32) -> Self {
        Self::new(export_width as f64, export_height as f64, export_width, export_height)
    }

    pub fn set_preview_size(&mut self, width: f64, height: f64) {
        self.preview_width = width;
        self.preview_height = height;
        self.recompute();
    }

    pub fn set_export_size(&mut self, width: u32, height: u32) {
        self.export_width = width;
        self.export_height = height;
        self.recompute();
    }

    /// Recompute scale and offset. A degenerate surface (not yet laid out)
    /// maps 1:1.
    fn recompute(&mut self) {
        let valid = self.preview_width.is_finite()
            && self.preview_height.is_finite()
            && self.preview_width > 0.0
            && self.preview_height > 0.0
            && self.export_width > 0
            && self.export_height > 0;
        if !valid {
            self.scale = 1.0;
            self.offset = PointF::default();
            return;
        }

        let (ew, eh) = (self.export_width as f64, self.export_height as f64);
        self.scale = (self.preview_width / ew).min(self.preview_height / eh);
        self.offset = PointF::new(
            (self.preview_width - ew * self.scale) / 2.0,
            (self.preview_height - eh * self.scale) / 2.0,
        );
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn offset(&self) -> PointF {
        self.offset
    }

    pub fn preview_size(&self) -> (f64, f64) {
        (self.preview_width, self.preview_height)
    }

    pub fn export_size(&self) -> (u32, u32) {
        (self.export_width, self.export_height)
    }

    pub fn to_preview(&self, p: PointF) -> PointF {
        PointF::new(p.x * self.scale + self.offset.x, p.y * self.scale + self.offset.y)
    }

    pub fn to_doc(&self, p: PointF) -> PointF {
        PointF::new((p.x - self.offset.x) / self.scale, (p.y - self.offset.y) / self.scale)
    }

    /// A pointer delta in preview pixels as doc units.
    pub fn delta_to_doc(&self, dx: f64, dy: f64) -> (f64, f64) {
        (dx / self.scale, dy / self.scale)
    }

    pub fn rect_to_preview(&self, r: Rect) -> RectF {
        let a = self.to_preview(PointF::new(r.x1 as f64, r.y1 as f64));
        let b = self.to_preview(PointF::new(r.x2 as f64, r.y2 as f64));
        RectF::new(a.x, a.y, b.x, b.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_letterbox_horizontal_bars() {
        let m = CoordinateMapper::new(600.0, 400.0, 800, 400);
        assert!(close(m.scale(), 0.75));
        assert!(close(m.offset().x, 0.0));
        assert!(close(m.offset().y, 50.0));
    }

    #[test]
    fn test_letterbox_vertical_bars() {
        let m = CoordinateMapper::new(1000.0, 200.0, 800, 400);
        assert!(close(m.scale(), 0.5));
        assert!(close(m.offset().x, 300.0));
        assert!(close(m.offset().y, 0.0));
    }

    #[test]
    fn test_round_trip() {
        let m = CoordinateMapper::new(733.0, 411.0, 800, 400);
        for &(x, y) in &[(0.0, 0.0), (12.5, 399.0), (732.9, 1.25), (-40.0, 900.0)] {
            let p = PointF::new(x, y);
            let back = m.to_preview(m.to_doc(p));
            assert!((back.x - x).abs() < 1e-9 && (back.y - y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_degenerate_preview_is_identity() {
        let m = CoordinateMapper::new(0.0, -5.0, 800, 400);
        assert_eq!(m.scale(), 1.0);
        assert_eq!(m.to_doc(PointF::new(3.0, 4.0)), PointF::new(3.0, 4.0));
    }

    #[test]
    fn test_recomputes_on_resize() {
        let mut m = CoordinateMapper::identity(800, 400);
        assert_eq!(m.scale(), 1.0);
        m.set_preview_size(400.0, 200.0);
        assert!(close(m.scale(), 0.5));
        m.set_export_size(400, 400);
        assert!(close(m.scale(), 0.5));
        assert!(close(m.offset().x, 100.0));
    }

    #[test]
    fn test_rect_and_delta() {
        let m = CoordinateMapper::new(400.0, 300.0, 800, 400);
        let r = m.rect_to_preview(Rect::new(100, 40, 300, 80));
        assert_eq!(r, RectF::new(50.0, 70.0, 150.0, 90.0));
        assert_eq!(m.delta_to_doc(20.0, 10.0), (40.0, 20.0));
    }
}
