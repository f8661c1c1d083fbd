//! # Font Resolution
//!
//! A [`FontBook`] holds the outline fonts the host registered by family
//! name. Resolution never fails:
//!
//! ```text
//! requested family ─► first registered alias of its category ─► built-in bitmap
//! ```
//!
//! Both outline and bitmap faces rasterize to [`GlyphMask`]s, so the text
//! layout engine does not care which one it got.

pub mod bitmap;
pub mod outline;

use ab_glyph::FontArc;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::EtiquetaError;
use crate::geometry::Rect;

/// Which alias list a family falls back through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontCategory {
    /// Japanese body text.
    Text,
    /// Heavy display face for prices and labels.
    Accent,
}

impl FontCategory {
    /// Families tried, in order, when the requested one is not registered.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            FontCategory::Text => &["Meiryo", "MS Gothic", "Yu Gothic"],
            FontCategory::Accent => &["Impact", "Arial Black"],
        }
    }
}

/// Coverage mask of one glyph, positioned relative to the run origin.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphMask {
    pub x: i32,
    pub y: i32,
    pub width: usize,
    pub height: usize,
    /// Row-major coverage, 0.0 = no ink, 1.0 = full ink.
    pub coverage: Vec<f32>,
}

impl GlyphMask {
    /// Crop to the tight box of non-zero coverage. `None` when empty.
    pub fn trimmed(self) -> Option<Self> {
        let (w, h) = (self.width, self.height);
        let mut min_x = w;
        let mut max_x = 0;
        let mut min_y = h;
        let mut max_y = 0;

        for y in 0..h {
            for x in 0..w {
                if self.coverage[y * w + x] > 0.0 {
                    min_x = min_x.min(x);
                    max_x = max_x.max(x);
                    min_y = min_y.min(y);
                    max_y = max_y.max(y);
                }
            }
        }

        if min_x > max_x || min_y > max_y {
            return None;
        }
        if min_x == 0 && min_y == 0 && max_x == w - 1 && max_y == h - 1 {
            return Some(self);
        }

        let new_w = max_x - min_x + 1;
        let new_h = max_y - min_y + 1;
        let mut coverage = Vec::with_capacity(new_w * new_h);
        for y in min_y..=max_y {
            coverage.extend_from_slice(&self.coverage[y * w + min_x..=y * w + max_x]);
        }

        Some(Self {
            x: self.x + min_x as i32,
            y: self.y + min_y as i32,
            width: new_w,
            height: new_h,
            coverage,
        })
    }

    /// Ink box relative to the run origin.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin(self.x, self.y, self.width as i32, self.height as i32)
    }
}

// ============================================================================
// FONT BOOK
// ============================================================================

/// A resolved glyph source.
#[derive(Clone, Copy)]
pub enum Face<'a> {
    Outline { family: &'a str, font: &'a FontArc },
    /// Spleen bitmap glyphs, always available.
    Builtin,
}

impl Face<'_> {
    /// Rasterize a single line of text.
    pub fn layout_run(&self, text: &str, font_size: u32) -> Vec<GlyphMask> {
        match self {
            Face::Outline { font, .. } => outline::layout_run(font, text, font_size as f32),
            Face::Builtin => bitmap::layout_run(text, font_size),
        }
    }

    pub fn family(&self) -> &str {
        match self {
            Face::Outline { family, .. } => family,
            Face::Builtin => "builtin",
        }
    }
}

/// Registered outline fonts by family name.
#[derive(Default, Clone)]
pub struct FontBook {
    families: BTreeMap<String, FontArc>,
}

impl FontBook {
    /// An empty book: everything resolves to the built-in bitmap face.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a font from raw TTF/OTF bytes.
    pub fn register(&mut self, family: impl Into<String>, bytes: Vec<u8>) -> Result<(), EtiquetaError> {
        let family = family.into();
        let font = FontArc::try_from_vec(bytes)
            .map_err(|e| EtiquetaError::Font(format!("{}: {}", family, e)))?;
        self.families.insert(family, font);
        Ok(())
    }

    /// Register a font file under a family name.
    pub fn register_file(&mut self, family: impl Into<String>, path: &Path) -> Result<(), EtiquetaError> {
        let bytes = std::fs::read(path)
            .map_err(|e| EtiquetaError::Font(format!("{}: {}", path.display(), e)))?;
        self.register(family, bytes)
    }

    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.families.keys().map(String::as_str)
    }

    /// Resolve a family, falling back through the category aliases and
    /// finally the built-in face.
    pub fn resolve(&self, family: &str, category: FontCategory) -> Face<'_> {
        if let Some((name, font)) = self.families.get_key_value(family) {
            return Face::Outline { family: name, font };
        }
        for alias in category.aliases() {
            if let Some((name, font)) = self.families.get_key_value(*alias) {
                tracing::debug!(requested = family, resolved = %name, "font alias used");
                return Face::Outline { family: name, font };
            }
        }
        tracing::debug!(requested = family, "no outline font, using built-in glyphs");
        Face::Builtin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_book_resolves_builtin() {
        let book = FontBook::new();
        assert!(matches!(book.resolve("Meiryo", FontCategory::Text), Face::Builtin));
        assert!(matches!(book.resolve("", FontCategory::Accent), Face::Builtin));
    }

    #[test]
    fn test_register_rejects_garbage() {
        let mut book = FontBook::new();
        let err = book.register("Broken", vec![0, 1, 2, 3]);
        assert!(matches!(err, Err(EtiquetaError::Font(_))));
        assert_eq!(book.families().count(), 0);
    }

    #[test]
    fn test_register_missing_file() {
        let mut book = FontBook::new();
        assert!(book.register_file("X", Path::new("/nonexistent/font.ttf")).is_err());
    }

    #[test]
    fn test_trim_crops_to_ink() {
        let mut coverage = vec![0.0; 16];
        coverage[4 + 1] = 1.0;
        coverage[2 * 4 + 2] = 0.5;
        let mask = GlyphMask { x: 10, y: -4, width: 4, height: 4, coverage };
        let t = mask.trimmed().unwrap();
        assert_eq!((t.x, t.y, t.width, t.height), (11, -3, 2, 2));
        assert_eq!(t.coverage, vec![1.0, 0.0, 0.0, 0.5]);
        assert_eq!(t.bounds(), Rect::new(11, -3, 13, -1));
    }

    #[test]
    fn test_trim_empty_is_none() {
        let mask = GlyphMask { x: 0, y: 0, width: 3, height: 3, coverage: vec![0.0; 9] };
        assert!(mask.trimmed().is_none());
    }

    #[test]
    fn test_category_aliases() {
        assert_eq!(FontCategory::Text.aliases()[0], "Meiryo");
        assert!(FontCategory::Accent.aliases().contains(&"Impact"));
    }
}
