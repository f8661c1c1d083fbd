//! Points, rectangles and the per-render bounding box map.
//!
//! Doc-space geometry is integral (`Point`, `Rect`); preview-space geometry
//! is floating point (`PointF`, `RectF`). Conversion between the two only
//! happens in [`crate::transform::mapper`].

use serde::ser::{Serialize, SerializeMap, Serializer};

/// A position in doc space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset by a fractional delta, rounding to the nearest doc unit.
    pub fn offset_rounded(self, dx: f64, dy: f64) -> Self {
        Self {
            x: (self.x as f64 + dx).round() as i32,
            y: (self.y as f64 + dy).round() as i32,
        }
    }
}

/// A floating point position (preview space, or doc space mid-transform).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointF {
    pub x: f64,
    pub y: f64,
}

impl PointF {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<Point> for PointF {
    fn from(p: Point) -> Self {
        Self::new(p.x as f64, p.y as f64)
    }
}

/// Axis-aligned box in doc space. `x2`/`y2` are exclusive pixel edges, so a
/// box covering a single pixel at (3, 4) is `(3, 4, 4, 5)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Rect {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Box of the given size with its top-left corner at `(x, y)`.
    pub const fn from_origin(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x.saturating_add(width), y.saturating_add(height))
    }

    /// Like [`Rect::from_origin`], `None` when the far edge leaves `i32`.
    pub fn checked_from_origin(x: i32, y: i32, width: i32, height: i32) -> Option<Self> {
        Some(Self::new(x, y, x.checked_add(width)?, y.checked_add(height)?))
    }

    pub fn width(&self) -> i32 {
        self.x2.saturating_sub(self.x1)
    }

    pub fn height(&self) -> i32 {
        self.y2.saturating_sub(self.y1)
    }

    /// True when the box encloses at least one pixel.
    pub fn is_valid(&self) -> bool {
        self.x2 > self.x1 && self.y2 > self.y1
    }

    pub fn translate(&self, dx: i32, dy: i32) -> Self {
        Self::new(
            self.x1.saturating_add(dx),
            self.y1.saturating_add(dy),
            self.x2.saturating_add(dx),
            self.y2.saturating_add(dy),
        )
    }

    /// Translation that fails instead of clamping at the `i32` range.
    pub fn checked_translate(&self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self::new(
            self.x1.checked_add(dx)?,
            self.y1.checked_add(dy)?,
            self.x2.checked_add(dx)?,
            self.y2.checked_add(dy)?,
        ))
    }

    /// Smallest box enclosing both.
    pub fn union(&self, other: &Rect) -> Self {
        Self::new(
            self.x1.min(other.x1),
            self.y1.min(other.y1),
            self.x2.max(other.x2),
            self.y2.max(other.y2),
        )
    }

    /// Edge-inclusive point test, used for hit-testing.
    pub fn contains(&self, p: PointF) -> bool {
        self.x1 as f64 <= p.x && p.x <= self.x2 as f64 && self.y1 as f64 <= p.y && p.y <= self.y2 as f64
    }
}

impl Serialize for Rect {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.x1, self.y1, self.x2, self.y2].serialize(serializer)
    }
}

/// Axis-aligned box in preview space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectF {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl RectF {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Square of side `size` centered on `c`.
    pub fn square(c: PointF, size: f64) -> Self {
        let h = size / 2.0;
        Self::new(c.x - h, c.y - h, c.x + h, c.y + h)
    }

    pub fn center(&self) -> PointF {
        PointF::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    pub fn contains(&self, p: PointF) -> bool {
        self.x1 <= p.x && p.x <= self.x2 && self.y1 <= p.y && p.y <= self.y2
    }
}

// ============================================================================
// BOUNDING BOX MAP
// ============================================================================

/// Element key → tight doc-space box, in draw order.
///
/// Rebuilt from scratch on every render pass. Iteration order is draw order,
/// so reverse iteration visits the topmost element first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BBoxMap {
    entries: Vec<(String, Rect)>,
}

impl BBoxMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a box. A key recorded twice keeps its first draw slot and the
    /// newest box.
    pub fn insert(&mut self, key: impl Into<String>, rect: Rect) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = rect,
            None => self.entries.push((key, rect)),
        }
    }

    pub fn get(&self, key: &str) -> Option<Rect> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, r)| *r)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in draw order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, Rect)> {
        self.entries.iter().map(|(k, r)| (k.as_str(), *r))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Topmost element whose box contains `p` (last drawn wins).
    pub fn hit_test(&self, p: PointF) -> Option<&str> {
        self.iter().rev().find(|(_, r)| r.contains(p)).map(|(k, _)| k)
    }
}

impl Serialize for BBoxMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, rect) in &self.entries {
            map.serialize_entry(key, rect)?;
        }
        map.end()
    }
}
