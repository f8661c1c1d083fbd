//! Resize handles and cursor affordances.
//!
//! A single selection shows eight square handles on its preview-space box:
//!
//! ```text
//!   tl ─── tm ─── tr
//!   │              │
//!   ml            mr
//!   │              │
//!   bl ─── bm ─── br
//! ```

use std::fmt;
use std::str::FromStr;

use crate::geometry::{PointF, RectF};

/// Side of a handle square in preview pixels.
pub const HANDLE_SIZE: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    TopLeft,
    TopMiddle,
    TopRight,
    MiddleLeft,
    MiddleRight,
    BottomLeft,
    BottomMiddle,
    BottomRight,
}

/// Which box edges a handle drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Edges {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl Handle {
    /// Handles in overlay and hit-test order.
    pub const ALL: [Handle; 8] = [
        Handle::TopLeft,
        Handle::TopMiddle,
        Handle::TopRight,
        Handle::MiddleLeft,
        Handle::MiddleRight,
        Handle::BottomLeft,
        Handle::BottomMiddle,
        Handle::BottomRight,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Handle::TopLeft => "tl",
            Handle::TopMiddle => "tm",
            Handle::TopRight => "tr",
            Handle::MiddleLeft => "ml",
            Handle::MiddleRight => "mr",
            Handle::BottomLeft => "bl",
            Handle::BottomMiddle => "bm",
            Handle::BottomRight => "br",
        }
    }

    pub fn edges(self) -> Edges {
        let name = self.name().as_bytes();
        let has = |c: u8| name.contains(&c);
        Edges {
            left: has(b'l'),
            right: has(b'r'),
            top: has(b't'),
            bottom: has(b'b'),
        }
    }

    /// Corner handles lock the aspect ratio.
    pub fn is_corner(self) -> bool {
        matches!(
            self,
            Handle::TopLeft | Handle::TopRight | Handle::BottomLeft | Handle::BottomRight
        )
    }

    /// Point on `bbox` this handle sits on.
    pub fn anchor_point(self, bbox: RectF) -> PointF {
        let c = bbox.center();
        let edges = self.edges();
        let x = if edges.left {
            bbox.x1
        } else if edges.right {
            bbox.x2
        } else {
            c.x
        };
        let y = if edges.top {
            bbox.y1
        } else if edges.bottom {
            bbox.y2
        } else {
            c.y
        };
        PointF::new(x, y)
    }

    pub fn rect(self, bbox: RectF) -> RectF {
        RectF::square(self.anchor_point(bbox), HANDLE_SIZE)
    }

    pub fn cursor(self) -> Cursor {
        match self {
            Handle::TopLeft | Handle::BottomRight => Cursor::NwseResize,
            Handle::TopRight | Handle::BottomLeft => Cursor::NeswResize,
            Handle::TopMiddle | Handle::BottomMiddle => Cursor::NsResize,
            Handle::MiddleLeft | Handle::MiddleRight => Cursor::EwResize,
        }
    }
}

impl FromStr for Handle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Handle::ALL
            .into_iter()
            .find(|h| h.name() == s)
            .ok_or_else(|| format!("Unknown handle '{}'", s))
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pointer affordance shown over the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Move,
    NsResize,
    EwResize,
    NwseResize,
    NeswResize,
}

impl Cursor {
    /// CSS cursor name.
    pub fn css_name(self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Move => "move",
            Cursor::NsResize => "ns-resize",
            Cursor::EwResize => "ew-resize",
            Cursor::NwseResize => "nwse-resize",
            Cursor::NeswResize => "nesw-resize",
        }
    }
}

/// All eight handle squares for a preview-space box.
pub fn handle_rects(bbox: RectF) -> Vec<(Handle, RectF)> {
    Handle::ALL.into_iter().map(|h| (h, h.rect(bbox))).collect()
}

/// First handle whose square contains `p` (edge-inclusive).
pub fn hit_handle(bbox: RectF, p: PointF) -> Option<Handle> {
    Handle::ALL.into_iter().find(|h| h.rect(bbox).contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_and_corners() {
        assert_eq!(
            Handle::TopLeft.edges(),
            Edges { left: true, top: true, ..Default::default() }
        );
        assert_eq!(Handle::MiddleRight.edges(), Edges { right: true, ..Default::default() });
        assert_eq!(Handle::BottomMiddle.edges(), Edges { bottom: true, ..Default::default() });
        let corners: Vec<_> = Handle::ALL.into_iter().filter(|h| h.is_corner()).collect();
        assert_eq!(corners.len(), 4);
        assert!(!Handle::TopMiddle.is_corner());
    }

    #[test]
    fn test_handle_rects_are_centered_squares() {
        let bbox = RectF::new(10.0, 20.0, 110.0, 60.0);
        let rects = handle_rects(bbox);
        assert_eq!(rects.len(), 8);
        assert_eq!(rects[0], (Handle::TopLeft, RectF::new(6.0, 16.0, 14.0, 24.0)));
        assert_eq!(rects[1].1.center(), PointF::new(60.0, 20.0));
        assert_eq!(rects[4].1.center(), PointF::new(110.0, 40.0));
        assert_eq!(rects[7].1.center(), PointF::new(110.0, 60.0));
    }

    #[test]
    fn test_hit_handle() {
        let bbox = RectF::new(10.0, 20.0, 110.0, 60.0);
        assert_eq!(hit_handle(bbox, PointF::new(113.0, 63.0)), Some(Handle::BottomRight));
        assert_eq!(hit_handle(bbox, PointF::new(60.0, 17.0)), Some(Handle::TopMiddle));
        assert_eq!(hit_handle(bbox, PointF::new(60.0, 40.0)), None);
    }

    #[test]
    fn test_cursor_affordances() {
        assert_eq!(Handle::TopLeft.cursor(), Cursor::NwseResize);
        assert_eq!(Handle::BottomRight.cursor(), Cursor::NwseResize);
        assert_eq!(Handle::TopRight.cursor(), Cursor::NeswResize);
        assert_eq!(Handle::BottomMiddle.cursor(), Cursor::NsResize);
        assert_eq!(Handle::MiddleLeft.cursor(), Cursor::EwResize);
        assert_eq!(Cursor::default().css_name(), "default");
    }

    #[test]
    fn test_parse_names() {
        for h in Handle::ALL {
            assert_eq!(h.name().parse::<Handle>(), Ok(h));
        }
        assert!("xx".parse::<Handle>().is_err());
    }
}
