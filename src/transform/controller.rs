//! # Transform Controller
//!
//! Pointer gestures on the preview turned into document mutations.
//!
//! ```text
//!          pointer_down                 pointer_move
//! Idle ──────────────► Selecting ──► Dragging{move | resize(handle)} ─┐
//!  ▲                       │                                          │
//!  │        nothing to drag│                  pointer_up              │
//!  └───────────────────────┴──────────────────────────────────────────┘
//! ```
//!
//! All drag arithmetic runs against a [`TransformSession`] captured at
//! press time, so each move event is computed from the start state rather
//! than accumulated.

use std::collections::BTreeMap;

use super::Selection;
use super::handles::{Cursor, Handle, hit_handle};
use super::mapper::CoordinateMapper;
use crate::document::{Document, Size};
use crate::error::EtiquetaError;
use crate::geometry::{BBoxMap, Point, PointF, Rect};

/// Smallest barcode side a resize can produce.
pub const MIN_BARCODE_SIDE: i32 = 10;
/// Smallest font size a resize can produce.
pub const MIN_FONT_SIZE: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    Move,
    Resize(Handle),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerState {
    #[default]
    Idle,
    /// Resolving a press into a selection change and drag mode.
    Selecting,
    Dragging(DragMode),
}

/// Pre-drag state of one selected element.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionItem {
    pub position: Point,
    pub size: Option<Size>,
    pub font_size: Option<i32>,
    /// Box from the render the gesture started on.
    pub bbox: Option<Rect>,
}

/// Snapshot taken on pointer down, discarded on release.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformSession {
    /// Press position in preview space.
    pub origin: PointF,
    pub mode: DragMode,
    pub items: BTreeMap<String, SessionItem>,
}

/// What a press did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Press {
    pub selection_changed: bool,
    pub mode: Option<DragMode>,
}

#[derive(Debug, Clone, Default)]
pub struct TransformController {
    state: ControllerState,
    session: Option<TransformSession>,
}

impl TransformController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn session(&self) -> Option<&TransformSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, ControllerState::Dragging(_))
    }

    /// Handle a button press at preview point `p`.
    ///
    /// With exactly one element selected its handles are tested first.
    /// Otherwise the topmost element under the pointer is hit-tested and
    /// the selection updated: `multi` toggles membership, a plain press
    /// replaces the selection (or clears it on a miss).
    pub fn pointer_down(
        &mut self,
        p: PointF,
        multi: bool,
        doc: &Document,
        boxes: &BBoxMap,
        mapper: &CoordinateMapper,
        selection: &mut Selection,
    ) -> Press {
        self.state = ControllerState::Selecting;
        self.session = None;

        let before = selection.clone();
        let mut mode = single_selection_box(selection, boxes)
            .and_then(|rect| hit_handle(mapper.rect_to_preview(rect), p))
            .map(DragMode::Resize);

        if mode.is_none() {
            let hit = boxes.hit_test(mapper.to_doc(p)).map(str::to_string);
            match (hit, multi) {
                (Some(key), false) => {
                    selection.clear();
                    selection.insert(key);
                }
                (Some(key), true) => {
                    if !selection.remove(&key) {
                        selection.insert(key);
                    }
                }
                (None, false) => selection.clear(),
                (None, true) => {}
            }
            if !selection.is_empty() {
                mode = Some(DragMode::Move);
            }
        }

        match mode {
            Some(mode) => {
                self.session = Some(capture(p, mode, doc, boxes, selection));
                self.state = ControllerState::Dragging(mode);
            }
            None => self.state = ControllerState::Idle,
        }

        Press {
            selection_changed: *selection != before,
            mode,
        }
    }

    /// Apply the drag for the pointer now at `p`. Returns whether the
    /// document was touched.
    pub fn pointer_move(
        &mut self,
        p: PointF,
        doc: &mut Document,
        mapper: &CoordinateMapper,
    ) -> Result<bool, EtiquetaError> {
        let Some(session) = &self.session else {
            return Ok(false);
        };
        let (dx, dy) = mapper.delta_to_doc(p.x - session.origin.x, p.y - session.origin.y);

        match session.mode {
            DragMode::Move => {
                let mut touched = false;
                for (key, item) in &session.items {
                    if doc.element(key).is_some() {
                        doc.set_position(key, item.position.offset_rounded(dx, dy))?;
                        touched = true;
                    }
                }
                Ok(touched)
            }
            DragMode::Resize(handle) => {
                let mut items = session.items.iter();
                let (Some((key, item)), None) = (items.next(), items.next()) else {
                    return Ok(false);
                };
                let Some(bbox) = item.bbox else {
                    return Ok(false);
                };
                let (orig_w, orig_h) = (bbox.width() as f64, bbox.height() as f64);
                if orig_w <= 0.0 || orig_h <= 0.0 {
                    return Ok(false);
                }

                let (w, h) = resized_extent(handle, orig_w, orig_h, dx, dy);
                match (item.size, item.font_size) {
                    (Some(_), _) => doc.set_size(key, barcode_size(w, h))?,
                    (None, Some(font_size)) => {
                        doc.set_font_size(key, scaled_font_size(font_size, h / orig_h))?
                    }
                    (None, None) => return Ok(false),
                }
                Ok(true)
            }
        }
    }

    /// End the gesture. Returns whether a drag was in progress, in which
    /// case the caller re-renders.
    pub fn pointer_up(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.state = ControllerState::Idle;
        self.session = None;
        was_dragging
    }

    /// Cursor for a hover at `p` with no button held.
    pub fn hover(
        &self,
        p: PointF,
        selection: &Selection,
        boxes: &BBoxMap,
        mapper: &CoordinateMapper,
    ) -> Cursor {
        let Some(rect) = single_selection_box(selection, boxes) else {
            return Cursor::Default;
        };
        let preview = mapper.rect_to_preview(rect);
        if let Some(handle) = hit_handle(preview, p) {
            handle.cursor()
        } else if preview.contains(p) {
            Cursor::Move
        } else {
            Cursor::Default
        }
    }
}

fn single_selection_box(selection: &Selection, boxes: &BBoxMap) -> Option<Rect> {
    if selection.len() != 1 {
        return None;
    }
    selection.iter().next().and_then(|key| boxes.get(key))
}

fn capture(
    origin: PointF,
    mode: DragMode,
    doc: &Document,
    boxes: &BBoxMap,
    selection: &Selection,
) -> TransformSession {
    let items = selection
        .iter()
        .filter_map(|key| {
            let element = doc.element(key)?;
            Some((
                key.clone(),
                SessionItem {
                    position: element.position(),
                    size: element.size(),
                    font_size: element.font_size(),
                    bbox: boxes.get(key),
                },
            ))
        })
        .collect();
    TransformSession { origin, mode, items }
}

// ============================================================================
// RESIZE ARITHMETIC
// ============================================================================

/// New `(width, height)` for dragging `handle` by `(dx, dy)` doc units.
///
/// Left/top edges shrink with positive deltas, right/bottom edges grow.
/// Corner handles keep the original aspect ratio, driven by whichever
/// axis changed more relative to its original length (width on a tie).
pub fn resized_extent(handle: Handle, orig_w: f64, orig_h: f64, dx: f64, dy: f64) -> (f64, f64) {
    let edges = handle.edges();
    let mut w = orig_w;
    let mut h = orig_h;
    if edges.left {
        w -= dx;
    }
    if edges.right {
        w += dx;
    }
    if edges.top {
        h -= dy;
    }
    if edges.bottom {
        h += dy;
    }

    if handle.is_corner() && orig_w > 0.0 && orig_h > 0.0 {
        let ratio = orig_w / orig_h;
        let change_w = (w - orig_w).abs() / orig_w;
        let change_h = (h - orig_h).abs() / orig_h;
        if change_w >= change_h {
            h = w / ratio;
        } else {
            w = h * ratio;
        }
    }
    (w, h)
}

/// Barcode box for a resize result, each side at least [`MIN_BARCODE_SIDE`].
pub fn barcode_size(w: f64, h: f64) -> Size {
    Size::new(
        (w.round() as i32).max(MIN_BARCODE_SIDE),
        (h.round() as i32).max(MIN_BARCODE_SIDE),
    )
}

/// Font size scaled by the box height ratio, at least [`MIN_FONT_SIZE`].
pub fn scaled_font_size(start: i32, height_ratio: f64) -> i32 {
    ((start as f64 * height_ratio).round() as i32).max(MIN_FONT_SIZE)
}
