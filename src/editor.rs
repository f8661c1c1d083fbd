//! # Editor
//!
//! The single owner of the sticker state: document, selection, transform
//! controller and the last render. Form and preview collaborators mutate
//! through its methods and learn about changes from [`EditorEvent`]
//! callbacks.
//!
//! Re-rendering happens on discrete events only (an edit, a selection
//! change, pointer release). A drag mutates the document on every move but
//! the image, box map and overlay stay those of the last render until the
//! pointer is released.

use image::RgbaImage;
use std::path::Path;

use crate::document::{Config, Document, Element, Property};
use crate::error::EtiquetaError;
use crate::font::FontBook;
use crate::geometry::{BBoxMap, PointF, RectF};
use crate::render::{self, Rendered, preview};
use crate::template;
use crate::transform::{
    ControllerState, CoordinateMapper, Cursor, Handle, Selection, TransformController, handles,
};

/// Change notifications for UI collaborators.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// A render pass finished; image and box map are fresh.
    Rendered,
    SelectionChanged,
    DocumentChanged,
    CursorChanged(Cursor),
}

/// Preview-space selection geometry for drawing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    /// One frame per selected element that has a box.
    pub frames: Vec<(String, RectF)>,
    /// Resize handles, only for a single selection.
    pub handles: Vec<(Handle, RectF)>,
}

type Observer = Box<dyn FnMut(&EditorEvent)>;

pub struct Editor {
    doc: Document,
    selection: Selection,
    fonts: FontBook,
    mapper: CoordinateMapper,
    controller: TransformController,
    rendered: Rendered,
    cursor: Cursor,
    observers: Vec<Observer>,
}

impl Editor {
    /// Take ownership of a document and render it once. The preview starts
    /// at export size.
    pub fn new(doc: Document, fonts: FontBook) -> Self {
        let config = doc.config();
        let mapper = CoordinateMapper::identity(config.export_width, config.export_height);
        let rendered = render::render(&doc, &fonts);
        Self {
            doc,
            selection: Selection::new(),
            fonts,
            mapper,
            controller: TransformController::new(),
            rendered,
            cursor: Cursor::Default,
            observers: Vec::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    pub fn rendered(&self) -> &Rendered {
        &self.rendered
    }

    pub fn boxes(&self) -> &BBoxMap {
        &self.rendered.boxes
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn controller_state(&self) -> ControllerState {
        self.controller.state()
    }

    /// Register a change callback.
    pub fn subscribe(&mut self, observer: impl FnMut(&EditorEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn emit(&mut self, event: EditorEvent) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }

    /// Run a full render pass and refresh the box map.
    pub fn refresh(&mut self) {
        let config = self.doc.config();
        self.mapper.set_export_size(config.export_width, config.export_height);
        self.rendered = render::render(&self.doc, &self.fonts);
        self.emit(EditorEvent::Rendered);
    }

    /// The last render letterboxed into the preview surface.
    pub fn preview_image(&self) -> RgbaImage {
        preview::letterbox(&self.rendered.image, &self.mapper)
    }

    pub fn set_preview_size(&mut self, width: f64, height: f64) {
        self.mapper.set_preview_size(width, height);
    }

    pub fn register_font(&mut self, family: &str, bytes: Vec<u8>) -> Result<(), EtiquetaError> {
        self.fonts.register(family, bytes)?;
        self.refresh();
        Ok(())
    }

    // ========================================================================
    // DOCUMENT EDITS
    // ========================================================================

    /// Apply a document edit. On success the document is re-rendered; on
    /// failure nothing changes.
    pub fn edit<T>(
        &mut self,
        f: impl FnOnce(&mut Document) -> Result<T, EtiquetaError>,
    ) -> Result<T, EtiquetaError> {
        let out = f(&mut self.doc)?;
        self.prune_selection();
        self.emit(EditorEvent::DocumentChanged);
        self.refresh();
        Ok(out)
    }

    pub fn set_field(&mut self, key: &str, value: &str) {
        // Infallible edit
        let _ = self.edit(|doc| {
            doc.set_field(key, value);
            Ok(())
        });
    }

    pub fn set_config(&mut self, config: Config) -> Result<(), EtiquetaError> {
        self.edit(|doc| doc.set_config(config))
    }

    /// Raw text input from a form field.
    pub fn set_property(&mut self, key: &str, property: Property, raw: &str) -> Result<(), EtiquetaError> {
        self.edit(|doc| doc.set_property(key, property, raw))
    }

    pub fn add_element(&mut self, key: &str, element: impl Into<Element>) -> Result<(), EtiquetaError> {
        self.edit(|doc| doc.add_element(key, element))
    }

    pub fn add_custom_text(&mut self, text: &str) -> String {
        let key = self.doc.add_custom_text(text);
        self.emit(EditorEvent::DocumentChanged);
        self.refresh();
        key
    }

    /// Remove an element, dropping it from the selection too.
    pub fn remove_element(&mut self, key: &str) -> Option<Element> {
        let removed = self.doc.remove_element(key)?;
        self.prune_selection();
        self.emit(EditorEvent::DocumentChanged);
        self.refresh();
        Some(removed)
    }

    /// Replace the selection programmatically. Unknown keys are ignored.
    pub fn select<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let next: Selection = keys
            .into_iter()
            .map(Into::into)
            .filter(|k: &String| self.doc.element(k).is_some())
            .collect();
        if next != self.selection {
            self.selection = next;
            self.emit(EditorEvent::SelectionChanged);
        }
    }

    fn prune_selection(&mut self) {
        let before = self.selection.len();
        let doc = &self.doc;
        self.selection.retain(|k| doc.element(k).is_some());
        if self.selection.len() != before {
            self.emit(EditorEvent::SelectionChanged);
        }
    }

    // ========================================================================
    // POINTER
    // ========================================================================

    /// Button press at a preview point. `multi` is the multi-select
    /// modifier.
    pub fn pointer_down(&mut self, p: PointF, multi: bool) {
        let press = self.controller.pointer_down(
            p,
            multi,
            &self.doc,
            &self.rendered.boxes,
            &self.mapper,
            &mut self.selection,
        );
        if press.selection_changed {
            self.emit(EditorEvent::SelectionChanged);
        }
    }

    /// Pointer motion with the button held.
    pub fn pointer_move(&mut self, p: PointF) -> Result<(), EtiquetaError> {
        if self.controller.pointer_move(p, &mut self.doc, &self.mapper)? {
            self.emit(EditorEvent::DocumentChanged);
        }
        Ok(())
    }

    /// Button release. A finished drag triggers one render pass.
    pub fn pointer_up(&mut self) {
        if self.controller.pointer_up() {
            self.refresh();
        }
    }

    /// Pointer motion with no button held. Returns the new cursor.
    ///
    /// The cursor is frozen while a drag is in progress.
    pub fn hover(&mut self, p: PointF) -> Cursor {
        if self.controller.is_dragging() {
            return self.cursor;
        }
        let cursor = self
            .controller
            .hover(p, &self.selection, &self.rendered.boxes, &self.mapper);
        if cursor != self.cursor {
            self.cursor = cursor;
            self.emit(EditorEvent::CursorChanged(cursor));
        }
        cursor
    }

    /// Selection frames and handles from the last render.
    pub fn overlay(&self) -> Overlay {
        let frames: Vec<(String, RectF)> = self
            .selection
            .iter()
            .filter_map(|k| {
                let rect = self.rendered.boxes.get(k)?;
                Some((k.clone(), self.mapper.rect_to_preview(rect)))
            })
            .collect();
        let handles = match frames.as_slice() {
            [(_, frame)] if self.selection.len() == 1 => handles::handle_rects(*frame),
            _ => Vec::new(),
        };
        Overlay { frames, handles }
    }

    // ========================================================================
    // PERSISTENCE
    // ========================================================================

    /// Load a template, replacing the document and clearing the selection.
    ///
    /// On failure the editor falls back to the default scene and the error
    /// is returned.
    pub fn load_template(&mut self, path: &Path) -> Result<(), EtiquetaError> {
        let result = template::load(path);
        let (doc, outcome) = match result {
            Ok(doc) => (doc, Ok(())),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "template load failed, using default scene");
                (Document::default_scene(), Err(e))
            }
        };
        self.doc = doc;
        self.controller.pointer_up();
        if !self.selection.is_empty() {
            self.selection.clear();
            self.emit(EditorEvent::SelectionChanged);
        }
        self.emit(EditorEvent::DocumentChanged);
        self.refresh();
        outcome
    }

    pub fn save_template(&self, path: &Path) -> Result<(), EtiquetaError> {
        template::save(&self.doc, path)
    }

    /// Write the last render at export size.
    pub fn export_png(&self, path: &Path) -> Result<(), EtiquetaError> {
        template::save_png(&self.rendered.image, path)
    }
}
