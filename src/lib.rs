//! # Etiqueta - Price Sticker Layout Engine
//!
//! Etiqueta renders second-hand book price stickers from a small scene
//! model and provides the geometry needed to edit them interactively on a
//! scaled preview. It provides:
//!
//! - **Scene model**: fields, configuration and anchored elements
//! - **Layout**: anchor-based text (horizontal and vertical stacking) and
//!   Code 128 barcodes
//! - **Compositing**: one export raster plus a per-element bounding box map
//! - **Transform**: doc ↔ preview mapping, selection, move and resize drags
//! - **Templates**: JSON persistence and PNG export
//!
//! ## Quick Start
//!
//! ```no_run
//! use etiqueta::{Document, FontBook, render, template};
//! use std::path::Path;
//!
//! let mut doc = Document::default_scene();
//! doc.set_field("title", "Wanderers");
//!
//! let mut fonts = FontBook::new();
//! fonts.register_file("Meiryo", Path::new("/usr/share/fonts/meiryo.ttc"))?;
//!
//! let rendered = render::render(&doc, &fonts);
//! println!("{} elements placed", rendered.boxes.len());
//!
//! template::save_png(&rendered.image, Path::new("sticker.png"))?;
//! template::save(&doc, Path::new("sticker.json"))?;
//!
//! # Ok::<(), etiqueta::EtiquetaError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`geometry`] | Points, rectangles and the bounding box map |
//! | [`document`] | Scene model and validated mutations |
//! | [`font`] | Font registry with alias fallback |
//! | [`render`] | Text and barcode layout, raster compositor |
//! | [`transform`] | Coordinate mapper and transform controller |
//! | [`template`] | JSON templates and PNG export |
//! | [`editor`] | Single owner of the editing session |
//! | [`error`] | Error types |

pub mod document;
pub mod editor;
pub mod error;
pub mod font;
pub mod geometry;
pub mod render;
pub mod template;
pub mod transform;

// Re-exports for convenience
pub use document::Document;
pub use editor::{Editor, EditorEvent};
pub use error::EtiquetaError;
pub use font::FontBook;
pub use render::Rendered;
