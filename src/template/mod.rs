//! # Template Persistence
//!
//! Documents are stored as JSON with three sections:
//!
//! ```json
//! {
//!   "fields":   { "title": "Wanderers", "list_price": "3080" },
//!   "config":   { "taxRatePercent": 10.0, "exportWidth": 800, ... },
//!   "elements": {
//!     "barcode": { "pos": [408, 47], "size": [300, 70], "fontSize": 0, "tag": "barcode", ... },
//!     "title":   { "pos": [32, 173], "size": [0, 0], "fontSize": 25, "tag": "title", "anchor": "w", ... }
//!   }
//! }
//! ```
//!
//! Loading never fails on partial input: missing sections and keys take
//! their defaults. Only malformed JSON (or a section of the wrong shape) is
//! a [`EtiquetaError::Persistence`] error.
//!
//! ## Example
//!
//! ```
//! use etiqueta::document::Document;
//! use etiqueta::template;
//!
//! let doc = Document::default_scene();
//! let json = template::to_json(&doc).unwrap();
//! let back = template::from_json(&json).unwrap();
//! assert_eq!(back.elements(), doc.elements());
//! ```

mod schema;

pub use schema::Scalar;

use image::{ImageFormat, RgbaImage};
use serde::ser::{Serialize, SerializeMap, SerializeStruct, Serializer};
use std::collections::BTreeMap;
use std::path::Path;

use crate::document::{
    Anchor, BarcodeElement, Config, Document, Element, ElementMap, Fields, Size, TextElement, tags,
};
use crate::error::EtiquetaError;
use crate::font::FontBook;
use crate::geometry::Point;
use crate::render;
use schema::{ConfigSection, ElementSection, SavedElement, TemplateFile};

/// Font size for text elements that do not name one.
const DEFAULT_FONT_SIZE: i32 = 20;
/// Box for barcode elements that do not name one.
const DEFAULT_BARCODE_SIZE: Size = Size::new(300, 70);

// ============================================================================
// LOAD
// ============================================================================

/// Parse a template.
pub fn from_json(json: &str) -> Result<Document, EtiquetaError> {
    let file: TemplateFile = serde_json::from_str(json)
        .map_err(|e| EtiquetaError::Persistence(format!("Invalid template: {}", e)))?;

    let fields: Fields = file
        .fields
        .into_iter()
        .map(|(k, v)| (k, v.map(Scalar::into_text).unwrap_or_default()))
        .collect();
    let config = config_from_section(file.config);

    let mut elements = ElementMap::new();
    for (key, value) in file.elements {
        let section: ElementSection = serde_json::from_value(value).map_err(|e| {
            EtiquetaError::Persistence(format!("Invalid element '{}': {}", key, e))
        })?;
        let element = element_from_section(&key, section);
        // Keys of a JSON object are unique
        let _ = elements.insert(key, element);
    }

    Ok(Document::from_parts(fields, config, elements))
}

/// Read a template file.
pub fn load(path: &Path) -> Result<Document, EtiquetaError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| EtiquetaError::Persistence(format!("{}: {}", path.display(), e)))?;
    let doc = from_json(&json)?;
    tracing::info!(path = %path.display(), elements = doc.elements().len(), "template loaded");
    Ok(doc)
}

fn config_from_section(section: ConfigSection) -> Config {
    let defaults = Config::default();
    let mut config = defaults.clone();

    if let Some(v) = section.text_font_family {
        config.text_font = v.into_text();
    }
    if let Some(v) = section.accent_font_family {
        config.accent_font = v.into_text();
    }
    if let Some(v) = section.tax_rate_percent {
        match v.as_f64() {
            Some(rate) if rate.is_finite() && rate >= 0.0 => config.tax_rate = rate,
            _ => tracing::warn!(value = ?v, "invalid tax rate, using default"),
        }
    }
    if let Some(v) = section.strikethrough_enabled {
        config.strikethrough = v.as_bool().unwrap_or(defaults.strikethrough);
    }
    if let Some(v) = section.price_area_fill {
        let raw = v.into_text();
        match raw.parse() {
            Ok(color) => config.price_area_fill = color,
            Err(e) => tracing::warn!(error = %e, "invalid price area fill, using default"),
        }
    }
    if let Some(v) = section.export_width {
        config.export_width = positive_u32(&v).unwrap_or(defaults.export_width);
    }
    if let Some(v) = section.export_height {
        config.export_height = positive_u32(&v).unwrap_or(defaults.export_height);
    }
    if let Some(v) = section.show_border {
        config.show_border = v.as_bool().unwrap_or(defaults.show_border);
    }
    config
}

fn positive_u32(v: &Scalar) -> Option<u32> {
    v.as_i64()
        .filter(|n| *n > 0)
        .and_then(|n| u32::try_from(n).ok())
}

fn pair(v: Option<[Scalar; 2]>) -> Option<(i32, i32)> {
    let [a, b] = v?;
    let conv = |s: &Scalar| s.as_i64().and_then(|n| i32::try_from(n).ok());
    Some((conv(&a)?, conv(&b)?))
}

fn element_from_section(key: &str, section: ElementSection) -> Element {
    let tag = section.tag.clone().unwrap_or_else(|| key.to_string());
    let (x, y) = pair(section.pos).unwrap_or((0, 0));
    let position = Point::new(x, y);

    if tag == tags::BARCODE || key == tags::BARCODE {
        let size = pair(section.size)
            .map(|(w, h)| Size::new(w, h))
            .unwrap_or(DEFAULT_BARCODE_SIZE);
        let data = section.data.map(Scalar::into_text).unwrap_or_default();
        return BarcodeElement::new(position, size).data(data).into();
    }

    let font_size = section
        .font_size
        .and_then(|v| v.as_i64())
        .and_then(|n| i32::try_from(n).ok())
        .unwrap_or(DEFAULT_FONT_SIZE);
    let anchor = match section.anchor.as_deref() {
        None => Anchor::default(),
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            tracing::warn!(element = key, error = %e, "unknown anchor, using nw");
            Anchor::default()
        }),
    };
    let vertical = section.vertical.and_then(|v| v.as_bool()).unwrap_or(false);
    let line_spacing = section
        .line_spacing
        .and_then(|v| v.as_f64())
        .map(|f| f as f32)
        .filter(|f| f.is_finite() && *f > 0.0)
        .unwrap_or(1.0);

    let mut text = TextElement::new(tag, position, font_size)
        .anchor(anchor)
        .line_spacing(line_spacing);
    text.vertical = vertical;
    text.into()
}

// ============================================================================
// SAVE
// ============================================================================

/// Borrowed view of a document in the on-disk layout.
struct SavedTemplate<'a>(&'a Document);

struct SavedElements<'a>(&'a ElementMap);

impl Serialize for SavedTemplate<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields: BTreeMap<&str, &str> = self.0.fields().iter().collect();
        let mut s = serializer.serialize_struct("Template", 3)?;
        s.serialize_field("fields", &fields)?;
        s.serialize_field("config", self.0.config())?;
        s.serialize_field("elements", &SavedElements(self.0.elements()))?;
        s.end()
    }
}

impl Serialize for SavedElements<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, element) in self.0.iter() {
            map.serialize_entry(key, &saved_element(element))?;
        }
        map.end()
    }
}

fn saved_element(element: &Element) -> SavedElement<'_> {
    match element {
        Element::Text(t) => SavedElement {
            pos: [t.position.x, t.position.y],
            size: [0, 0],
            font_size: t.font_size,
            tag: &t.tag,
            anchor: t.anchor.name(),
            vertical: t.vertical,
            line_spacing: Some(t.line_spacing),
            data: "",
        },
        Element::Barcode(b) => SavedElement {
            pos: [b.center.x, b.center.y],
            size: [b.size.width, b.size.height],
            font_size: 0,
            tag: tags::BARCODE,
            anchor: Anchor::Center.name(),
            vertical: false,
            line_spacing: None,
            data: &b.data,
        },
    }
}

/// Serialize a document as pretty-printed template JSON.
pub fn to_json(doc: &Document) -> Result<String, EtiquetaError> {
    serde_json::to_string_pretty(&SavedTemplate(doc))
        .map_err(|e| EtiquetaError::Persistence(format!("Failed to serialize template: {}", e)))
}

/// Write a template file.
pub fn save(doc: &Document, path: &Path) -> Result<(), EtiquetaError> {
    let json = to_json(doc)?;
    std::fs::write(path, json)
        .map_err(|e| EtiquetaError::Persistence(format!("{}: {}", path.display(), e)))?;
    tracing::info!(path = %path.display(), "template saved");
    Ok(())
}

// ============================================================================
// EXPORT
// ============================================================================

/// Save a rendered image as PNG.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), EtiquetaError> {
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| EtiquetaError::Image(format!("Failed to save PNG: {}", e)))
}

/// Render the document at export size and write it as PNG.
pub fn export_png(doc: &Document, fonts: &FontBook, path: &Path) -> Result<(), EtiquetaError> {
    let rendered = render::render(doc, fonts);
    save_png(&rendered.image, path)?;
    tracing::info!(
        path = %path.display(),
        width = rendered.image.width(),
        height = rendered.image.height(),
        "exported"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_config_uses_defaults() {
        let doc = from_json(r#"{"fields": {"title": "x"}, "elements": {}}"#).unwrap();
        assert_eq!(doc.config(), &Config::default());
        assert_eq!(doc.fields().get("title"), Some("x"));
    }

    #[test]
    fn test_empty_object_is_empty_document() {
        let doc = from_json("{}").unwrap();
        assert!(doc.elements().is_empty());
        assert!(doc.fields().is_empty());
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(matches!(from_json("{not json"), Err(EtiquetaError::Persistence(_))));
        assert!(matches!(
            from_json(r#"{"elements": {"a": 5}}"#),
            Err(EtiquetaError::Persistence(_))
        ));
    }

    #[test]
    fn test_legacy_template() {
        let json = r##"{
            "info": {"barcode_data": "G1068036", "used_price_base": 2273},
            "config": {"export_width": "640", "export_height": 320, "price_area_color": "#ddeeff",
                       "strikethrough": 0, "tax_rate": 8.0},
            "elements": {
                "barcode": {"pos": [408, 47], "size": [300, 70], "font_size": 0, "tag": "barcode", "vertical": false},
                "cat1": {"pos": [101, 131], "size": [0, 0], "font_size": 24, "tag": "cat1", "anchor": "s",
                         "vertical": true, "line_spacing": 1.1}
            }
        }"##;
        let doc = from_json(json).unwrap();
        let config = doc.config();
        assert_eq!((config.export_width, config.export_height), (640, 320));
        assert_eq!(config.price_area_fill.to_hex(), "#ddeeff");
        assert!(!config.strikethrough);
        assert_eq!(config.tax_rate, 8.0);
        assert_eq!(doc.fields().get("used_price_base"), Some("2273"));

        let keys: Vec<_> = doc.elements().keys().collect();
        assert_eq!(keys, vec!["barcode", "cat1"]);
        let b = doc.element("barcode").unwrap().as_barcode().unwrap();
        assert_eq!(b.size, Size::new(300, 70));
        assert!(b.data.is_empty());
        let t = doc.element("cat1").unwrap().as_text().unwrap();
        assert_eq!(t.anchor, Anchor::S);
        assert!(t.vertical);
        assert_eq!(t.line_spacing, 1.1);
    }

    #[test]
    fn test_element_defaults() {
        let doc = from_json(r#"{"elements": {"note": {}, "code": {"anchor": "middle"}}}"#).unwrap();
        let note = doc.element("note").unwrap().as_text().unwrap();
        assert_eq!(note.tag, "note");
        assert_eq!(note.position, Point::new(0, 0));
        assert_eq!(note.font_size, DEFAULT_FONT_SIZE);
        assert_eq!(note.anchor, Anchor::Nw);
        assert_eq!(note.line_spacing, 1.0);
        let code = doc.element("code").unwrap().as_text().unwrap();
        assert_eq!(code.anchor, Anchor::Nw);
    }

    #[test]
    fn test_invalid_config_values_fall_back() {
        let json = r#"{"config": {"exportWidth": 0, "priceAreaFill": "teal", "taxRatePercent": -3}}"#;
        let doc = from_json(json).unwrap();
        assert_eq!(doc.config(), &Config::default());
    }

    #[test]
    fn test_saved_layout() {
        let mut doc = Document::new();
        doc.set_field("title", "x");
        doc.add_element(
            "barcode",
            BarcodeElement::new(Point::new(450, 82), Size::new(300, 70)).data("ABC123"),
        )
        .unwrap();
        doc.add_element("title", TextElement::new("title", Point::new(32, 173), 25).anchor(Anchor::W))
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&to_json(&doc).unwrap()).unwrap();
        assert_eq!(
            value["elements"]["barcode"],
            serde_json::json!({
                "pos": [450, 82], "size": [300, 70], "fontSize": 0, "tag": "barcode",
                "anchor": "center", "vertical": false, "data": "ABC123"
            })
        );
        assert_eq!(
            value["elements"]["title"],
            serde_json::json!({
                "pos": [32, 173], "size": [0, 0], "fontSize": 25, "tag": "title",
                "anchor": "w", "vertical": false, "lineSpacing": 1.0
            })
        );
        assert_eq!(value["config"]["exportWidth"], 800);
        assert_eq!(value["config"]["priceAreaFill"], "#ffffff");
        assert_eq!(value["fields"]["title"], "x");
    }

    #[test]
    fn test_round_trip_default_scene() {
        let mut doc = Document::default_scene();
        doc.set_vertical("cat1", true).unwrap();
        doc.set_line_spacing("cat1", 1.1).unwrap();
        doc.add_custom_text("hello");

        let back = from_json(&to_json(&doc).unwrap()).unwrap();
        assert_eq!(back, doc);
    }
}
