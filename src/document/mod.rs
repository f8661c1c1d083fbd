//! # Scene Model
//!
//! A [`Document`] is the whole sticker: field values, render configuration
//! and an insertion-ordered set of elements. It is mutated only through the
//! methods below, which validate first and leave the document untouched on
//! failure.
//!
//! ```
//! use etiqueta::document::{Anchor, Document, TextElement};
//! use etiqueta::geometry::Point;
//!
//! let mut doc = Document::new();
//! doc.set_field("title", "Wanderers");
//! doc.add_element("title", TextElement::new("title", Point::new(32, 173), 25).anchor(Anchor::W))
//!     .unwrap();
//!
//! // Font sizes must stay positive
//! assert!(doc.set_font_size("title", 0).is_err());
//! assert_eq!(doc.element("title").unwrap().font_size(), Some(25));
//! ```

mod elements;
pub mod fields;
pub mod types;

pub use elements::ElementMap;
pub use fields::{Fields, Pricing, TextStyle, semantic_text, tags};
pub use types::*;

use crate::error::EtiquetaError;
use crate::geometry::Point;

/// Key prefix for user-added text elements.
pub const CUSTOM_TEXT_PREFIX: &str = "custom_text_";

/// A property editable through raw text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    X,
    Y,
    FontSize,
    Width,
    Height,
    LineSpacing,
}

/// The sticker scene.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    fields: Fields,
    config: Config,
    elements: ElementMap,
    custom_counter: u32,
}

impl Document {
    /// Empty document with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a document without validating element values. Used by the
    /// template loader, which tolerates partial input; non-positive sizes are
    /// skipped at render time.
    pub(crate) fn from_parts(fields: Fields, config: Config, elements: ElementMap) -> Self {
        let custom_counter = elements
            .keys()
            .filter_map(|k| k.strip_prefix(CUSTOM_TEXT_PREFIX)?.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        Self {
            fields,
            config,
            elements,
            custom_counter,
        }
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn elements(&self) -> &ElementMap {
        &self.elements
    }

    pub fn element(&self, key: &str) -> Option<&Element> {
        self.elements.get(key)
    }

    // ========================================================================
    // FIELDS AND CONFIG
    // ========================================================================

    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.set(key, value);
    }

    /// Replace the configuration after checking its invariants.
    pub fn set_config(&mut self, config: Config) -> Result<(), EtiquetaError> {
        config.validate().map_err(EtiquetaError::Validation)?;
        self.config = config;
        Ok(())
    }

    // ========================================================================
    // ELEMENTS
    // ========================================================================

    /// Append an element. Fails on a taken key or non-positive dimensions.
    pub fn add_element(
        &mut self,
        key: impl Into<String>,
        element: impl Into<Element>,
    ) -> Result<(), EtiquetaError> {
        let key = key.into();
        let element = element.into();
        validate_element(&key, &element)?;
        self.elements
            .insert(key.clone(), element)
            .map_err(|_| EtiquetaError::validation(format!("element '{}' already exists", key)))
    }

    /// Add a `custom_text_N` element with a matching field and return its key.
    pub fn add_custom_text(&mut self, text: impl Into<String>) -> String {
        loop {
            self.custom_counter += 1;
            let key = format!("{}{}", CUSTOM_TEXT_PREFIX, self.custom_counter);
            if self.elements.contains_key(&key) {
                continue;
            }
            let element = TextElement::new(key.clone(), Point::new(50, 50), 20);
            self.fields.set(key.clone(), text);
            // Fresh key and positive size, cannot fail.
            let _ = self.elements.insert(key.clone(), element.into());
            return key;
        }
    }

    /// Remove an element. Custom text elements take their field with them.
    pub fn remove_element(&mut self, key: &str) -> Option<Element> {
        let removed = self.elements.remove(key)?;
        if key.starts_with(CUSTOM_TEXT_PREFIX) {
            self.fields.remove(key);
        }
        Some(removed)
    }

    pub fn set_position(&mut self, key: &str, position: Point) -> Result<(), EtiquetaError> {
        self.element_mut(key)?.set_position(position);
        Ok(())
    }

    pub fn set_font_size(&mut self, key: &str, font_size: i32) -> Result<(), EtiquetaError> {
        if font_size <= 0 {
            return Err(EtiquetaError::validation(format!(
                "font size must be positive, got {}",
                font_size
            )));
        }
        self.text_mut(key)?.font_size = font_size;
        Ok(())
    }

    pub fn set_size(&mut self, key: &str, size: Size) -> Result<(), EtiquetaError> {
        if !size.is_positive() {
            return Err(EtiquetaError::validation(format!(
                "size must be positive, got {}x{}",
                size.width, size.height
            )));
        }
        self.barcode_mut(key)?.size = size;
        Ok(())
    }

    pub fn set_line_spacing(&mut self, key: &str, line_spacing: f32) -> Result<(), EtiquetaError> {
        if !(line_spacing.is_finite() && line_spacing > 0.0) {
            return Err(EtiquetaError::validation(format!(
                "line spacing must be positive, got {}",
                line_spacing
            )));
        }
        self.text_mut(key)?.line_spacing = line_spacing;
        Ok(())
    }

    pub fn set_vertical(&mut self, key: &str, vertical: bool) -> Result<(), EtiquetaError> {
        self.text_mut(key)?.vertical = vertical;
        Ok(())
    }

    pub fn set_anchor(&mut self, key: &str, anchor: Anchor) -> Result<(), EtiquetaError> {
        self.text_mut(key)?.anchor = anchor;
        Ok(())
    }

    pub fn set_barcode_data(&mut self, key: &str, data: impl Into<String>) -> Result<(), EtiquetaError> {
        self.barcode_mut(key)?.data = data.into();
        Ok(())
    }

    /// Apply a raw text edit from a form field.
    ///
    /// Non-numeric input is a validation error and changes nothing.
    pub fn set_property(&mut self, key: &str, property: Property, raw: &str) -> Result<(), EtiquetaError> {
        let element = self
            .element(key)
            .ok_or_else(|| EtiquetaError::validation(format!("unknown element '{}'", key)))?;
        let raw = raw.trim();
        let int = || {
            raw.parse::<i32>()
                .map_err(|_| EtiquetaError::validation(format!("'{}' is not an integer", raw)))
        };

        match property {
            Property::X => {
                let p = element.position();
                self.set_position(key, Point::new(int()?, p.y))
            }
            Property::Y => {
                let p = element.position();
                self.set_position(key, Point::new(p.x, int()?))
            }
            Property::FontSize => self.set_font_size(key, int()?),
            Property::Width | Property::Height => {
                let current = element.size().ok_or_else(|| {
                    EtiquetaError::validation(format!("element '{}' has no size", key))
                })?;
                let size = match property {
                    Property::Width => Size::new(int()?, current.height),
                    _ => Size::new(current.width, int()?),
                };
                self.set_size(key, size)
            }
            Property::LineSpacing => {
                let value = raw
                    .parse::<f32>()
                    .map_err(|_| EtiquetaError::validation(format!("'{}' is not a number", raw)))?;
                self.set_line_spacing(key, value)
            }
        }
    }

    fn element_mut(&mut self, key: &str) -> Result<&mut Element, EtiquetaError> {
        self.elements
            .get_mut(key)
            .ok_or_else(|| EtiquetaError::validation(format!("unknown element '{}'", key)))
    }

    fn text_mut(&mut self, key: &str) -> Result<&mut TextElement, EtiquetaError> {
        match self.element_mut(key)? {
            Element::Text(t) => Ok(t),
            Element::Barcode(_) => Err(EtiquetaError::validation(format!(
                "element '{}' is not a text element",
                key
            ))),
        }
    }

    fn barcode_mut(&mut self, key: &str) -> Result<&mut BarcodeElement, EtiquetaError> {
        match self.element_mut(key)? {
            Element::Barcode(b) => Ok(b),
            Element::Text(_) => Err(EtiquetaError::validation(format!(
                "element '{}' is not a barcode",
                key
            ))),
        }
    }

    // ========================================================================
    // DEFAULT SCENE
    // ========================================================================

    /// The stock second-hand book sticker.
    pub fn default_scene() -> Self {
        let fields: Fields = [
            ("cat1", "趣味系書籍"),
            ("code", "G1068036"),
            ("barcode_data", "G1068036"),
            ("cat2", "原画集マンガアニメ系"),
            ("title", "ソードアート・オンライン abec画集 Wanderers"),
            ("list_price", "3080"),
            ("used_price_base", "2273"),
            ("sale_date", "20.03.27"),
            ("tax_date", "24.06.06"),
        ]
        .into_iter()
        .collect();

        let text = |tag: &str, x: i32, y: i32, size: i32, anchor: Anchor| {
            Element::Text(TextElement::new(tag, Point::new(x, y), size).anchor(anchor))
        };

        let mut elements = ElementMap::new();
        let defaults = [
            (
                tags::BARCODE,
                Element::Barcode(BarcodeElement::new(Point::new(408, 47), Size::new(300, 70))),
            ),
            ("cat1", text("cat1", 101, 131, 24, Anchor::S)),
            ("code", text("code", 302, 83, 24, Anchor::N)),
            ("cat2", text("cat2", 623, 133, 24, Anchor::S)),
            ("title", text("title", 32, 173, 25, Anchor::W)),
            ("list_price", text("list_price", 31, 222, 24, Anchor::W)),
            ("used_label", text("used_label", 117, 282, 70, Anchor::Center)),
            ("tax_date_label", text("tax_date_label", 72, 318, 32, Anchor::N)),
            ("tax_date_value", text("tax_date_value", 32, 394, 24, Anchor::W)),
            ("release_date", text("release_date", 776, 217, 24, Anchor::E)),
            ("price_breakdown", text("price_breakdown", 775, 259, 24, Anchor::E)),
            ("final_price", text("final_price", 600, 348, 100, Anchor::Center)),
        ];
        for (key, element) in defaults {
            // Distinct keys, cannot collide.
            let _ = elements.insert(key.to_string(), element);
        }

        Self::from_parts(fields, Config::default(), elements)
    }
}

fn validate_element(key: &str, element: &Element) -> Result<(), EtiquetaError> {
    match element {
        Element::Text(t) => {
            // Templates read this key and tag back as a barcode
            if key == tags::BARCODE || t.tag == tags::BARCODE {
                return Err(EtiquetaError::validation(format!(
                    "element '{}': text elements cannot use the barcode key or tag",
                    key
                )));
            }
            if t.font_size <= 0 {
                return Err(EtiquetaError::validation(format!(
                    "element '{}': font size must be positive, got {}",
                    key, t.font_size
                )));
            }
            if !(t.line_spacing.is_finite() && t.line_spacing > 0.0) {
                return Err(EtiquetaError::validation(format!(
                    "element '{}': line spacing must be positive, got {}",
                    key, t.line_spacing
                )));
            }
        }
        Element::Barcode(b) => {
            if !b.size.is_positive() {
                return Err(EtiquetaError::validation(format!(
                    "element '{}': size must be positive, got {}x{}",
                    key, b.size.width, b.size.height
                )));
            }
        }
    }
    Ok(())
}
