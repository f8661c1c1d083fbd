//! Element and configuration types for the scene model.
//!
//! Elements are a tagged variant ([`Element::Text`] / [`Element::Barcode`]);
//! optional properties are resolved to defaults once, at construction.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::geometry::Point;

// ============================================================================
// ANCHOR
// ============================================================================

/// Horizontal alignment of an anchor point against the ink box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

/// Vertical alignment of an anchor point against the ink box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

/// Nine-point alignment grid naming how a text position relates to its ink.
///
/// Uses compass names: `nw` is the top-left corner, `s` the bottom edge
/// midpoint, `center` the middle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    N,
    Ne,
    E,
    Se,
    S,
    Sw,
    W,
    #[default]
    Nw,
    Center,
}

impl Anchor {
    pub const ALL: [Anchor; 9] = [
        Anchor::N,
        Anchor::Ne,
        Anchor::E,
        Anchor::Se,
        Anchor::S,
        Anchor::Sw,
        Anchor::W,
        Anchor::Nw,
        Anchor::Center,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Anchor::N => "n",
            Anchor::Ne => "ne",
            Anchor::E => "e",
            Anchor::Se => "se",
            Anchor::S => "s",
            Anchor::Sw => "sw",
            Anchor::W => "w",
            Anchor::Nw => "nw",
            Anchor::Center => "center",
        }
    }

    pub fn halign(self) -> HAlign {
        match self {
            Anchor::W | Anchor::Sw | Anchor::Nw => HAlign::Left,
            Anchor::N | Anchor::S | Anchor::Center => HAlign::Center,
            Anchor::E | Anchor::Ne | Anchor::Se => HAlign::Right,
        }
    }

    pub fn valign(self) -> VAlign {
        match self {
            Anchor::N | Anchor::Ne | Anchor::Nw => VAlign::Top,
            Anchor::W | Anchor::E | Anchor::Center => VAlign::Middle,
            Anchor::S | Anchor::Se | Anchor::Sw => VAlign::Bottom,
        }
    }
}

impl FromStr for Anchor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Anchor::ALL
            .into_iter()
            .find(|a| a.name() == lower)
            .ok_or_else(|| format!("Unknown anchor '{}'", s))
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// ELEMENTS
// ============================================================================

/// Width × height in doc units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn is_positive(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// A run of text placed by anchor.
///
/// The text itself is not stored here: it is derived from the document
/// fields by `tag` at render time (see [`super::fields`]).
#[derive(Debug, Clone, PartialEq)]
pub struct TextElement {
    pub position: Point,
    /// Pixel size. Non-positive values are skipped at render time.
    pub font_size: i32,
    pub anchor: Anchor,
    /// Stack characters along the y-axis instead of the x-axis.
    pub vertical: bool,
    /// Line pitch multiplier, only meaningful when `vertical`.
    pub line_spacing: f32,
    /// Semantic tag selecting the text source and styling.
    pub tag: String,
}

impl TextElement {
    /// New element with anchor `nw`, horizontal, line spacing 1.0.
    pub fn new(tag: impl Into<String>, position: Point, font_size: i32) -> Self {
        Self {
            position,
            font_size,
            anchor: Anchor::Nw,
            vertical: false,
            line_spacing: 1.0,
            tag: tag.into(),
        }
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Switch to vertical stacking with the given line pitch multiplier.
    pub fn vertical(mut self, line_spacing: f32) -> Self {
        self.vertical = true;
        self.line_spacing = line_spacing;
        self
    }

    pub fn line_spacing(mut self, line_spacing: f32) -> Self {
        self.line_spacing = line_spacing;
        self
    }
}

/// A linear barcode resampled into a box centered on `center`.
#[derive(Debug, Clone, PartialEq)]
pub struct BarcodeElement {
    pub center: Point,
    pub size: Size,
    /// Payload. When empty, the `barcode_data` field is used instead.
    pub data: String,
}

impl BarcodeElement {
    pub fn new(center: Point, size: Size) -> Self {
        Self {
            center,
            size,
            data: String::new(),
        }
    }

    pub fn data(mut self, data: impl Into<String>) -> Self {
        self.data = data.into();
        self
    }
}

/// Scene element.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text(TextElement),
    Barcode(BarcodeElement),
}

impl Element {
    /// Anchor position for text, center for barcodes.
    pub fn position(&self) -> Point {
        match self {
            Element::Text(t) => t.position,
            Element::Barcode(b) => b.center,
        }
    }

    pub(crate) fn set_position(&mut self, p: Point) {
        match self {
            Element::Text(t) => t.position = p,
            Element::Barcode(b) => b.center = p,
        }
    }

    pub fn is_barcode(&self) -> bool {
        matches!(self, Element::Barcode(_))
    }

    pub fn font_size(&self) -> Option<i32> {
        match self {
            Element::Text(t) => Some(t.font_size),
            Element::Barcode(_) => None,
        }
    }

    pub fn size(&self) -> Option<Size> {
        match self {
            Element::Text(_) => None,
            Element::Barcode(b) => Some(b.size),
        }
    }

    pub fn as_text(&self) -> Option<&TextElement> {
        match self {
            Element::Text(t) => Some(t),
            Element::Barcode(_) => None,
        }
    }

    pub fn as_barcode(&self) -> Option<&BarcodeElement> {
        match self {
            Element::Barcode(b) => Some(b),
            Element::Text(_) => None,
        }
    }
}

impl From<TextElement> for Element {
    fn from(t: TextElement) -> Self {
        Element::Text(t)
    }
}

impl From<BarcodeElement> for Element {
    fn from(b: BarcodeElement) -> Self {
        Element::Barcode(b)
    }
}

// ============================================================================
// COLOR
// ============================================================================

/// Opaque RGB color, written as `#rrggbb` in templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const GRAY: Color = Color::rgb(128, 128, 128);

    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, 255])
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = String;

    /// Accepts `#rrggbb`, `#rgb` and the names `white`, `black`, `gray`/`grey`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "white" => return Ok(Color::WHITE),
            "black" => return Ok(Color::BLACK),
            "gray" | "grey" => return Ok(Color::GRAY),
            _ => {}
        }

        let hex = s
            .strip_prefix('#')
            .filter(|h| h.is_ascii())
            .ok_or_else(|| format!("Invalid color '{}'", s))?;
        let channel = |h: &str| u8::from_str_radix(h, 16).map_err(|_| format!("Invalid color '{}'", s));

        match hex.len() {
            6 => Ok(Color::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let r = channel(&hex[0..1])?;
                let g = channel(&hex[1..2])?;
                let b = channel(&hex[2..3])?;
                Ok(Color::rgb(r * 17, g * 17, b * 17))
            }
            _ => Err(format!("Invalid color '{}'", s)),
        }
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

// ============================================================================
// CONFIG
// ============================================================================

/// Render configuration carried inside a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Family for regular (Japanese) text.
    #[serde(rename = "textFontFamily")]
    pub text_font: String,
    /// Family for display text (`USED`, final price).
    #[serde(rename = "accentFontFamily")]
    pub accent_font: String,
    /// Consumption tax in percent, ≥ 0.
    #[serde(rename = "taxRatePercent")]
    pub tax_rate: f64,
    /// Strike through the list price.
    #[serde(rename = "strikethroughEnabled")]
    pub strikethrough: bool,
    #[serde(rename = "priceAreaFill")]
    pub price_area_fill: Color,
    pub export_width: u32,
    pub export_height: u32,
    pub show_border: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            text_font: "Meiryo".into(),
            accent_font: "Impact".into(),
            tax_rate: 10.0,
            strikethrough: true,
            price_area_fill: Color::WHITE,
            export_width: 800,
            export_height: 400,
            show_border: true,
        }
    }
}

impl Config {
    /// Check the numeric invariants (`tax_rate ≥ 0`, export size > 0).
    pub fn validate(&self) -> Result<(), String> {
        if !(self.tax_rate.is_finite() && self.tax_rate >= 0.0) {
            return Err(format!("tax rate must be ≥ 0, got {}", self.tax_rate));
        }
        if self.export_width == 0 || self.export_height == 0 {
            return Err(format!(
                "export size must be positive, got {}x{}",
                self.export_width, self.export_height
            ));
        }
        Ok(())
    }
}
