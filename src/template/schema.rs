//! JSON schema types for template files.
//!
//! Reading is lenient: every section and key is optional, numbers and
//! booleans may arrive as strings, and the snake_case keys written by older
//! versions of the tool are accepted as aliases.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level template file as read from disk.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TemplateFile {
    /// Field values. Older files call this section `info`.
    #[serde(alias = "info")]
    pub fields: BTreeMap<String, Option<Scalar>>,
    pub config: ConfigSection,
    /// Kept as raw JSON so element order survives and one bad element can
    /// be reported by key.
    pub elements: serde_json::Map<String, serde_json::Value>,
}

/// A JSON scalar of any type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    pub fn into_text(self) -> String {
        match self {
            Scalar::Bool(b) => b.to_string(),
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Str(s) => s,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Bool(_) => None,
            Scalar::Int(n) => Some(*n as f64),
            Scalar::Float(f) => Some(*f),
            Scalar::Str(s) => s.trim().parse().ok(),
        }
    }

    /// Integral value; fractional numbers are rounded.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(n) => Some(*n),
            Scalar::Str(s) => {
                let s = s.trim();
                s.parse::<i64>().ok().or_else(|| s.parse::<f64>().ok().map(|f| f.round() as i64))
            }
            other => other.as_f64().map(|f| f.round() as i64),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            Scalar::Int(n) => Some(*n != 0),
            Scalar::Float(_) => None,
            Scalar::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Some(true),
                "false" | "0" | "no" | "off" => Some(false),
                _ => None,
            },
        }
    }
}

/// `config` section. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfigSection {
    #[serde(alias = "jp_font")]
    pub text_font_family: Option<Scalar>,
    #[serde(alias = "impact_font")]
    pub accent_font_family: Option<Scalar>,
    #[serde(alias = "tax_rate")]
    pub tax_rate_percent: Option<Scalar>,
    #[serde(alias = "strikethrough")]
    pub strikethrough_enabled: Option<Scalar>,
    #[serde(alias = "price_area_color")]
    pub price_area_fill: Option<Scalar>,
    #[serde(alias = "export_width")]
    pub export_width: Option<Scalar>,
    #[serde(alias = "export_height")]
    pub export_height: Option<Scalar>,
    #[serde(alias = "show_border")]
    pub show_border: Option<Scalar>,
}

/// One entry of the `elements` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementSection {
    pub pos: Option<[Scalar; 2]>,
    pub size: Option<[Scalar; 2]>,
    #[serde(alias = "font_size")]
    pub font_size: Option<Scalar>,
    pub tag: Option<String>,
    pub anchor: Option<String>,
    pub vertical: Option<Scalar>,
    #[serde(alias = "line_spacing")]
    pub line_spacing: Option<Scalar>,
    /// Barcode payload.
    pub data: Option<Scalar>,
}

/// One entry of the `elements` section as written.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedElement<'a> {
    pub pos: [i32; 2],
    pub size: [i32; 2],
    pub font_size: i32,
    pub tag: &'a str,
    pub anchor: &'a str,
    pub vertical: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_spacing: Option<f32>,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub data: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(Scalar::Str(" 800 ".into()).as_i64(), Some(800));
        assert_eq!(Scalar::Float(24.6).as_i64(), Some(25));
        assert_eq!(Scalar::Str("10.5".into()).as_f64(), Some(10.5));
        assert_eq!(Scalar::Str("true".into()).as_bool(), Some(true));
        assert_eq!(Scalar::Int(0).as_bool(), Some(false));
        assert_eq!(Scalar::Str("abc".into()).as_i64(), None);
        assert_eq!(Scalar::Int(3080).into_text(), "3080");
    }

    #[test]
    fn test_sections_are_optional() {
        let file: TemplateFile = serde_json::from_str("{}").unwrap();
        assert!(file.fields.is_empty());
        assert!(file.elements.is_empty());
        assert!(file.config.export_width.is_none());
    }

    #[test]
    fn test_legacy_aliases() {
        let json = r#"{
            "info": {"title": "x", "list_price": 3080},
            "config": {"jp_font": "MS Gothic", "tax_rate": "8", "show_border": false}
        }"#;
        let file: TemplateFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.fields["list_price"], Some(Scalar::Int(3080)));
        assert_eq!(file.config.text_font_family, Some(Scalar::Str("MS Gothic".into())));
        assert_eq!(file.config.tax_rate_percent.unwrap().as_f64(), Some(8.0));
        assert_eq!(file.config.show_border.unwrap().as_bool(), Some(false));
    }

    #[test]
    fn test_element_section_accepts_strings() {
        let json = r#"{"pos": ["101", 131], "font_size": "24", "anchor": "s"}"#;
        let el: ElementSection = serde_json::from_str(json).unwrap();
        let [x, y] = el.pos.unwrap();
        assert_eq!((x.as_i64(), y.as_i64()), (Some(101), Some(131)));
        assert_eq!(el.font_size.unwrap().as_i64(), Some(24));
        assert!(el.size.is_none());
    }
}
