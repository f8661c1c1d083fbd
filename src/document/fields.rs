//! Document fields and the text each semantic tag derives from them.
//!
//! Text elements do not carry their own string. At render time the element's
//! tag selects a formatter over the fields (and the computed pricing), e.g.
//! `final_price` renders `¥{total}` with grouped thousands.

use std::collections::BTreeMap;
use thiserror::Error;

use super::types::Color;
use crate::font::FontCategory;

/// Well-known semantic tags and field names.
pub mod tags {
    pub const BARCODE: &str = "barcode";
    pub const BARCODE_DATA: &str = "barcode_data";
    pub const LIST_PRICE: &str = "list_price";
    pub const USED_PRICE_BASE: &str = "used_price_base";
    pub const USED_LABEL: &str = "used_label";
    pub const TAX_DATE_LABEL: &str = "tax_date_label";
    pub const TAX_DATE_VALUE: &str = "tax_date_value";
    pub const TAX_DATE: &str = "tax_date";
    pub const RELEASE_DATE: &str = "release_date";
    pub const SALE_DATE: &str = "sale_date";
    pub const PRICE_BREAKDOWN: &str = "price_breakdown";
    pub const FINAL_PRICE: &str = "final_price";
}

/// A field value that a formatter needed as a number but could not parse.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("field '{field}' is not an integer: '{value}'")]
pub struct InvalidField {
    pub field: String,
    pub value: String,
}

/// Field name → value. Numbers are kept as their textual form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(BTreeMap<String, String>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse a field as an integer. A missing field reads as 0.
    pub fn int(&self, key: &str) -> Result<i64, InvalidField> {
        match self.get(key) {
            None => Ok(0),
            Some(raw) => raw.trim().parse::<i64>().map_err(|_| InvalidField {
                field: key.to_string(),
                value: raw.to_string(),
            }),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// ============================================================================
// PRICING
// ============================================================================

/// Computed once per render pass from `used_price_base` and the tax rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pricing {
    pub base: i64,
    pub tax: i64,
    pub total: i64,
}

impl Pricing {
    /// `tax = floor(base * rate / 100)`, `total = base + tax`.
    ///
    /// An unparseable base price yields all zeros.
    pub fn compute(fields: &Fields, tax_rate_percent: f64) -> Self {
        let Ok(base) = fields.int(tags::USED_PRICE_BASE) else {
            return Self::default();
        };
        let tax = (base as f64 * tax_rate_percent / 100.0).floor() as i64;
        Self {
            base,
            tax,
            total: base + tax,
        }
    }
}

/// Format an integer with `,` thousands separators.
pub fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ============================================================================
// SEMANTIC TEXT
// ============================================================================

/// Resolve the text a tagged element displays.
///
/// Known tags have fixed formatters. Any other tag shows the field named by
/// the tag, falling back to the field named by the element key (custom text
/// elements), and finally to the empty string.
pub fn semantic_text(
    key: &str,
    tag: &str,
    fields: &Fields,
    pricing: &Pricing,
) -> Result<String, InvalidField> {
    let field = |name: &str| fields.get(name).unwrap_or_default().to_string();

    let text = match tag {
        tags::LIST_PRICE => format!("定価 ¥{}", group_thousands(fields.int(tags::LIST_PRICE)?)),
        tags::USED_LABEL => "USED".to_string(),
        tags::TAX_DATE_LABEL => "税込".to_string(),
        tags::TAX_DATE_VALUE => field(tags::TAX_DATE),
        tags::RELEASE_DATE => format!("発売日 {}", field(tags::SALE_DATE)),
        tags::PRICE_BREAKDOWN => format!(
            "(本体¥{} + 税¥{})",
            group_thousands(pricing.base),
            group_thousands(pricing.tax)
        ),
        tags::FINAL_PRICE => format!("¥{}", group_thousands(pricing.total)),
        other => fields
            .get(other)
            .or_else(|| fields.get(key))
            .unwrap_or_default()
            .to_string(),
    };
    Ok(text)
}

/// Font category and ink color for a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub category: FontCategory,
    pub color: Color,
}

impl TextStyle {
    pub fn for_tag(tag: &str) -> Self {
        let category = match tag {
            tags::USED_LABEL | tags::FINAL_PRICE => FontCategory::Accent,
            _ => FontCategory::Text,
        };
        let color = if tag == tags::LIST_PRICE {
            Color::GRAY
        } else {
            Color::BLACK
        };
        Self { category, color }
    }
}
