//! Insertion-ordered element storage.

use super::types::Element;

/// Element key → element, iterated in insertion order.
///
/// Keys are unique. Removal keeps the relative order of the remaining
/// elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementMap {
    entries: Vec<(String, Element)>,
}

impl ElementMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&Element> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, e)| e)
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut Element> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, e)| e)
    }

    /// Append at the end. Returns the element back if the key is taken.
    pub(crate) fn insert(&mut self, key: String, element: Element) -> Result<(), Element> {
        if self.contains_key(&key) {
            return Err(element);
        }
        self.entries.push((key, element));
        Ok(())
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<Element> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Element)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), e))
    }

    /// Entries in draw order: barcodes first, then everything else, each
    /// group in insertion order.
    pub fn draw_order(&self) -> Vec<(&str, &Element)> {
        let (barcodes, rest): (Vec<_>, Vec<_>) = self.iter().partition(|(_, e)| e.is_barcode());
        barcodes.into_iter().chain(rest).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::types::{BarcodeElement, Size, TextElement};
    use crate::geometry::Point;

    fn text(tag: &str) -> Element {
        TextElement::new(tag, Point::new(0, 0), 10).into()
    }

    #[test]
    fn test_insert_rejects_duplicate_key() {
        let mut map = ElementMap::new();
        assert!(map.insert("a".into(), text("a")).is_ok());
        assert!(map.insert("a".into(), text("other")).is_err());
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut map = ElementMap::new();
        for k in ["a", "b", "c"] {
            map.insert(k.into(), text(k)).unwrap();
        }
        assert!(map.remove("b").is_some());
        assert!(map.remove("b").is_none());
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "c"]);
    }

    #[test]
    fn test_draw_order_puts_barcode_first() {
        let mut map = ElementMap::new();
        map.insert("title".into(), text("title")).unwrap();
        map.insert("price".into(), text("price")).unwrap();
        map.insert(
            "barcode".into(),
            BarcodeElement::new(Point::new(0, 0), Size::new(10, 10)).into(),
        )
        .unwrap();
        map.insert("date".into(), text("date")).unwrap();

        let order: Vec<&str> = map.draw_order().into_iter().map(|(k, _)| k).collect();
        assert_eq!(order, vec!["barcode", "title", "price", "date"]);
    }
}
