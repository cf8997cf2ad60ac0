//! Product records scraped from listing and detail pages
//!
//! A record starts life as a `ListingEntry` (fields visible on the search
//! result page) and becomes a `ProductRecord` once the detail page's
//! attribute table has been merged in.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Free-form attribute table of a product detail page.
///
/// Keys are unique; iteration follows lexicographic key order.
pub type AttributeMap = BTreeMap<String, String>;

/// One scraped product.
///
/// Equality is structural over every field, including the whole
/// attribute map, which is what deduplication relies on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductRecord {
    pub name: String,
    pub rating: String,
    pub price: String,
    #[serde(default)]
    pub attributes: AttributeMap,
}

impl ProductRecord {
    pub fn new(
        name: impl Into<String>,
        rating: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            rating: rating.into(),
            price: price.into(),
            attributes: AttributeMap::new(),
        }
    }

    /// Add or overwrite one attribute
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: AttributeMap) -> Self {
        self.attributes = attributes;
        self
    }

    /// Canonical content hash over every field.
    ///
    /// Each string is length-prefixed so that field boundaries cannot shift
    /// (`"ab" + "c"` and `"a" + "bc"` hash differently), and attribute pairs
    /// are fed in key order. Two records with equal hashes are structurally
    /// equal up to a blake3 collision.
    pub fn content_hash(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        write_field(&mut hasher, &self.name);
        write_field(&mut hasher, &self.rating);
        write_field(&mut hasher, &self.price);
        hasher.update(&(self.attributes.len() as u64).to_le_bytes());
        for (key, value) in &self.attributes {
            write_field(&mut hasher, key);
            write_field(&mut hasher, value);
        }
        hasher.finalize()
    }
}

fn write_field(hasher: &mut blake3::Hasher, field: &str) {
    hasher.update(&(field.len() as u64).to_le_bytes());
    hasher.update(field.as_bytes());
}

/// Fields extracted for one entry of a search result page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub name: String,
    pub rating: String,
    pub price: String,
    /// Absolute URL of the product detail page, if the entry carried a link
    pub detail_url: Option<String>,
}

impl ListingEntry {
    /// Turn the listing fields into a record without attributes
    pub fn into_record(self) -> ProductRecord {
        ProductRecord::new(self.name, self.rating, self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_order_does_not_affect_equality() {
        let a = ProductRecord::new("Widget", "4 stars", "10")
            .with_attribute("Brand", "Acme")
            .with_attribute("Color", "Red");
        let b = ProductRecord::new("Widget", "4 stars", "10")
            .with_attribute("Color", "Red")
            .with_attribute("Brand", "Acme");

        assert_eq!(a, b);
        assert_eq!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn test_content_hash_respects_field_boundaries() {
        let a = ProductRecord::new("ab", "c", "");
        let b = ProductRecord::new("a", "bc", "");

        assert_ne!(a, b);
        assert_ne!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn test_content_hash_distinguishes_attribute_values() {
        let a = ProductRecord::new("Widget", "", "").with_attribute("Color", "Red");
        let b = ProductRecord::new("Widget", "", "").with_attribute("Color", "Blue");

        assert_ne!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn test_listing_entry_into_record() {
        let entry = ListingEntry {
            name: "Widget".to_string(),
            rating: "4.5 out of 5 stars".to_string(),
            price: "1999".to_string(),
            detail_url: Some("https://www.amazon.com/dp/B000".to_string()),
        };

        let record = entry.into_record();
        assert_eq!(record.name, "Widget");
        assert_eq!(record.price, "1999");
        assert!(record.attributes.is_empty());
    }
}
