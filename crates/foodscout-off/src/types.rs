//! Open Food Facts response types.
//!
//! The API is not strict about types: `status` is normally an integer but has
//! been seen as a string, and search pages occasionally contain entries that
//! are not objects at all. Envelopes are therefore modelled loosely and each
//! product is decoded on its own so that one bad record does not sink a page.

use foodscout_core::Product;
use serde::Deserialize;
use serde_json::Value;

/// Response of `GET /cgi/search.pl?...&json=true` and of category pages.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub products: Vec<Value>,
}

/// Response of `GET /api/v0/product/{barcode}.json`.
///
/// `status` is `1` when the barcode exists and `0` otherwise; `product` is
/// omitted for unknown barcodes.
#[derive(Debug, Deserialize)]
pub struct ProductResponse {
    #[serde(default)]
    pub status: Option<Value>,
    #[serde(default)]
    pub status_verbose: Option<String>,
    #[serde(default)]
    pub product: Option<Value>,
}

impl ProductResponse {
    /// `true` when the envelope reports the product as found.
    #[must_use]
    pub fn is_found(&self) -> bool {
        match &self.status {
            Some(Value::Number(n)) => n.as_i64() == Some(1),
            Some(Value::String(s)) => s.trim() == "1",
            _ => false,
        }
    }
}

/// Response of `GET /categories.json`.
#[derive(Debug, Deserialize)]
pub struct CategoriesResponse {
    #[serde(default)]
    pub tags: Vec<CategoryTag>,
}

/// One category facet as listed by the API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CategoryTag {
    /// Tag id, e.g. `"en:beverages"`.
    pub id: String,
    pub name: String,
    /// Number of products carrying this category.
    #[serde(default)]
    pub products: u64,
}

/// Outcome of a barcode lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductLookup {
    Found(Box<Product>),
    /// The API answered, and the barcode is unknown.
    NotFound,
}

impl ProductLookup {
    #[must_use]
    pub fn into_product(self) -> Option<Product> {
        match self {
            ProductLookup::Found(product) => Some(*product),
            ProductLookup::NotFound => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn envelope(value: serde_json::Value) -> ProductResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn status_one_is_found() {
        assert!(envelope(json!({ "status": 1, "product": {} })).is_found());
        assert!(envelope(json!({ "status": "1" })).is_found());
    }

    #[test]
    fn status_zero_or_missing_is_not_found() {
        assert!(!envelope(json!({ "status": 0, "status_verbose": "product not found" })).is_found());
        assert!(!envelope(json!({})).is_found());
    }

    #[test]
    fn search_response_tolerates_missing_products() {
        let resp: SearchResponse = serde_json::from_value(json!({ "count": 0 })).unwrap();
        assert!(resp.products.is_empty());
    }

    #[test]
    fn category_tag_defaults_product_count() {
        let tag: CategoryTag =
            serde_json::from_value(json!({ "id": "en:snacks", "name": "Snacks" })).unwrap();
        assert_eq!(tag.products, 0);
    }
}
