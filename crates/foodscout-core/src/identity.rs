//! Identity keys used to group duplicate cart entries.

use sha2::{Digest, Sha256};

use crate::product::{non_empty, Product};

/// Prefix of keys derived from product content rather than an identifier.
pub const ANONYMOUS_KEY_PREFIX: &str = "anon-";

/// Compute the grouping key for a product.
///
/// Resolution order: `code`, then `_id`, then `product_name`. Products with
/// none of those get a content hash: SHA-256 over the image URLs, brand,
/// generic name, categories, ingredients and quantity, NUL-separated,
/// truncated to 16 hex chars. The same content always yields the same key.
#[must_use]
pub fn identity_key(product: &Product) -> String {
    if let Some(key) = non_empty(product.code.as_ref())
        .or_else(|| non_empty(product.id.as_ref()))
        .or_else(|| non_empty(product.product_name.as_ref()))
    {
        return key.to_string();
    }

    let field = |v: &Option<String>| v.as_deref().unwrap_or("").trim().to_string();
    let input = [
        field(&product.image_front_url),
        field(&product.image_url),
        field(&product.brands),
        field(&product.generic_name),
        field(&product.categories),
        field(&product.ingredients_text),
        field(&product.quantity),
    ]
    .join("\x00");

    let digest = format!("{:x}", Sha256::digest(input.as_bytes()));
    format!("{ANONYMOUS_KEY_PREFIX}{}", &digest[..16])
}
