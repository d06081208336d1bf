//! Single-product lookup for the detail view.

use foodscout_core::{NutritionFact, Product};
use foodscout_off::{OffError, ProductLookup};
use thiserror::Error;

use crate::source::ProductSource;

pub const NOT_FOUND_MESSAGE: &str = "Product not found for this barcode";
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load product. Please try again later.";

/// Why a detail lookup produced no product.
#[derive(Debug, Error)]
pub enum DetailError {
    /// The source answered and does not know the barcode.
    #[error("no product with barcode '{barcode}'")]
    NotFound { barcode: String },

    /// The source could not be asked, or its answer could not be read.
    #[error("product lookup failed: {0}")]
    Failed(#[from] OffError),
}

impl DetailError {
    /// Text to show the user in place of the product.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            DetailError::NotFound { .. } => NOT_FOUND_MESSAGE,
            DetailError::Failed(_) => LOAD_FAILED_MESSAGE,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, DetailError::NotFound { .. })
    }
}

/// Fetches one product by barcode.
///
/// A blank barcode is reported as not found without asking the source.
///
/// # Errors
///
/// - [`DetailError::NotFound`] if the source does not know the barcode.
/// - [`DetailError::Failed`] on transport or decode failure.
pub async fn fetch_by_barcode<S: ProductSource>(
    source: &S,
    barcode: &str,
) -> Result<Product, DetailError> {
    let barcode = barcode.trim();
    if barcode.is_empty() {
        return Err(DetailError::NotFound {
            barcode: String::new(),
        });
    }

    match source.lookup(barcode).await {
        Ok(ProductLookup::Found(product)) => Ok(*product),
        Ok(ProductLookup::NotFound) => {
            tracing::debug!(barcode, "detail lookup: not found");
            Err(DetailError::NotFound {
                barcode: barcode.to_string(),
            })
        }
        Err(e) => {
            tracing::warn!(barcode, error = %e, "detail lookup failed");
            Err(DetailError::Failed(e))
        }
    }
}

/// Everything the detail view shows, with placeholders already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetail {
    pub barcode: Option<String>,
    pub name: String,
    pub description: String,
    pub brands: Option<String>,
    pub quantity: Option<String>,
    pub image_url: Option<String>,
    pub category: String,
    pub grade: String,
    pub labels: Vec<String>,
    /// `None` when the record has no nutrition section.
    pub nutrition: Option<Vec<NutritionFact>>,
    /// Full ingredient list; `None` hides the section.
    pub ingredients: Option<String>,
}

impl From<&Product> for ProductDetail {
    fn from(product: &Product) -> Self {
        let present = |v: Option<&String>| v.filter(|s| !s.is_empty()).cloned();
        Self {
            barcode: present(product.code.as_ref()),
            name: product.display_name().to_string(),
            description: product.description().to_string(),
            brands: present(product.brands.as_ref()),
            quantity: present(product.quantity.as_ref()),
            image_url: product.front_image().map(str::to_string),
            category: product.primary_category().to_string(),
            grade: product.grade_label(),
            labels: product.label_names(),
            nutrition: product.nutrition_facts(),
            ingredients: present(product.ingredients_text.as_ref()),
        }
    }
}
