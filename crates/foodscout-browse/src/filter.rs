//! Category filtering and sorting over an already-fetched product list.
//!
//! Everything here is pure: no network, no shared state.

use std::cmp::Ordering;

use foodscout_core::{Category, Product, SortOption};

/// Committed filter and sort choice for a product list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterState {
    /// `None` means all categories.
    pub category: Option<Category>,
    pub sort: SortOption,
}

impl FilterState {
    /// Number of non-default controls, for a "filters (2)" style badge.
    #[must_use]
    pub fn active_count(&self) -> usize {
        usize::from(self.category.is_some()) + usize::from(!self.sort.is_none())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    fn category_key(&self) -> &'static str {
        self.category.map_or("", Category::key)
    }
}

/// Products whose category text contains `key`, ignoring case.
///
/// An empty key keeps everything. A product without categories never
/// matches a non-empty key.
#[must_use]
pub fn filter_by_category(products: &[Product], key: &str) -> Vec<Product> {
    let needle = key.trim().to_lowercase();
    if needle.is_empty() {
        return products.to_vec();
    }
    products
        .iter()
        .filter(|p| p.category_text().to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Sorts in place. The sort is stable, so equal keys keep fetch order and
/// [`SortOption::None`] leaves the slice untouched.
pub fn sort_products(products: &mut [Product], option: SortOption) {
    match option {
        SortOption::None => {}
        SortOption::NameAsc => products.sort_by(|a, b| compare_text(name_of(a), name_of(b))),
        SortOption::NameDesc => products.sort_by(|a, b| compare_text(name_of(b), name_of(a))),
        SortOption::GradeAsc => {
            products.sort_by(|a, b| compare_text(a.grade_text(), b.grade_text()));
        }
        SortOption::GradeDesc => {
            products.sort_by(|a, b| compare_text(b.grade_text(), a.grade_text()));
        }
    }
}

/// `products` filtered by the state's category, then sorted.
#[must_use]
pub fn derive_view(products: &[Product], state: &FilterState) -> Vec<Product> {
    let mut view = filter_by_category(products, state.category_key());
    sort_products(&mut view, state.sort);
    view
}

// Missing names sort as "", not as the "No Name" placeholder.
fn name_of(product: &Product) -> &str {
    product.product_name.as_deref().unwrap_or("")
}

// Case-only differences are ties, so the stable sort keeps fetch order.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}
