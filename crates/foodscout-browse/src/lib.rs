//! Product list pipeline and detail lookup over a remote product source.
//!
//! [`ProductList`] holds everything fetched for the current search context
//! and derives the displayed list from it with the committed filter and
//! sort. At most one list fetch is in flight; starting another cancels it.

pub mod detail;
pub mod error;
pub mod filter;
pub mod list;
pub mod source;

pub use detail::{fetch_by_barcode, DetailError, ProductDetail};
pub use error::FetchError;
pub use filter::{derive_view, filter_by_category, sort_products, FilterState};
pub use list::{BarcodeSearch, FetchStatus, LoadState, PageRequest, ProductList};
pub use source::ProductSource;
