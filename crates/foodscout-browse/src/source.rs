use std::future::Future;

use foodscout_core::Product;
use foodscout_off::{OffClient, OffError, ProductLookup};

/// Where product pages and single products come from.
///
/// Implemented for [`OffClient`]; tests substitute scripted sources.
pub trait ProductSource {
    /// One page of search results, at most `page_size` long. Pages are 1-based.
    fn search(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> impl Future<Output = Result<Vec<Product>, OffError>> + Send;

    /// Single product by barcode.
    fn lookup(&self, barcode: &str) -> impl Future<Output = Result<ProductLookup, OffError>> + Send;
}

impl ProductSource for OffClient {
    fn search(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> impl Future<Output = Result<Vec<Product>, OffError>> + Send {
        self.search_products(query, page, page_size)
    }

    fn lookup(&self, barcode: &str) -> impl Future<Output = Result<ProductLookup, OffError>> + Send {
        self.get_product(barcode)
    }
}
