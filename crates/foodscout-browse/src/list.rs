//! The product list pipeline: paged fetches, cancellation, and the filtered
//! view derived from everything fetched so far.
//!
//! A fetch is split in three so that callers driving an event loop can hold
//! the request while other events arrive:
//!
//! 1. [`ProductList::begin_fetch`] cancels whatever is in flight and hands
//!    out a [`PageRequest`] stamped with a new generation.
//! 2. [`PageRequest::run`] talks to the source. It borrows nothing from the
//!    list.
//! 3. [`ProductList::complete_fetch`] commits the result, unless a newer
//!    request has been issued since. Cancelled and stale results never touch
//!    state, whatever order they resolve in.
//!
//! [`ProductList::fetch_page`] chains the three for callers that simply
//! await.

use foodscout_core::{Category, Product, SortOption};
use foodscout_off::{OffError, ProductLookup};
use tokio_util::sync::CancellationToken;

use crate::error::FetchError;
use crate::filter::{derive_view, FilterState};
use crate::source::ProductSource;

/// Query used when no search term is active.
pub const DEFAULT_QUERY: &str = "food";

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load products. Please try again.";
pub const BARCODE_NOT_FOUND_MESSAGE: &str = "Product not found for this barcode";
pub const BARCODE_FAILED_MESSAGE: &str = "Failed to search by barcode";

/// Loading indicator and user-facing error, as one state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Failed(String),
}

impl LoadState {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// What [`ProductList::complete_fetch`] did with a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// The page was committed.
    Committed { received: usize },
    /// The first page came back empty; the list was cleared.
    Empty,
    /// The source failed; the list is in the error state.
    Failed,
    /// The request was cancelled before it resolved.
    Cancelled,
    /// A newer request superseded this one; the result was dropped.
    Stale,
}

/// Outcome of [`ProductList::search_by_barcode`].
#[derive(Debug, Clone, PartialEq)]
pub enum BarcodeSearch {
    /// The barcode was blank; nothing happened.
    Skipped,
    Found(Box<Product>),
    NotFound,
    Failed,
}

/// One issued page fetch. Obtained from [`ProductList::begin_fetch`].
#[derive(Debug, Clone)]
pub struct PageRequest {
    query: String,
    page: u32,
    page_size: u32,
    is_new_search: bool,
    generation: u64,
    token: CancellationToken,
}

impl PageRequest {
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn is_new_search(&self) -> bool {
        self.is_new_search
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Asks `source` for the page, giving up as soon as the request is
    /// cancelled.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Cancelled`] if a newer request cancelled this one.
    /// - [`FetchError::Source`] if the source call failed.
    pub async fn run<S: ProductSource>(&self, source: &S) -> Result<Vec<Product>, FetchError> {
        tokio::select! {
            biased;
            () = self.token.cancelled() => Err(FetchError::Cancelled),
            result = source.search(&self.query, self.page, self.page_size) => {
                result.map_err(FetchError::from)
            }
        }
    }
}

/// Product list state for one browsing session.
#[derive(Debug)]
pub struct ProductList {
    page_size: u32,
    all_fetched: Vec<Product>,
    displayed: Vec<Product>,
    filter: FilterState,
    page: u32,
    has_more: bool,
    load_state: LoadState,
    search_term: String,
    has_searched: bool,
    initial_loaded: bool,
    generation: u64,
    in_flight: Option<CancellationToken>,
}

impl ProductList {
    /// An empty list that fetches `page_size` products per page.
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            all_fetched: Vec::new(),
            displayed: Vec::new(),
            filter: FilterState::default(),
            page: 0,
            has_more: true,
            load_state: LoadState::Idle,
            search_term: String::new(),
            has_searched: false,
            initial_loaded: false,
            generation: 0,
            in_flight: None,
        }
    }

    /// Everything fetched for the current search context, unfiltered.
    #[must_use]
    pub fn all_fetched(&self) -> &[Product] {
        &self.all_fetched
    }

    /// The filtered and sorted view.
    #[must_use]
    pub fn displayed(&self) -> &[Product] {
        &self.displayed
    }

    #[must_use]
    pub fn filter(&self) -> FilterState {
        self.filter
    }

    /// Last committed page number; 0 before anything was fetched.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    #[must_use]
    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.load_state.error()
    }

    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    #[must_use]
    pub fn has_searched(&self) -> bool {
        self.has_searched
    }

    #[must_use]
    pub fn initial_loaded(&self) -> bool {
        self.initial_loaded
    }

    /// Search term, or [`DEFAULT_QUERY`] when none is active.
    #[must_use]
    pub fn effective_query(&self) -> &str {
        if self.search_term.is_empty() {
            DEFAULT_QUERY
        } else {
            &self.search_term
        }
    }

    /// Issues a new page request, cancelling the one in flight.
    pub fn begin_fetch(
        &mut self,
        query: impl Into<String>,
        page: u32,
        is_new_search: bool,
    ) -> PageRequest {
        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
        }
        self.generation += 1;
        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());
        self.load_state = LoadState::Loading;
        if is_new_search {
            self.has_more = true;
        }

        let request = PageRequest {
            query: query.into(),
            page,
            page_size: self.page_size,
            is_new_search,
            generation: self.generation,
            token,
        };
        tracing::debug!(
            query = %request.query,
            page,
            is_new_search,
            generation = request.generation,
            "page fetch started"
        );
        request
    }

    /// Applies the result of `request` if it is still the current one.
    pub fn complete_fetch(
        &mut self,
        request: &PageRequest,
        result: Result<Vec<Product>, FetchError>,
    ) -> FetchStatus {
        if request.generation != self.generation {
            tracing::debug!(
                generation = request.generation,
                current = self.generation,
                "stale page result dropped"
            );
            return FetchStatus::Stale;
        }
        if request.is_cancelled() || matches!(result, Err(FetchError::Cancelled)) {
            tracing::debug!(generation = request.generation, "page fetch cancelled");
            return FetchStatus::Cancelled;
        }

        self.in_flight = None;
        self.initial_loaded = true;

        match result {
            Ok(products) => self.commit_page(request, products),
            Err(FetchError::Source(e)) => {
                tracing::warn!(
                    error = %e,
                    query = %request.query,
                    page = request.page,
                    "page fetch failed"
                );
                self.load_state = LoadState::Failed(LOAD_FAILED_MESSAGE.to_string());
                self.has_more = false;
                FetchStatus::Failed
            }
            Err(FetchError::Cancelled) => FetchStatus::Cancelled,
        }
    }

    fn commit_page(&mut self, request: &PageRequest, products: Vec<Product>) -> FetchStatus {
        let received = products.len();
        self.load_state = LoadState::Idle;
        self.page = request.page;

        if received == 0 && request.page == 1 {
            self.all_fetched.clear();
            self.displayed.clear();
            self.has_more = false;
            tracing::debug!(query = %request.query, "first page empty");
            return FetchStatus::Empty;
        }

        if request.is_new_search || request.page == 1 {
            self.all_fetched = products;
        } else {
            self.all_fetched.extend(products);
        }
        self.has_more = received == self.page_size as usize;
        self.displayed = derive_view(&self.all_fetched, &self.filter);
        tracing::debug!(
            page = request.page,
            received,
            total = self.all_fetched.len(),
            has_more = self.has_more,
            "page committed"
        );
        FetchStatus::Committed { received }
    }

    /// Cancels the request in flight, if any, and leaves the loading state.
    pub fn cancel_in_flight(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
            if self.load_state.is_loading() {
                self.load_state = LoadState::Idle;
            }
        }
    }

    /// Fetches `page` for the current query and commits it.
    pub async fn fetch_page<S: ProductSource>(
        &mut self,
        source: &S,
        page: u32,
        is_new_search: bool,
    ) -> FetchStatus {
        let query = self.effective_query().to_string();
        let request = self.begin_fetch(query, page, is_new_search);
        let result = request.run(source).await;
        self.complete_fetch(&request, result)
    }

    /// Whether a fetch-more trigger would be honoured right now.
    ///
    /// Requires an idle list that may have more pages, no active name
    /// search, and a completed first page.
    #[must_use]
    pub fn can_fetch_more(&self) -> bool {
        self.load_state == LoadState::Idle
            && self.has_more
            && self.search_term.is_empty()
            && self.initial_loaded
    }

    /// Fetches the next page if [`ProductList::can_fetch_more`] allows it.
    pub async fn fetch_more<S: ProductSource>(&mut self, source: &S) -> Option<FetchStatus> {
        if !self.can_fetch_more() {
            return None;
        }
        let next = self.page + 1;
        Some(self.fetch_page(source, next, false).await)
    }

    /// Starts a new name search. A blank term is ignored.
    pub async fn search_by_name<S: ProductSource>(
        &mut self,
        source: &S,
        term: &str,
    ) -> Option<FetchStatus> {
        let term = term.trim();
        if term.is_empty() {
            return None;
        }
        self.search_term = term.to_string();
        self.has_searched = true;
        Some(self.fetch_page(source, 1, true).await)
    }

    /// Looks up a single barcode. On a hit the caller shows the product's
    /// detail; the list itself is left alone.
    pub async fn search_by_barcode<S: ProductSource>(
        &mut self,
        source: &S,
        barcode: &str,
    ) -> BarcodeSearch {
        let barcode = barcode.trim();
        if barcode.is_empty() {
            return BarcodeSearch::Skipped;
        }
        self.has_searched = true;
        self.load_state = LoadState::Loading;

        match source.lookup(barcode).await {
            Ok(ProductLookup::Found(product)) => {
                self.load_state = LoadState::Idle;
                BarcodeSearch::Found(product)
            }
            Ok(ProductLookup::NotFound) => {
                tracing::debug!(barcode, "barcode not found");
                self.load_state = LoadState::Failed(BARCODE_NOT_FOUND_MESSAGE.to_string());
                self.displayed.clear();
                BarcodeSearch::NotFound
            }
            Err(e) => {
                log_barcode_failure(barcode, &e);
                self.load_state = LoadState::Failed(BARCODE_FAILED_MESSAGE.to_string());
                BarcodeSearch::Failed
            }
        }
    }

    /// Refetches page 1 of the current query.
    pub async fn refresh<S: ProductSource>(&mut self, source: &S) -> FetchStatus {
        self.dismiss_error();
        self.fetch_page(source, 1, true).await
    }

    /// Drops the search term and filters, then refetches the default feed.
    pub async fn reset_search<S: ProductSource>(&mut self, source: &S) -> FetchStatus {
        self.search_term.clear();
        self.filter = FilterState::default();
        self.has_searched = false;
        self.fetch_page(source, 1, true).await
    }

    /// Commits a category filter, keeping the current sort.
    pub fn apply_filter(&mut self, category: Option<Category>) {
        self.apply(FilterState {
            category,
            sort: self.filter.sort,
        });
    }

    /// Commits a sort option, keeping the current category.
    pub fn apply_sort(&mut self, sort: SortOption) {
        self.apply(FilterState {
            category: self.filter.category,
            sort,
        });
    }

    /// Commits `state` and re-derives the displayed list from everything
    /// fetched. No network.
    pub fn apply(&mut self, state: FilterState) {
        self.filter = state;
        self.displayed = derive_view(&self.all_fetched, &self.filter);
        tracing::debug!(
            category = state.category.map_or("", Category::key),
            sort = %state.sort,
            shown = self.displayed.len(),
            "filters applied"
        );
    }

    /// Resets filter and sort and shows everything fetched again.
    pub fn clear_filters(&mut self) {
        self.filter = FilterState::default();
        self.displayed = self.all_fetched.clone();
        self.dismiss_error();
        self.has_searched = false;
    }

    /// Clears the error, if any.
    pub fn dismiss_error(&mut self) {
        if matches!(self.load_state, LoadState::Failed(_)) {
            self.load_state = LoadState::Idle;
        }
    }

    /// Whether to show the "no results" placeholder.
    #[must_use]
    pub fn show_no_results(&self) -> bool {
        self.has_searched
            && self.displayed.is_empty()
            && !self.load_state.is_loading()
            && self.initial_loaded
    }
}

fn log_barcode_failure(barcode: &str, error: &OffError) {
    tracing::warn!(barcode, error = %error, "barcode search failed");
}

#[cfg(test)]
#[path = "list_test.rs"]
mod tests;
