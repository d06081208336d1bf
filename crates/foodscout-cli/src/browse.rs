//! Product list, search, and detail command handlers.
//!
//! Not-found and transport failures are printed as messages and the command
//! still succeeds; only cart write failures are returned as errors.

use foodscout_browse::{fetch_by_barcode, BarcodeSearch, FilterState, ProductDetail, ProductList};
use foodscout_cart::{CartManager, FileStore};
use foodscout_core::{AppConfig, Category, SortOption};
use foodscout_off::{ClientOptions, OffClient};

use crate::render;

pub(crate) fn build_client(config: &AppConfig) -> anyhow::Result<OffClient> {
    let client = OffClient::new(&ClientOptions::from_config(config))?;
    Ok(client)
}

pub(crate) fn filter_state(category: Option<Category>, sort: Option<SortOption>) -> FilterState {
    FilterState {
        category,
        sort: sort.unwrap_or_default(),
    }
}

/// Fetch up to `pages` pages of the default feed and print them.
pub(crate) async fn run_browse(
    client: &OffClient,
    config: &AppConfig,
    pages: u32,
    filter: FilterState,
) {
    let mut list = ProductList::new(config.page_size);
    list.fetch_page(client, 1, true).await;

    let mut fetched = 1;
    while fetched < pages {
        if list.fetch_more(client).await.is_none() {
            break;
        }
        fetched += 1;
    }
    tracing::info!(
        pages = list.page(),
        products = list.all_fetched().len(),
        "browse finished"
    );

    if !filter.is_empty() {
        list.apply(filter);
    }
    render::print_list(&list);
}

/// Search by name and print the first page of results.
pub(crate) async fn run_search(
    client: &OffClient,
    config: &AppConfig,
    name: &str,
    filter: FilterState,
) {
    let mut list = ProductList::new(config.page_size);
    if list.search_by_name(client, name).await.is_none() {
        println!("nothing to search for; give a product name");
        return;
    }
    if !filter.is_empty() {
        list.apply(filter);
    }
    render::print_list(&list);
}

/// Look up a barcode; a hit is shown as a detail view.
pub(crate) async fn run_barcode(client: &OffClient, config: &AppConfig, code: &str) {
    let mut list = ProductList::new(config.page_size);
    match list.search_by_barcode(client, code).await {
        BarcodeSearch::Found(product) => render::print_detail(&ProductDetail::from(&*product)),
        BarcodeSearch::Skipped => println!("nothing to look up; give a barcode"),
        BarcodeSearch::NotFound | BarcodeSearch::Failed => {
            println!("{}", list.error().unwrap_or_default());
        }
    }
}

/// Show one product, optionally adding it to the cart.
///
/// # Errors
///
/// Returns an error if the product was added but the cart could not be saved.
pub(crate) async fn run_show(
    client: &OffClient,
    config: &AppConfig,
    code: &str,
    add: bool,
) -> anyhow::Result<()> {
    let product = match fetch_by_barcode(client, code).await {
        Ok(product) => product,
        Err(e) => {
            println!("{}", e.user_message());
            return Ok(());
        }
    };
    render::print_detail(&ProductDetail::from(&product));

    if add {
        let mut cart = CartManager::load(FileStore::new(&config.cart_path));
        let key = cart.add_to_cart(product)?;
        println!();
        println!("added {key} to cart");
        render::print_cart(&cart.grouped_items());
    }
    Ok(())
}

/// Print the largest categories by product count.
pub(crate) async fn run_categories(client: &OffClient, limit: usize) {
    match client.list_categories().await {
        Ok(mut tags) => {
            tags.sort_by(|a, b| b.products.cmp(&a.products));
            tags.truncate(limit);
            render::print_categories(&tags);
        }
        Err(e) => {
            tracing::warn!(error = %e, "category listing failed");
            println!("Failed to load categories. Please try again.");
        }
    }
}

/// Print one page of a category facet listing.
pub(crate) async fn run_category_products(client: &OffClient, key: &str, page: u32) {
    let key = key.trim();
    if key.is_empty() {
        println!("nothing to list; give a category key");
        return;
    }
    match client.category_products(key, page).await {
        Ok(products) if products.is_empty() => println!("No products found"),
        Ok(products) => {
            tracing::info!(
                category = key,
                page,
                products = products.len(),
                "category page loaded"
            );
            render::print_products(&products);
        }
        Err(e) => {
            tracing::warn!(category = key, page, error = %e, "category listing failed");
            println!("Failed to load products. Please try again.");
        }
    }
}
