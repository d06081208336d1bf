//! HTTP client for the Open Food Facts REST API.
//!
//! Wraps `reqwest` with timeouts, retry on transient failures, and lenient
//! product decoding. A barcode the API does not know is reported as
//! [`ProductLookup::NotFound`], never as an error, so callers can tell
//! "no such product" apart from "could not ask".

use std::time::Duration;

use foodscout_core::{AppConfig, Product};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::OffError;
use crate::retry::retry_with_backoff;
use crate::types::{CategoriesResponse, CategoryTag, ProductLookup, ProductResponse, SearchResponse};

const DEFAULT_BASE_URL: &str = "https://world.openfoodfacts.org";

/// Connection and retry settings for [`OffClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure on transient errors.
    pub max_retries: u32,
    pub backoff_base_ms: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            user_agent: foodscout_core::config::DEFAULT_USER_AGENT.to_string(),
            max_retries: 2,
            backoff_base_ms: 500,
        }
    }
}

impl ClientOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            max_retries: config.max_retries,
            backoff_base_ms: config.retry_backoff_base_ms,
        }
    }
}

/// Client for the Open Food Facts API.
///
/// Use [`OffClient::new`] with options derived from the app config, or
/// [`OffClient::with_base_url`] to point at a mock server in tests.
pub struct OffClient {
    client: Client,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl OffClient {
    /// Creates a client from explicit options.
    ///
    /// # Errors
    ///
    /// Returns [`OffError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`OffError::InvalidBaseUrl`] if the base URL does
    /// not parse or cannot carry a path.
    pub fn new(options: &ClientOptions) -> Result<Self, OffError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(options.user_agent.as_str())
            .build()?;

        let normalised = format!("{}/", options.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| OffError::InvalidBaseUrl {
            base_url: options.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(OffError::InvalidBaseUrl {
                base_url: options.base_url.clone(),
                reason: "URL cannot carry a path".to_string(),
            });
        }

        Ok(Self {
            client,
            base_url,
            max_retries: options.max_retries,
            backoff_base_ms: options.backoff_base_ms,
        })
    }

    /// Creates a client with default options against a custom base URL,
    /// with retries disabled.
    ///
    /// # Errors
    ///
    /// Same as [`OffClient::new`].
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Result<Self, OffError> {
        Self::new(&ClientOptions {
            base_url: base_url.to_string(),
            timeout_secs,
            max_retries: 0,
            backoff_base_ms: 0,
            ..ClientOptions::default()
        })
    }

    /// Fetches one page of free-text search results.
    ///
    /// Pages are 1-based. The returned list holds at most `page_size`
    /// products; entries that cannot be decoded are skipped.
    ///
    /// # Errors
    ///
    /// - [`OffError::Http`] on network failure or timeout after retries.
    /// - [`OffError::RateLimited`] / [`OffError::UnexpectedStatus`] on non-2xx statuses.
    /// - [`OffError::Deserialize`] if the envelope is not valid JSON.
    pub async fn search_products(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Product>, OffError> {
        let mut url = self.endpoint(&["cgi", "search.pl"]);
        url.query_pairs_mut()
            .append_pair("search_terms", query)
            .append_pair("page", &page.to_string())
            .append_pair("page_size", &page_size.to_string())
            .append_pair("json", "true");

        let context = format!("search(query={query}, page={page})");
        let body = self.get_text(&url).await?.ok_or_else(|| not_found_status(&url))?;
        let envelope: SearchResponse = parse_body(&body, &context)?;
        Ok(decode_products(envelope.products, &context))
    }

    /// Looks up a single product by barcode.
    ///
    /// # Errors
    ///
    /// - [`OffError::Http`] on network failure or timeout after retries.
    /// - [`OffError::RateLimited`] / [`OffError::UnexpectedStatus`] on non-2xx
    ///   statuses other than 404.
    /// - [`OffError::Deserialize`] if the envelope is not valid JSON.
    pub async fn get_product(&self, barcode: &str) -> Result<ProductLookup, OffError> {
        let url = self.endpoint(&["api", "v0", "product", &format!("{barcode}.json")]);
        let context = format!("product(barcode={barcode})");

        let Some(body) = self.get_text(&url).await? else {
            tracing::debug!(barcode, "product endpoint returned 404");
            return Ok(ProductLookup::NotFound);
        };
        let envelope: ProductResponse = parse_body(&body, &context)?;
        let found = envelope.is_found();

        let product = match envelope.product {
            Some(value @ Value::Object(_)) if found => value,
            _ => {
                tracing::debug!(
                    barcode,
                    status_verbose = envelope.status_verbose.as_deref().unwrap_or(""),
                    "barcode not found"
                );
                return Ok(ProductLookup::NotFound);
            }
        };

        let product: Product =
            serde_json::from_value(product).map_err(|e| OffError::Deserialize { context, source: e })?;
        Ok(ProductLookup::Found(Box::new(product)))
    }

    /// Lists the category facets known to the database.
    ///
    /// # Errors
    ///
    /// Same as [`OffClient::search_products`].
    pub async fn list_categories(&self) -> Result<Vec<CategoryTag>, OffError> {
        let url = self.endpoint(&["categories.json"]);
        let body = self.get_text(&url).await?.ok_or_else(|| not_found_status(&url))?;
        let envelope: CategoriesResponse = parse_body(&body, "categories")?;
        Ok(envelope.tags)
    }

    /// Fetches one page of products in a category facet, e.g. `beverages`.
    ///
    /// # Errors
    ///
    /// Same as [`OffClient::search_products`].
    pub async fn category_products(
        &self,
        category: &str,
        page: u32,
    ) -> Result<Vec<Product>, OffError> {
        let url = if page <= 1 {
            self.endpoint(&["category", &format!("{category}.json")])
        } else {
            self.endpoint(&["category", category, &format!("{page}.json")])
        };
        let context = format!("category(category={category}, page={page})");
        let body = self.get_text(&url).await?.ok_or_else(|| not_found_status(&url))?;
        let envelope: SearchResponse = parse_body(&body, &context)?;
        Ok(decode_products(envelope.products, &context))
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Sends a GET request with retry and returns the body.
    ///
    /// `Ok(None)` means HTTP 404.
    async fn get_text(&self, url: &Url) -> Result<Option<String>, OffError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            async move {
                let response = self
                    .client
                    .get(url.clone())
                    .header(reqwest::header::ACCEPT, "application/json")
                    .send()
                    .await?;
                let status = response.status();

                if status == StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    return Err(OffError::RateLimited { retry_after_secs });
                }

                if status == StatusCode::NOT_FOUND {
                    return Ok(None);
                }

                if !status.is_success() {
                    return Err(OffError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: url.to_string(),
                    });
                }

                Ok(Some(response.text().await?))
            }
        })
        .await
    }
}

fn not_found_status(url: &Url) -> OffError {
    OffError::UnexpectedStatus {
        status: StatusCode::NOT_FOUND.as_u16(),
        url: url.to_string(),
    }
}

fn parse_body<T: DeserializeOwned>(body: &str, context: &str) -> Result<T, OffError> {
    serde_json::from_str(body).map_err(|e| OffError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}

/// Decodes each raw entry on its own, skipping those that are not products.
fn decode_products(raw: Vec<Value>, context: &str) -> Vec<Product> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<Product>(value) {
            Ok(product) => Some(product),
            Err(e) => {
                tracing::warn!(context, index, error = %e, "skipping undecodable product entry");
                None
            }
        })
        .collect()
}
