use thiserror::Error;

/// Errors returned by the Open Food Facts client.
///
/// A barcode that does not exist is not an error; see
/// [`crate::ProductLookup::NotFound`].
#[derive(Debug, Error)]
pub enum OffError {
    /// Network or TLS failure from the underlying HTTP client, including timeouts.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 429 from the API.
    #[error("rate limited by Open Food Facts (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
