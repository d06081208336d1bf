use std::path::PathBuf;

use thiserror::Error;

/// Errors from a [`crate::KeyValueStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access store file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store file exists but is not a JSON object.
    #[error("store file {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors returned by [`crate::CartManager`] operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Saving the cart failed. The in-memory cart already reflects the change.
    #[error("failed to save cart: {0}")]
    Store(#[from] StoreError),

    #[error("failed to serialize cart: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("no cart item with key '{key}'")]
    UnknownKey { key: String },

    /// Decrementing below one is refused; the item has to be removed instead.
    #[error("cart item '{key}' is already at quantity 1; remove it instead")]
    QuantityFloor { key: String },

    #[error("quantity {requested} exceeds the per-item limit of {max}")]
    QuantityTooLarge { requested: i64, max: usize },
}
