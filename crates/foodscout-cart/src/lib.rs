//! Locally persisted shopping cart.
//!
//! [`CartManager`] owns the raw list of cart entries and writes the whole
//! list to a [`KeyValueStore`] after every mutation.

pub mod error;
pub mod manager;
pub mod store;

pub use error::{CartError, StoreError};
pub use manager::{CartEntry, CartManager, GroupedCartItem, CART_KEY};
pub use store::{FileStore, KeyValueStore, MemoryStore};
