//! Client for the Open Food Facts public API.

pub mod client;
pub mod error;
mod retry;
pub mod types;

pub use client::{ClientOptions, OffClient};
pub use error::OffError;
pub use types::{CategoryTag, ProductLookup};
