//! In-memory cart operations with write-through persistence.
//!
//! The cart is a flat list of product snapshots. Duplicates stand for
//! quantity: three entries with the same identity key are one line with
//! quantity 3. [`CartManager::grouped_items`] derives that view.

use std::collections::HashMap;

use foodscout_core::{identity_key, Product};
use serde::{Deserialize, Serialize};

use crate::error::CartError;
use crate::store::KeyValueStore;

/// Store key under which the cart list is saved.
pub const CART_KEY: &str = "cartItems";

/// Upper bound for [`CartManager::update_quantity`].
pub const MAX_LINE_QUANTITY: usize = 10_000;

/// One raw cart entry: a product snapshot plus its identity key, computed
/// once when the entry was created.
#[derive(Debug, Clone, PartialEq)]
pub struct CartEntry {
    key: String,
    product: Product,
}

impl CartEntry {
    #[must_use]
    pub fn new(product: Product) -> Self {
        Self {
            key: identity_key(&product),
            product,
        }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn product(&self) -> &Product {
        &self.product
    }
}

/// Persisted form of a [`CartEntry`]: the product's own fields plus the key.
///
/// Lists written without `_cart_key` (plain product objects) still load; the
/// key is computed on the way in.
#[derive(Serialize, Deserialize)]
struct StoredEntry {
    #[serde(rename = "_cart_key", default, skip_serializing_if = "Option::is_none")]
    key: Option<String>,
    #[serde(flatten)]
    product: Product,
}

impl From<StoredEntry> for CartEntry {
    fn from(stored: StoredEntry) -> Self {
        match stored.key.filter(|k| !k.is_empty()) {
            Some(key) => CartEntry {
                key,
                product: stored.product,
            },
            None => CartEntry::new(stored.product),
        }
    }
}

/// A cart line: one representative snapshot and how many raw entries share
/// its key.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedCartItem {
    pub key: String,
    pub product: Product,
    /// Always at least 1.
    pub quantity: usize,
}

/// The cart service. Construct once with [`CartManager::load`] and pass by
/// reference to whatever needs it.
pub struct CartManager<S> {
    store: S,
    entries: Vec<CartEntry>,
}

impl<S: KeyValueStore> CartManager<S> {
    /// Loads the persisted cart from `store`.
    ///
    /// Never fails: a store that cannot be read or holds malformed data is
    /// logged and treated as an empty cart.
    pub fn load(store: S) -> Self {
        let entries = match store.get(CART_KEY) {
            Ok(Some(raw)) => match decode_entries(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::error!(error = %e, "stored cart is malformed, starting with an empty cart");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::error!(error = %e, "failed to read stored cart, starting with an empty cart");
                Vec::new()
            }
        };
        tracing::debug!(entries = entries.len(), "cart loaded");
        Self { store, entries }
    }

    /// Raw entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Appends one snapshot of `product` and saves. Returns the entry's key.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Store`] or [`CartError::Serialize`] if saving fails.
    pub fn add_to_cart(&mut self, product: Product) -> Result<String, CartError> {
        let entry = CartEntry::new(product);
        let key = entry.key.clone();
        self.entries.push(entry);
        tracing::debug!(key = %key, "added to cart");
        self.save()?;
        Ok(key)
    }

    /// Removes every entry with `key` (the whole line) and saves. Returns how
    /// many entries were removed; an unknown key removes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Store`] or [`CartError::Serialize`] if saving fails.
    pub fn remove_from_cart(&mut self, key: &str) -> Result<usize, CartError> {
        let before = self.entries.len();
        self.entries.retain(|e| e.key != key);
        let removed = before - self.entries.len();
        tracing::debug!(key, removed, "removed from cart");
        self.save()?;
        Ok(removed)
    }

    /// Sets the quantity of the line with `key`.
    ///
    /// `quantity <= 0` removes the line. A key with no entries is left alone;
    /// lines are never created from nothing. Otherwise the line is replaced
    /// by exactly `quantity` copies of its first entry, appended at the end
    /// of the list.
    ///
    /// # Errors
    ///
    /// - [`CartError::QuantityTooLarge`] above [`MAX_LINE_QUANTITY`] for a
    ///   line that exists.
    /// - [`CartError::Store`] or [`CartError::Serialize`] if saving fails.
    pub fn update_quantity(&mut self, key: &str, quantity: i64) -> Result<(), CartError> {
        if quantity <= 0 {
            self.remove_from_cart(key)?;
            return Ok(());
        }

        let Some(representative) = self.entries.iter().find(|e| e.key == key).cloned() else {
            tracing::debug!(key, "quantity update for unknown key ignored");
            return Ok(());
        };

        let copies = usize::try_from(quantity)
            .ok()
            .filter(|q| *q <= MAX_LINE_QUANTITY)
            .ok_or(CartError::QuantityTooLarge {
                requested: quantity,
                max: MAX_LINE_QUANTITY,
            })?;

        self.entries.retain(|e| e.key != key);
        self.entries
            .extend(std::iter::repeat_n(representative, copies));
        tracing::debug!(key, quantity = copies, "cart quantity updated");
        self.save()
    }

    /// Adds one unit to an existing line. Returns the new quantity.
    ///
    /// # Errors
    ///
    /// - [`CartError::UnknownKey`] if no line has `key`.
    /// - Any error from [`CartManager::update_quantity`].
    pub fn increment(&mut self, key: &str) -> Result<usize, CartError> {
        let current = self.existing_quantity(key)?;
        self.update_quantity(key, to_i64(current + 1))?;
        Ok(current + 1)
    }

    /// Removes one unit from a line. Refused at quantity 1: dropping the last
    /// unit has to go through [`CartManager::remove_from_cart`].
    ///
    /// # Errors
    ///
    /// - [`CartError::UnknownKey`] if no line has `key`.
    /// - [`CartError::QuantityFloor`] if the line is at quantity 1.
    /// - Any error from [`CartManager::update_quantity`].
    pub fn decrement(&mut self, key: &str) -> Result<usize, CartError> {
        let current = self.existing_quantity(key)?;
        if current <= 1 {
            return Err(CartError::QuantityFloor {
                key: key.to_string(),
            });
        }
        self.update_quantity(key, to_i64(current - 1))?;
        Ok(current - 1)
    }

    /// Empties the cart and saves.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Store`] or [`CartError::Serialize`] if saving fails.
    pub fn clear_cart(&mut self) -> Result<(), CartError> {
        self.entries.clear();
        tracing::debug!("cart cleared");
        self.save()
    }

    /// Lines in first-seen order, with quantities.
    #[must_use]
    pub fn grouped_items(&self) -> Vec<GroupedCartItem> {
        let mut groups: Vec<GroupedCartItem> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for entry in &self.entries {
            if let Some(&i) = index.get(entry.key.as_str()) {
                groups[i].quantity += 1;
            } else {
                index.insert(entry.key.as_str(), groups.len());
                groups.push(GroupedCartItem {
                    key: entry.key.clone(),
                    product: entry.product.clone(),
                    quantity: 1,
                });
            }
        }
        groups
    }

    /// The line for `key`, if any entry carries it.
    #[must_use]
    pub fn get_group(&self, key: &str) -> Option<GroupedCartItem> {
        let representative = self.entries.iter().find(|e| e.key == key)?;
        Some(GroupedCartItem {
            key: representative.key.clone(),
            product: representative.product.clone(),
            quantity: self.quantity_of(key),
        })
    }

    /// Number of raw entries carrying `key`.
    #[must_use]
    pub fn quantity_of(&self, key: &str) -> usize {
        self.entries.iter().filter(|e| e.key == key).count()
    }

    /// Sum of all line quantities, which is the raw entry count.
    #[must_use]
    pub fn total_quantity(&self) -> usize {
        self.entries.len()
    }

    fn existing_quantity(&self, key: &str) -> Result<usize, CartError> {
        match self.quantity_of(key) {
            0 => Err(CartError::UnknownKey {
                key: key.to_string(),
            }),
            n => Ok(n),
        }
    }

    /// Writes the whole list under [`CART_KEY`].
    fn save(&mut self) -> Result<(), CartError> {
        let raw = encode_entries(&self.entries)?;
        self.store.set(CART_KEY, &raw)?;
        Ok(())
    }
}

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn encode_entries(entries: &[CartEntry]) -> Result<String, CartError> {
    let stored: Vec<StoredEntry> = entries
        .iter()
        .map(|e| StoredEntry {
            key: Some(e.key.clone()),
            product: e.product.clone(),
        })
        .collect();
    serde_json::to_string(&stored).map_err(CartError::Serialize)
}

fn decode_entries(raw: &str) -> Result<Vec<CartEntry>, serde_json::Error> {
    let stored: Vec<StoredEntry> = serde_json::from_str(raw)?;
    Ok(stored.into_iter().map(CartEntry::from).collect())
}

#[cfg(test)]
#[path = "manager_test.rs"]
mod tests;
