//! Shopping cart store.
//!
//! The cart is a list of lines, at most one per item, each with a quantity of
//! at least 1. Every mutation rewrites the whole list to persisted storage
//! under [`keys::CART`](crate::storage::keys::CART); construction reads it
//! back. Display fields are copied from the item when its line is created and
//! are never re-synced with the catalog.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use techstore_core::{Item, ItemId, Price};

use crate::error::add_breadcrumb;
use crate::storage::{KeyValueStore, StorageError, keys};

/// One item in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ItemId,
    pub name: String,
    /// Unit price when the line was created.
    pub price: Decimal,
    pub category: String,
    pub brand: Option<String>,
    pub image_url: String,
    /// Stock when the line was created.
    pub stock: u32,
    pub quantity: u32,
}

impl CartLine {
    fn from_item(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            category: item.category.clone(),
            brand: item.brand.clone(),
            image_url: item.image_url.clone(),
            stock: item.stock,
            quantity: 1,
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// The persisted shopping cart.
pub struct CartStore {
    lines: Vec<CartLine>,
    storage: Arc<dyn KeyValueStore>,
}

impl CartStore {
    /// Create the store, restoring any persisted cart.
    ///
    /// Missing, unreadable or corrupt data yields an empty cart.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        let lines = restore(storage.as_ref());
        Self { lines, storage }
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add one unit of an item. Stock is not checked here; see
    /// [`Self::can_add_more`].
    pub fn add(&mut self, item: &Item) {
        if let Some(line) = self.line_mut(&item.id) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.lines.push(CartLine::from_item(item));
        }
        add_breadcrumb("cart", "Added to cart", Some(&[("item_id", item.id.as_str())]));
        self.persist();
    }

    /// Remove an item's line. No-op if absent.
    pub fn remove(&mut self, id: &ItemId) {
        let before = self.lines.len();
        self.lines.retain(|line| &line.id != id);
        if self.lines.len() != before {
            add_breadcrumb("cart", "Removed from cart", Some(&[("item_id", id.as_str())]));
        }
        self.persist();
    }

    /// Replace a line's quantity. Zero or less removes the line.
    pub fn set_quantity(&mut self, id: &ItemId, quantity: i64) {
        if quantity <= 0 {
            self.remove(id);
            return;
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(line) = self.line_mut(id) {
            line.quantity = quantity;
        }
        self.persist();
    }

    pub fn increment(&mut self, id: &ItemId) {
        if let Some(line) = self.line_mut(id) {
            line.quantity = line.quantity.saturating_add(1);
        }
        self.persist();
    }

    /// Decrease by one, stopping at 1. Never removes the line.
    pub fn decrement(&mut self, id: &ItemId) {
        if let Some(line) = self.line_mut(id) {
            line.quantity = line.quantity.saturating_sub(1).max(1);
        }
        self.persist();
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        add_breadcrumb("cart", "Cart cleared", None);
        if let Err(e) = self.storage.remove(keys::CART) {
            tracing::warn!(error = %e, "Failed to clear persisted cart");
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Sum of all quantities.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of line totals, using the prices stored on the lines.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// [`Self::total_price`] in the store currency.
    #[must_use]
    pub fn total(&self) -> Price {
        Price::store(self.total_price())
    }

    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.lines.iter().any(|line| &line.id == id)
    }

    /// Quantity in the cart, 0 when absent.
    #[must_use]
    pub fn quantity_of(&self, id: &ItemId) -> u32 {
        self.lines
            .iter()
            .find(|line| &line.id == id)
            .map_or(0, |line| line.quantity)
    }

    /// Whether one more unit fits within the item's current stock.
    #[must_use]
    pub fn can_add_more(&self, item: &Item) -> bool {
        self.quantity_of(&item.id) < item.stock
    }

    fn line_mut(&mut self, id: &ItemId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| &line.id == id)
    }

    fn persist(&self) {
        if let Err(e) = write_lines(self.storage.as_ref(), &self.lines) {
            tracing::warn!(error = %e, "Failed to persist cart");
        }
    }
}

fn write_lines(storage: &dyn KeyValueStore, lines: &[CartLine]) -> Result<(), StorageError> {
    let json = serde_json::to_string(lines)?;
    storage.set(keys::CART, &json)
}

/// Read the persisted lines, discarding anything that is not a valid cart.
fn restore(storage: &dyn KeyValueStore) -> Vec<CartLine> {
    let raw = match storage.get(keys::CART) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read persisted cart");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<CartLine>>(&raw) {
        Ok(lines) if is_well_formed(&lines) => lines,
        Ok(_) => {
            tracing::warn!("Persisted cart violates line invariants, resetting");
            Vec::new()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Persisted cart is corrupt, resetting");
            Vec::new()
        }
    }
}

/// One line per item, each with a positive quantity.
fn is_well_formed(lines: &[CartLine]) -> bool {
    let mut seen = std::collections::HashSet::new();
    lines
        .iter()
        .all(|line| line.quantity >= 1 && seen.insert(&line.id))
}
