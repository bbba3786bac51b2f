//! Cart engine.
//!
//! The cart is an insertion-ordered collection of line items keyed by the
//! triple `(product, size, color)`. Two adds with the same triple merge into
//! one line; a different size or color creates a distinct line. Prices and
//! display fields are snapshotted when an item is first added, so later
//! catalog edits do not silently change a cart the visitor already reviewed.
//!
//! Quantities are always at least 1. Dropping a line requires an explicit
//! [`Cart::remove`]; [`Cart::set_quantity`] clamps to 1 rather than deleting,
//! so a decrement control cannot make a line vanish by accident.
//!
//! No cart operation fails: mutations referencing an absent line are no-ops
//! and totals are recomputed from the items on every read.

pub mod store;

pub use store::{CartStorage, CartStore, MemoryStorage, StorageError, CART_STORAGE_KEY};

use serde::{Deserialize, Serialize};

use ramadhane_core::{Price, ProductId};

use crate::models::product::Product;

/// The identity of a cart line: one distinct purchasable configuration.
///
/// `size` and `color` are plain strings; a product without that variant axis
/// uses `""`. Keeping the fields non-optional means "no size" can only be
/// spelled one way, which is what makes identity comparison reliable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineKey {
    pub product_id: ProductId,
    pub size: String,
    pub color: String,
}

impl LineKey {
    /// Create a line key.
    #[must_use]
    pub fn new(product_id: ProductId, size: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            product_id,
            size: size.into(),
            color: color.into(),
        }
    }
}

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: ProductId,
    /// Selected size, `""` when the product has no size axis.
    pub size: String,
    /// Selected color, `""` when the product has no color axis.
    pub color: String,
    /// Always >= 1.
    pub quantity: u32,
    /// Product name at add time.
    pub name: String,
    /// Regular unit price at add time.
    pub unit_price: Price,
    /// Sale unit price at add time, if the product was on sale.
    pub sale_price: Option<Price>,
    /// Main product image at add time.
    pub image: Option<String>,
}

impl LineItem {
    /// The identity triple of this line.
    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey::new(self.product_id, self.size.clone(), self.color.clone())
    }

    /// Sale price when present, regular price otherwise.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        self.sale_price.unwrap_or(self.unit_price)
    }

    /// `effective_price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.effective_price() * self.quantity
    }
}

/// The cart for the active visitor session.
///
/// Serializes as a JSON array of line items, which is also the persisted
/// representation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// The line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add one unit of `product` in the given configuration.
    ///
    /// If a line with the same `(product, size, color)` identity exists its
    /// quantity is incremented by exactly 1; otherwise a new line with
    /// quantity 1 is appended, snapshotting the product's current price and
    /// display fields. Each call adds one unit, so rapid repeated clicks
    /// accumulate rather than deduplicate.
    pub fn add(&mut self, product: &Product, size: impl Into<String>, color: impl Into<String>) {
        let key = LineKey::new(product.id, size, color);

        if let Some(item) = self.items.iter_mut().find(|item| item.key() == key) {
            item.quantity += 1;
            return;
        }

        self.items.push(LineItem {
            product_id: product.id,
            size: key.size,
            color: key.color,
            quantity: 1,
            name: product.name.clone(),
            unit_price: product.price,
            sale_price: product.sale_price,
            image: product.primary_image().map(String::from),
        });
    }

    /// Remove the line matching `key`. Removing an absent identity is a no-op.
    pub fn remove(&mut self, key: &LineKey) {
        self.items.retain(|item| item.key() != *key);
    }

    /// Set the quantity of the line matching `key` to an absolute value,
    /// clamped to a minimum of 1. Absent identities are a no-op.
    ///
    /// Removal is never implicit: callers that want a line gone must call
    /// [`Cart::remove`].
    pub fn set_quantity(&mut self, key: &LineKey, quantity: u32) {
        if let Some(item) = self.items.iter_mut().find(|item| item.key() == *key) {
            item.quantity = quantity.max(1);
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of line quantities.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Sum of `effective_price * quantity` over all lines.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.items.iter().map(LineItem::line_total).sum()
    }
}
