//! Write-through cart store.
//!
//! [`CartStore`] owns a [`Cart`] together with a durable key-value storage
//! backend and keeps the two in sync: every mutation commits to the in-memory
//! cart first and then attempts a best-effort write to storage. A failed
//! write is logged and swallowed; it never rolls back the in-memory state,
//! which stays authoritative for the rest of the session.
//!
//! Subscribers registered with [`CartStore::subscribe`] are notified with the
//! post-mutation cart after every change, whether or not the durable write
//! succeeded.

use thiserror::Error;

use super::{Cart, LineKey};
use crate::models::product::Product;
use ramadhane_core::Price;

/// The single well-known storage key for the serialized cart.
pub const CART_STORAGE_KEY: &str = "cart";

/// A storage backend read or write failure.
#[derive(Debug, Error)]
#[error("cart storage error: {0}")]
pub struct StorageError(pub String);

/// Durable key-value string storage scoped to the visitor.
///
/// The contract is deliberately tiny: read a string, write a string, delete a
/// key. The store never inspects backend internals.
pub trait CartStorage {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be written.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be written.
    fn delete(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-memory [`CartStorage`] backend.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: std::collections::HashMap<String, String>,
}

impl MemoryStorage {
    /// Create an empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

type Subscriber = Box<dyn FnMut(&Cart)>;

/// Single source of truth for cart contents and derived totals.
pub struct CartStore<S: CartStorage> {
    cart: Cart,
    storage: S,
    subscribers: Vec<Subscriber>,
}

impl<S: CartStorage> CartStore<S> {
    /// Create a store, restoring any cart previously persisted in `storage`.
    ///
    /// A missing key starts an empty cart. A read failure or a payload that
    /// no longer parses is logged and also starts an empty cart; losing a
    /// stale cart is preferable to refusing to start the session.
    pub fn restore(storage: S) -> Self {
        let cart = match storage.read(CART_STORAGE_KEY) {
            Ok(Some(raw)) => parse_persisted(&raw),
            Ok(None) => Cart::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted cart, starting empty");
                Cart::new()
            }
        };

        Self {
            cart,
            storage,
            subscribers: Vec::new(),
        }
    }

    /// The current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Sum of line quantities.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.cart.total_items()
    }

    /// Sum of `effective_price * quantity` over all lines.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.cart.total_price()
    }

    /// Register a subscriber notified with the cart after every mutation.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&Cart) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Add one unit of `product` in the given configuration.
    ///
    /// See [`Cart::add`] for the merge semantics.
    pub fn add_item(
        &mut self,
        product: &Product,
        size: impl Into<String>,
        color: impl Into<String>,
    ) {
        self.cart.add(product, size, color);
        self.commit();
    }

    /// Remove the line matching `key`; absent identities are a no-op.
    pub fn remove_item(&mut self, key: &LineKey) {
        self.cart.remove(key);
        self.commit();
    }

    /// Set the quantity of the line matching `key`, clamped to a minimum of 1.
    pub fn update_quantity(&mut self, key: &LineKey, quantity: u32) {
        self.cart.set_quantity(key, quantity);
        self.commit();
    }

    /// Empty the cart and clear persisted state.
    pub fn clear_cart(&mut self) {
        self.cart.clear();
        if let Err(e) = self.storage.delete(CART_STORAGE_KEY) {
            tracing::warn!(error = %e, "Failed to clear persisted cart");
        }
        self.notify();
    }

    /// Persist the in-memory cart and notify subscribers.
    ///
    /// The in-memory mutation has already happened; a storage failure is
    /// logged and the session continues with memory as the source of truth.
    fn commit(&mut self) {
        match serde_json::to_string(&self.cart) {
            Ok(serialized) => {
                if let Err(e) = self.storage.write(CART_STORAGE_KEY, &serialized) {
                    tracing::warn!(error = %e, "Failed to persist cart");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize cart");
            }
        }
        self.notify();
    }

    fn notify(&mut self) {
        for subscriber in &mut self.subscribers {
            subscriber(&self.cart);
        }
    }
}

/// Parse a persisted payload, treating corruption as an empty cart.
fn parse_persisted(raw: &str) -> Cart {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Persisted cart is corrupt, starting empty");
        Cart::new()
    })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use chrono::Utc;

    use super::*;
    use crate::models::product::ProductImage;
    use ramadhane_core::ProductId;

    /// Backend whose writes always fail; reads succeed.
    #[derive(Debug, Default)]
    struct BrokenStorage;

    impl CartStorage for BrokenStorage {
        fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn write(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError("quota exceeded".to_string()))
        }

        fn delete(&mut self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError("quota exceeded".to_string()))
        }
    }

    fn product(id: i32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: None,
            price: Price::from_minor(5000, 2),
            sale_price: None,
            category: "Dresses".to_string(),
            collaborator: None,
            colors: vec!["Black".to_string()],
            sizes: vec!["M".to_string()],
            images: vec![ProductImage {
                url: format!("/products/{id}/main.jpg"),
                is_main: true,
            }],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_persistence_round_trip() {
        let mut store = CartStore::restore(MemoryStorage::new());
        store.add_item(&product(1), "M", "Black");
        store.add_item(&product(2), "M", "Black");
        store.add_item(&product(3), "M", "Black");
        let persisted = store.cart().clone();

        // Hand the same backend to a fresh store, as a new session would.
        let restored = CartStore::restore(store.storage);
        assert_eq!(*restored.cart(), persisted);
        assert_eq!(restored.total_items(), 3);
    }

    #[test]
    fn test_restore_from_missing_or_corrupt_state() {
        let store = CartStore::restore(MemoryStorage::new());
        assert!(store.cart().is_empty());

        let mut storage = MemoryStorage::new();
        storage
            .write(CART_STORAGE_KEY, "{not json")
            .expect("memory write");
        let store = CartStore::restore(storage);
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_write_failure_keeps_memory_authoritative() {
        let mut store = CartStore::restore(BrokenStorage);

        store.add_item(&product(1), "M", "Black");
        store.add_item(&product(1), "M", "Black");

        assert_eq!(store.total_items(), 2);
        assert_eq!(store.total_price(), Price::from_minor(10000, 2));

        store.clear_cart();
        assert!(store.cart().is_empty());
    }

    #[test]
    fn test_subscribers_see_every_mutation() {
        let seen: Rc<RefCell<Vec<u32>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut store = CartStore::restore(MemoryStorage::new());
        store.subscribe(move |cart| sink.borrow_mut().push(cart.total_items()));

        let p = product(1);
        let key = LineKey::new(p.id, "M", "Black");
        store.add_item(&p, "M", "Black");
        store.add_item(&p, "M", "Black");
        store.update_quantity(&key, 5);
        store.remove_item(&key);
        store.clear_cart();

        assert_eq!(*seen.borrow(), vec![1, 2, 5, 0, 0]);
    }

    #[test]
    fn test_clear_cart_deletes_persisted_state() {
        let mut store = CartStore::restore(MemoryStorage::new());
        store.add_item(&product(1), "M", "Black");
        store.clear_cart();

        assert_eq!(
            store.storage.read(CART_STORAGE_KEY).expect("memory read"),
            None
        );
    }
}
