//! The persisted, observable cart.
//!
//! [`CartStore`] is the single owner of cart state. Every mutation runs a
//! full read-modify-write cycle against storage, so a cart written by another
//! process sharing the same store is never clobbered with a stale copy. After
//! each write the new [`CartSnapshot`] is published on a `watch` channel;
//! subscribers such as a header badge see the latest snapshot and never an
//! intermediate state.
//!
//! # Storage keys
//!
//! - `np_cart` holds the current versioned record
//! - `np_cart_items` and `np_cart_count` are the legacy unversioned keys; the
//!   items are imported when no current record exists and both are removed on
//!   the next write

use std::sync::Arc;

use naturprime_core::{Cart, CartLine, CartTotals, Product, ProductId};
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use crate::error::add_breadcrumb;
use crate::storage::{KeyValueStore, RecordRepository, StorageError};

pub const CART_KEY: &str = "np_cart";
pub const CART_RECORD_VERSION: u32 = 1;
pub const LEGACY_ITEMS_KEY: &str = "np_cart_items";
pub const LEGACY_COUNT_KEY: &str = "np_cart_count";

/// The cart as of one published revision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartSnapshot {
    /// Increases by one on every publish from a given store.
    pub revision: u64,
    pub cart: Cart,
    pub totals: CartTotals,
}

impl CartSnapshot {
    fn new(revision: u64, cart: Cart) -> Self {
        let totals = cart.totals();
        Self {
            revision,
            cart,
            totals,
        }
    }

    /// Total units across all lines, for the header badge.
    #[must_use]
    pub const fn item_count(&self) -> u32 {
        self.totals.item_count
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }
}

/// Persisted cart with change notifications.
pub struct CartStore<S> {
    store: Arc<S>,
    records: RecordRepository<S, Cart>,
    tx: watch::Sender<CartSnapshot>,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Open the cart stored in `store`.
    ///
    /// A missing, malformed or outdated record yields an empty cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn open(store: Arc<S>) -> Result<Self, StorageError> {
        let records = RecordRepository::new(Arc::clone(&store), CART_KEY, CART_RECORD_VERSION);
        let (tx, _rx) = watch::channel(CartSnapshot::default());
        let cart_store = Self { store, records, tx };

        let cart = cart_store.load()?;
        debug!(lines = cart.len(), "Cart opened");
        cart_store.tx.send_replace(CartSnapshot::new(0, cart));
        Ok(cart_store)
    }

    /// The latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        self.tx.borrow().clone()
    }

    /// Subscribe to cart changes.
    ///
    /// The receiver starts at the current snapshot; `changed()` resolves on
    /// the next publish.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.tx.subscribe()
    }

    /// Total units in the cart.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.tx.borrow().item_count()
    }

    /// Re-read storage and publish whatever is there now.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn refresh(&self) -> Result<CartSnapshot, StorageError> {
        let cart = self.load()?;
        Ok(self.publish(cart))
    }

    /// Add `quantity` units of a product, merging with an existing line.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read or written.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_item(&self, product: &Product, quantity: u32) -> Result<CartSnapshot, StorageError> {
        let mut cart = self.load()?;
        let line_quantity = cart.add(product, quantity);
        debug!(line_quantity, "Added to cart");

        let (id, quantity) = (product.id.to_string(), line_quantity.to_string());
        add_breadcrumb(
            "cart",
            "Added to cart",
            Some(&[("product_id", id.as_str()), ("quantity", quantity.as_str())]),
        );
        self.persist(cart)
    }

    /// Shift a line's quantity by `delta`, clamped to `1..=99`.
    ///
    /// Missing products are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read or written.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn update_quantity(
        &self,
        product_id: ProductId,
        delta: i64,
    ) -> Result<CartSnapshot, StorageError> {
        let mut cart = self.load()?;
        if !cart.adjust(product_id, delta) {
            debug!("Product not in cart");
        }

        let (id, delta) = (product_id.to_string(), delta.to_string());
        add_breadcrumb(
            "cart",
            "Updated quantity",
            Some(&[("product_id", id.as_str()), ("delta", delta.as_str())]),
        );
        self.persist(cart)
    }

    /// Remove a product's line. Missing products are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read or written.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn remove_item(&self, product_id: ProductId) -> Result<CartSnapshot, StorageError> {
        let mut cart = self.load()?;
        if !cart.remove(product_id) {
            debug!("Product not in cart");
        }

        let id = product_id.to_string();
        add_breadcrumb("cart", "Removed from cart", Some(&[("product_id", id.as_str())]));
        self.persist(cart)
    }

    /// Empty the cart and delete its stored record.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be written.
    #[instrument(skip(self))]
    pub fn clear(&self) -> Result<CartSnapshot, StorageError> {
        self.records.delete()?;
        self.remove_legacy()?;

        add_breadcrumb("cart", "Cleared cart", None);
        Ok(self.publish(Cart::new()))
    }

    fn load(&self) -> Result<Cart, StorageError> {
        if let Some(cart) = self.records.load()? {
            return Ok(cart);
        }
        self.load_legacy()
    }

    fn load_legacy(&self) -> Result<Cart, StorageError> {
        let Some(raw) = self.store.get(LEGACY_ITEMS_KEY)? else {
            return Ok(Cart::new());
        };

        match serde_json::from_str::<Vec<CartLine>>(&raw) {
            Ok(lines) => {
                debug!(lines = lines.len(), "Imported legacy cart");
                Ok(Cart::from_lines(lines))
            }
            Err(e) => {
                warn!(key = LEGACY_ITEMS_KEY, error = %e, "Discarding malformed legacy cart");
                Ok(Cart::new())
            }
        }
    }

    fn remove_legacy(&self) -> Result<(), StorageError> {
        self.store.remove(LEGACY_ITEMS_KEY)?;
        self.store.remove(LEGACY_COUNT_KEY)
    }

    fn persist(&self, cart: Cart) -> Result<CartSnapshot, StorageError> {
        self.records.save(&cart)?;
        self.remove_legacy()?;
        Ok(self.publish(cart))
    }

    fn publish(&self, cart: Cart) -> CartSnapshot {
        let revision = self.tx.borrow().revision + 1;
        let snapshot = CartSnapshot::new(revision, cart);
        self.tx.send_replace(snapshot.clone());
        snapshot
    }
}
