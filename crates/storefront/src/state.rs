//! Application state shared across commands.

use std::sync::Arc;

use crate::cart::CartStore;
use crate::checkout::Checkout;
use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::feed::FeedClient;
use crate::storage::{FileStore, KeyValueStore};

/// Application state shared across the storefront.
///
/// This struct is cheaply cloneable via `Arc`. The cart and the last order
/// live in the same store.
pub struct AppState<S = FileStore> {
    inner: Arc<AppStateInner<S>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct AppStateInner<S> {
    config: StorefrontConfig,
    feed: FeedClient,
    cart: CartStore<S>,
    checkout: Checkout<S>,
}

impl AppState<FileStore> {
    /// Create application state backed by the file at `config.storage_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be opened or the feed client
    /// cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self> {
        let store = Arc::new(FileStore::open(&config.storage_path)?);
        Self::with_store(config, store)
    }
}

impl<S: KeyValueStore> AppState<S> {
    /// Create application state over an existing store.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored cart cannot be read or the feed client
    /// cannot be built.
    pub fn with_store(config: StorefrontConfig, store: Arc<S>) -> Result<Self> {
        let feed = FeedClient::new(&config.feed)?;
        let cart = CartStore::open(Arc::clone(&store))?;
        let checkout = Checkout::new(store, &config.checkout);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                feed,
                cart,
                checkout,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product feed client.
    #[must_use]
    pub fn feed(&self) -> &FeedClient {
        &self.inner.feed
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore<S> {
        &self.inner.cart
    }

    /// Get a reference to the checkout service.
    #[must_use]
    pub fn checkout(&self) -> &Checkout<S> {
        &self.inner.checkout
    }
}
