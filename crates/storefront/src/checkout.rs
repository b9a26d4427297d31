//! Order handoff to the merchant's WhatsApp.
//!
//! Checkout does not take payment. It snapshots the cart and customer
//! details into an [`OrderRecord`], stores that record as the last order, and
//! produces a `wa.me` deep link carrying the order message.

use std::sync::Arc;

use chrono::Utc;
use naturprime_core::{Cart, CustomerDetails, CustomerError, OrderRecord};
use thiserror::Error;
use tracing::{info, instrument};
use url::Url;

use crate::config::CheckoutConfig;
use crate::error::add_breadcrumb;
use crate::storage::{KeyValueStore, RecordRepository, StorageError};

pub const LAST_ORDER_KEY: &str = "np_last_order";
pub const ORDER_RECORD_VERSION: u32 = 1;
const WHATSAPP_BASE_URL: &str = "https://wa.me/";

/// Errors that can occur when placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Invalid customer details: {0}")]
    InvalidCustomer(#[from] CustomerError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Failed to build handoff link: {0}")]
    Link(#[from] url::ParseError),
}

impl CheckoutError {
    /// Whether the failure is on our side rather than the customer's input.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Link(_))
    }
}

/// A placed order and the link that hands it to the merchant.
#[derive(Debug, Clone)]
pub struct Handoff {
    pub order: OrderRecord,
    pub link: Url,
}

/// Places orders and remembers the last one.
pub struct Checkout<S> {
    orders: RecordRepository<S, OrderRecord>,
    whatsapp_number: String,
}

impl<S: KeyValueStore> Checkout<S> {
    #[must_use]
    pub fn new(store: Arc<S>, config: &CheckoutConfig) -> Self {
        Self {
            orders: RecordRepository::new(store, LAST_ORDER_KEY, ORDER_RECORD_VERSION),
            whatsapp_number: config.whatsapp_number.clone(),
        }
    }

    /// Snapshot `cart` into an order and build its handoff link.
    ///
    /// The cart itself is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` or `CheckoutError::InvalidCustomer`
    /// when the order cannot be placed, or a storage error if the order
    /// record cannot be saved.
    #[instrument(skip_all, fields(lines = cart.len()))]
    pub fn place_order(
        &self,
        cart: &Cart,
        customer: CustomerDetails,
    ) -> Result<Handoff, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        customer.validate()?;

        let order = OrderRecord::from_cart(cart, customer, Utc::now());
        let link = self.handoff_link(&order.handoff_message())?;
        self.orders.save(&order)?;

        let order_id = order.id.to_string();
        add_breadcrumb(
            "checkout",
            "Order handed off",
            Some(&[("order_id", order_id.as_str())]),
        );
        info!(
            order_id = %order.id,
            items = order.item_count(),
            total = %order.totals.total,
            "Order handed off"
        );

        Ok(Handoff { order, link })
    }

    /// `https://wa.me/{number}?text={message}` with every character outside
    /// the RFC 3986 unreserved set percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured number does not form a valid URL.
    pub fn handoff_link(&self, message: &str) -> Result<Url, CheckoutError> {
        let link = format!(
            "{WHATSAPP_BASE_URL}{}?text={}",
            self.whatsapp_number,
            urlencoding::encode(message)
        );
        Ok(Url::parse(&link)?)
    }

    /// The most recently placed order, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn last_order(&self) -> Result<Option<OrderRecord>, StorageError> {
        self.orders.load()
    }

    /// Forget the most recently placed order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn clear_last_order(&self) -> Result<(), StorageError> {
        self.orders.delete()
    }
}
