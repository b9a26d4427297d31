//! NaturPrime storefront library.
//!
//! The stateful half of the storefront: the persisted cart, the product feed
//! client and the checkout handoff. Pure domain logic lives in
//! `naturprime-core`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod feed;
pub mod state;
pub mod storage;
pub mod telemetry;

pub use cart::{CartSnapshot, CartStore};
pub use checkout::{Checkout, CheckoutError, Handoff};
pub use config::StorefrontConfig;
pub use error::{AppError, Result};
pub use feed::{FeedClient, FeedError};
pub use state::AppState;
pub use storage::{FileStore, KeyValueStore, MemoryStore, RecordRepository, StorageError};
