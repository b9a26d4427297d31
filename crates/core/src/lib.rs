//! NaturPrime Core - Shared types and storefront rules.
//!
//! This crate provides the pure pieces used across all NaturPrime components:
//! - `storefront` - Cart store, product feed client and checkout handoff
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices and the product feed record
//! - [`catalog`] - Filtering and sorting the product feed for display
//! - [`cart`] - Cart lines, quantity bounds and derived totals
//! - [`order`] - Customer details, order records and the handoff message

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod order;
pub mod types;

pub use cart::{Cart, CartLine, CartTotals, MAX_QUANTITY, MIN_QUANTITY, compute_totals};
pub use catalog::{CatalogQuery, CatalogView, ChipFilter, SortMode};
pub use order::{CustomerDetails, CustomerError, OrderRecord};
pub use types::*;
