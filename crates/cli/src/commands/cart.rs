//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! np-cli cart add 3 -q 2
//! np-cli cart update 3 -1
//! np-cli cart remove 3
//! np-cli cart show
//! np-cli cart clear
//! ```

use naturprime_core::ProductId;
use naturprime_storefront::{AppState, KeyValueStore, Result};
use tracing::info;

use crate::render;

pub fn show<S: KeyValueStore>(state: &AppState<S>) -> Result<String> {
    Ok(render::cart(&state.cart().snapshot()))
}

/// Look the product up in the feed, then add it.
pub async fn add<S: KeyValueStore>(
    state: &AppState<S>,
    id: ProductId,
    quantity: u32,
) -> Result<String> {
    let product = state.feed().get_product(id).await?;
    let snapshot = state.cart().add_item(&product, quantity)?;

    info!(product_id = %id, cart_items = snapshot.item_count(), "Added to cart");
    Ok(render::cart(&snapshot))
}

pub fn update<S: KeyValueStore>(state: &AppState<S>, id: ProductId, delta: i64) -> Result<String> {
    let snapshot = state.cart().update_quantity(id, delta)?;
    Ok(render::cart(&snapshot))
}

pub fn remove<S: KeyValueStore>(state: &AppState<S>, id: ProductId) -> Result<String> {
    let snapshot = state.cart().remove_item(id)?;
    Ok(render::cart(&snapshot))
}

pub fn clear<S: KeyValueStore>(state: &AppState<S>) -> Result<String> {
    let snapshot = state.cart().clear()?;
    Ok(render::cart(&snapshot))
}
