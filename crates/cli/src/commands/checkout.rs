//! Checkout handoff and last-order commands.

use naturprime_core::CustomerDetails;
use naturprime_storefront::{AppState, KeyValueStore, Result};

use crate::render;

/// Place an order from the current cart.
///
/// The cart is kept unless `clear_cart` is set, so an abandoned handoff can
/// be retried.
pub fn place<S: KeyValueStore>(
    state: &AppState<S>,
    customer: CustomerDetails,
    clear_cart: bool,
) -> Result<String> {
    let snapshot = state.cart().snapshot();
    let handoff = state.checkout().place_order(&snapshot.cart, customer)?;

    if clear_cart {
        state.cart().clear()?;
    }
    Ok(render::handoff(&handoff))
}

pub fn show_last<S: KeyValueStore>(state: &AppState<S>) -> Result<String> {
    Ok(state
        .checkout()
        .last_order()?
        .map_or_else(|| "No order placed yet.\n".to_string(), |order| render::order(&order)))
}

pub fn clear_last<S: KeyValueStore>(state: &AppState<S>) -> Result<String> {
    state.checkout().clear_last_order()?;
    Ok("Last order cleared.\n".to_string())
}
