//! Catalog browsing commands.

use naturprime_core::{CatalogQuery, CatalogView, ProductId};
use naturprime_storefront::{AppState, KeyValueStore, Result};
use tracing::info;

use crate::render;

/// List the products matching `query`.
pub async fn list<S: KeyValueStore>(state: &AppState<S>, query: &CatalogQuery) -> Result<String> {
    let products = state.feed().list_products().await?;
    let view = CatalogView::build(Some(products.as_ref()), query);

    info!(
        total = products.len(),
        shown = view.products().len(),
        sort = %query.sort,
        "Catalog filtered"
    );
    Ok(render::catalog(&view))
}

/// Show one product.
pub async fn show<S: KeyValueStore>(state: &AppState<S>, id: ProductId) -> Result<String> {
    let product = state.feed().get_product(id).await?;
    Ok(render::product_detail(&product))
}
