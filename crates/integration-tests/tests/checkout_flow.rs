//! Catalog to cart to order handoff through `AppState`.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use naturprime_core::{CustomerDetails, ProductId};
use naturprime_integration_tests::{sample_feed, sample_product, test_config};
use naturprime_storefront::{AppError, AppState, CheckoutError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn feed_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_feed()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/products/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_product(1)))
        .mount(&server)
        .await;
    server
}

fn customer() -> CustomerDetails {
    CustomerDetails {
        full_name: "Ayse Yilmaz".to_string(),
        phone: "05551112233".to_string(),
        email: "ayse@example.com".to_string(),
        city: "Istanbul/Kadikoy".to_string(),
        address: "Moda Cad. 1".to_string(),
    }
}

#[tokio::test]
async fn test_order_handoff() {
    let server = feed_server().await;
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::new(test_config(&server.uri(), dir.path())).unwrap();

    let whey = state.feed().get_product(ProductId::new(1)).await.unwrap();
    state.cart().add_item(&whey, 3).unwrap();

    let cart = state.cart().snapshot().cart;
    let handoff = state.checkout().place_order(&cart, customer()).unwrap();

    assert_eq!(handoff.order.item_count(), 3);
    assert_eq!(handoff.link.host_str(), Some("wa.me"));
    assert_eq!(handoff.link.path(), "/905345872637");
    assert!(handoff.link.as_str().contains("Toplam%3A%20%E2%82%BA2.697"));

    // The cart stays until the caller clears it.
    assert_eq!(state.cart().item_count(), 3);

    // A fresh process sees the same last order.
    let reopened = AppState::new(test_config(&server.uri(), dir.path())).unwrap();
    let last = reopened.checkout().last_order().unwrap().unwrap();
    assert_eq!(last.id, handoff.order.id);
    assert_eq!(last.customer, customer());
    assert_eq!(reopened.cart().item_count(), 3);
}

#[tokio::test]
async fn test_checkout_rejects_empty_cart() {
    let server = feed_server().await;
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::new(test_config(&server.uri(), dir.path())).unwrap();

    let cart = state.cart().snapshot().cart;
    let err: AppError = state
        .checkout()
        .place_order(&cart, customer())
        .unwrap_err()
        .into();

    assert!(matches!(err, AppError::Checkout(CheckoutError::EmptyCart)));
    assert_eq!(err.exit_code(), 2);
    assert!(state.checkout().last_order().unwrap().is_none());
}

#[tokio::test]
async fn test_unknown_product_cannot_be_added() {
    let server = feed_server().await;
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::new(test_config(&server.uri(), dir.path())).unwrap();

    // Unmatched requests get wiremock's default 404.
    let err: AppError = state
        .feed()
        .get_product(ProductId::new(42))
        .await
        .unwrap_err()
        .into();

    assert!(!err.is_internal());
    assert_eq!(err.exit_code(), 2);
    assert_eq!(state.cart().item_count(), 0);
}

#[tokio::test]
async fn test_cart_badge_follows_mutations() {
    let server = feed_server().await;
    let dir = tempfile::tempdir().unwrap();
    let state = AppState::new(test_config(&server.uri(), dir.path())).unwrap();
    let mut badge = state.cart().subscribe();

    let products = state.feed().list_products().await.unwrap();
    state.cart().add_item(&products[0], 2).unwrap();
    state.cart().add_item(&products[3], 1).unwrap();

    badge.changed().await.unwrap();
    assert_eq!(badge.borrow_and_update().item_count(), 3);

    state.cart().update_quantity(products[0].id, -1).unwrap();
    badge.changed().await.unwrap();
    assert_eq!(badge.borrow_and_update().item_count(), 2);
}
