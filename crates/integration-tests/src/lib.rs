//! Integration tests for NaturPrime.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p naturprime-integration-tests
//! ```
//!
//! The feed is served by an in-process `wiremock` server and storage lives in
//! a temporary directory, so no external services are needed.
//!
//! # Test Categories
//!
//! - `cart_persistence` - Cart state across store instances and legacy data
//! - `feed_client` - Product feed requests, errors and caching
//! - `checkout_flow` - Catalog to cart to order handoff

use std::path::Path;
use std::time::Duration;

use naturprime_storefront::StorefrontConfig;
use naturprime_storefront::config::FeedConfig;
use serde_json::{Value, json};
use url::Url;

/// Four products in feed order, matching the storefront's demo catalog.
#[must_use]
pub fn sample_feed() -> Value {
    json!([
        {
            "id": 1,
            "title": "Whey Protein Isolate",
            "description": "Hizli emilen whey protein",
            "price": "899.00",
            "originalPrice": "1199.00",
            "image": "https://cdn.naturprime.com.tr/whey.png",
            "category": "protein",
            "badge": "Yeni",
            "tags": ["Premium"],
            "stock": 100
        },
        {
            "id": 2,
            "title": "Kreatin Monohidrat",
            "description": "Saf kreatin",
            "price": "649.00",
            "originalPrice": null,
            "image": "gradient-blue",
            "category": "performans",
            "badge": "Cok Satan",
            "tags": [],
            "stock": 40
        },
        {
            "id": 3,
            "title": "Vegan Protein",
            "description": "Bitkisel protein karisimi",
            "price": "1249.00",
            "originalPrice": null,
            "image": "gradient-green",
            "category": "protein",
            "badge": null,
            "tags": null,
            "stock": null
        },
        {
            "id": 4,
            "title": "Omega 3",
            "description": "Balik yagi",
            "price": "329.00",
            "originalPrice": "399.00",
            "image": "https://cdn.naturprime.com.tr/omega.png",
            "category": "saglik",
            "badge": "Yeni",
            "tags": ["Vegan Degil"],
            "stock": 250
        }
    ])
}

/// Look a product up in [`sample_feed`] by id.
#[must_use]
pub fn sample_product(id: i64) -> Value {
    sample_feed()
        .as_array()
        .and_then(|products| products.iter().find(|p| p["id"] == id).cloned())
        .unwrap_or(Value::Null)
}

/// Default configuration pointed at `feed_url` with storage under `dir`.
///
/// # Panics
///
/// Panics if `feed_url` is not a valid URL.
#[must_use]
pub fn test_config(feed_url: &str, dir: &Path) -> StorefrontConfig {
    let mut config = StorefrontConfig::from_lookup(|_| None)
        .unwrap_or_else(|e| panic!("default config is invalid: {e}"));
    config.feed = FeedConfig {
        api_url: Url::parse(feed_url).unwrap_or_else(|e| panic!("bad feed url: {e}")),
        timeout: Duration::from_secs(5),
        cache_ttl: Duration::from_secs(60),
    };
    config.storage_path = dir.join("storage.json");
    config
}
