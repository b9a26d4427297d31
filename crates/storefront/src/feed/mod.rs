//! Product feed client.
//!
//! The feed is a read-only JSON API:
//!
//! - `GET /api/products` returns every product in feed order
//! - `GET /api/products/{id}` returns one product, or 404
//!
//! Responses are cached with `moka`; a single product is served from the
//! cached list when the list is already present.

mod cache;

use std::sync::Arc;

use moka::future::Cache;
use naturprime_core::{Product, ProductId};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::FeedConfig;

use cache::{CacheKey, CacheValue};

/// Errors that can occur when talking to the product feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The feed answered with a non-success status.
    #[error("Feed returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Product not found.
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// An endpoint URL could not be built.
    #[error("Invalid feed URL: {0}")]
    Url(#[from] url::ParseError),
}

impl FeedError {
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

// =============================================================================
// FeedClient
// =============================================================================

/// Client for the product feed.
#[derive(Clone)]
pub struct FeedClient {
    inner: Arc<FeedClientInner>,
}

struct FeedClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl FeedClient {
    /// Create a new feed client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &FeedConfig) -> Result<Self, FeedError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("naturprime-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        // Resolve endpoints below the configured path, not beside it.
        let mut base_url = config.api_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            inner: Arc::new(FeedClientInner {
                client,
                base_url,
                cache,
            }),
        })
    }

    /// Fetch a feed path and decode the JSON body.
    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, FeedError> {
        let url = self.inner.base_url.join(path)?;

        let response = self
            .inner
            .client
            .get(url.clone())
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            if status != reqwest::StatusCode::NOT_FOUND {
                tracing::error!(
                    status = %status,
                    url = %url,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Product feed returned non-success status"
                );
            }
            return Err(FeedError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                url = %url,
                body = %response_text.chars().take(500).collect::<String>(),
                "Failed to parse product feed response"
            );
            FeedError::Parse(e)
        })
    }

    /// Get every product in feed order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a product list.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Arc<[Product]>, FeedError> {
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Products).await
        {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products: Arc<[Product]> = self.fetch::<Vec<Product>>("api/products").await?.into();
        debug!(count = products.len(), "Fetched products");

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(Arc::clone(&products)))
            .await;

        Ok(products)
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `FeedError::NotFound` if the feed has no such product, or
    /// another error if the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, FeedError> {
        let cache_key = CacheKey::Product(id);

        // Check cache
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }
        if let Some(CacheValue::Products(products)) =
            self.inner.cache.get(&CacheKey::Products).await
            && let Some(product) = products.iter().find(|p| p.id == id)
        {
            debug!("Product served from cached list");
            return Ok(product.clone());
        }

        let product: Product = match self.fetch(&format!("api/products/{id}")).await {
            Ok(product) => product,
            Err(FeedError::Status { status: 404, .. }) => return Err(FeedError::NotFound(id)),
            Err(e) => return Err(e),
        };

        // Cache the result
        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Drop every cached response.
    pub fn invalidate(&self) {
        self.inner.cache.invalidate_all();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(api_url: &str) -> FeedConfig {
        FeedConfig {
            api_url: Url::parse(api_url).unwrap(),
            timeout: Duration::from_secs(1),
            cache_ttl: Duration::from_secs(60),
        }
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let client = FeedClient::new(&config("https://feed.example.com/shop")).unwrap();
        assert_eq!(
            client.inner.base_url.join("api/products").unwrap().as_str(),
            "https://feed.example.com/shop/api/products"
        );

        let client = FeedClient::new(&config("http://127.0.0.1:5000")).unwrap();
        assert_eq!(
            client.inner.base_url.join("api/products/3").unwrap().as_str(),
            "http://127.0.0.1:5000/api/products/3"
        );
    }

    #[test]
    fn test_not_found_is_classified() {
        assert!(FeedError::NotFound(ProductId::new(1)).is_not_found());
        assert!(
            !FeedError::Status {
                status: 500,
                url: String::new()
            }
            .is_not_found()
        );
    }

    #[tokio::test]
    async fn test_unreachable_feed_is_http_error() {
        // Port 9 (discard) is closed on test machines.
        let client = FeedClient::new(&config("http://127.0.0.1:9")).unwrap();
        let err = client.list_products().await.unwrap_err();
        assert!(matches!(err, FeedError::Http(_)), "{err:?}");
    }
}
