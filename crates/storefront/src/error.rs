//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type for callers that drive the storefront
//! end to end. [`AppError::report`] captures server-side failures to Sentry
//! before the caller shows a message.

use thiserror::Error;

use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::feed::FeedError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Local storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Product feed request failed.
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    /// Checkout was rejected.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),
}

impl AppError {
    /// Whether this error is a fault on our side rather than the user's.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        match self {
            Self::Storage(_) => true,
            Self::Feed(err) => !err.is_not_found(),
            Self::Checkout(err) => err.is_internal(),
            Self::Config(_) => false,
        }
    }

    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 78,
            _ if !self.is_internal() => 2,
            _ => 1,
        }
    }

    /// Log this error and capture internal failures to Sentry.
    ///
    /// Returns the Sentry event id when an event was captured.
    pub fn report(&self) -> Option<sentry::types::Uuid> {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Operation failed"
            );
            Some(event_id)
        } else {
            tracing::info!(error = %self, "Operation rejected");
            None
        }
    }

    /// Message safe to show the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Feed(err) if !err.is_not_found() => "Product feed unavailable".to_string(),
            _ if self.is_internal() => "Internal error".to_string(),
            Self::Checkout(err) => err.to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "3")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
