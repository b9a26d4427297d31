//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `NATURPRIME_API_URL` - Base URL of the product feed (default: `http://127.0.0.1:5000`)
//! - `NATURPRIME_STORAGE_PATH` - Local storage document (default: `.naturprime/storage.json`)
//! - `NATURPRIME_WHATSAPP_NUMBER` - Merchant number for order handoff, digits only
//!   (default: `905345872637`)
//! - `NATURPRIME_FEED_TIMEOUT_SECS` - Feed request timeout (default: 10)
//! - `NATURPRIME_FEED_CACHE_TTL_SECS` - Feed cache lifetime (default: 300)
//! - `NATURPRIME_LOG_FORMAT` - `pretty` or `json` (default: `pretty`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate between 0 and 1 (default: 1.0)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_STORAGE_PATH: &str = ".naturprime/storage.json";
const DEFAULT_WHATSAPP_NUMBER: &str = "905345872637";
const DEFAULT_FEED_TIMEOUT_SECS: u64 = 10;
const DEFAULT_FEED_CACHE_TTL_SECS: u64 = 300;

/// E.164 allows at most 15 digits.
const WHATSAPP_NUMBER_LEN: std::ops::RangeInclusive<usize> = 8..=15;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Product feed client configuration
    pub feed: FeedConfig,
    /// Path of the local storage document
    pub storage_path: PathBuf,
    /// Order handoff configuration
    pub checkout: CheckoutConfig,
    /// Logging and error tracking configuration
    pub telemetry: TelemetryConfig,
}

/// Product feed client configuration.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Base URL; `/api/products` is resolved against it
    pub api_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
    /// How long fetched products stay cached
    pub cache_ttl: Duration,
}

/// Order handoff configuration.
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Merchant's messaging number in international format without `+`
    pub whatsapp_number: String,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected 'pretty' or 'json', got '{other}'")),
        }
    }
}

/// Logging and Sentry configuration.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    pub sentry_sample_rate: f32,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(&lookup);

        Ok(Self {
            feed: FeedConfig::load(&env)?,
            storage_path: PathBuf::from(
                env.get_or_default("NATURPRIME_STORAGE_PATH", DEFAULT_STORAGE_PATH),
            ),
            checkout: CheckoutConfig::load(&env)?,
            telemetry: TelemetryConfig::load(&env)?,
        })
    }
}

impl FeedConfig {
    fn load(env: &Env<'_>) -> Result<Self, ConfigError> {
        let key = "NATURPRIME_API_URL";
        let api_url = Url::parse(&env.get_or_default(key, DEFAULT_API_URL))
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
        if !matches!(api_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("unsupported scheme '{}'", api_url.scheme()),
            ));
        }

        Ok(Self {
            api_url,
            timeout: Duration::from_secs(
                env.parse_or("NATURPRIME_FEED_TIMEOUT_SECS", DEFAULT_FEED_TIMEOUT_SECS)?,
            ),
            cache_ttl: Duration::from_secs(
                env.parse_or("NATURPRIME_FEED_CACHE_TTL_SECS", DEFAULT_FEED_CACHE_TTL_SECS)?,
            ),
        })
    }
}

impl CheckoutConfig {
    fn load(env: &Env<'_>) -> Result<Self, ConfigError> {
        let key = "NATURPRIME_WHATSAPP_NUMBER";
        let whatsapp_number = env.get_or_default(key, DEFAULT_WHATSAPP_NUMBER);
        validate_whatsapp_number(&whatsapp_number)
            .map_err(|reason| ConfigError::InvalidEnvVar(key.to_string(), reason))?;
        Ok(Self { whatsapp_number })
    }
}

impl TelemetryConfig {
    fn load(env: &Env<'_>) -> Result<Self, ConfigError> {
        let sentry_sample_rate: f32 = env.parse_or("SENTRY_SAMPLE_RATE", 1.0)?;
        if !(0.0..=1.0).contains(&sentry_sample_rate) {
            return Err(ConfigError::InvalidEnvVar(
                "SENTRY_SAMPLE_RATE".to_string(),
                format!("must be between 0 and 1 (got {sentry_sample_rate})"),
            ));
        }

        Ok(Self {
            log_format: env.parse_or("NATURPRIME_LOG_FORMAT", LogFormat::Pretty)?,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get an optional variable; blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    /// Get a variable with a default value.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |raw| {
            raw.parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }
}

fn validate_whatsapp_number(number: &str) -> Result<(), String> {
    if !number.chars().all(|c| c.is_ascii_digit()) {
        return Err("must contain digits only, without '+' or spaces".to_string());
    }
    if !WHATSAPP_NUMBER_LEN.contains(&number.len()) {
        return Err(format!(
            "must be {}-{} digits (got {})",
            WHATSAPP_NUMBER_LEN.start(),
            WHATSAPP_NUMBER_LEN.end(),
            number.len()
        ));
    }
    Ok(())
}
