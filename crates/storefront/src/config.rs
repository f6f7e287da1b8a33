//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `REMOTE_STORE_URL` - Base URL of the hosted backend project
//! - `REMOTE_STORE_ANON_KEY` - Project anon key (row-level security still
//!   applies; this key only identifies the project)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL (default: http://localhost:3000)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::IpAddr;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Base URL of the hosted backend project
    pub remote_store_url: String,
    /// Project anon key
    pub remote_store_anon_key: SecretString,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl std::fmt::Debug for StorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("base_url", &self.base_url)
            .field("remote_store_url", &self.remote_store_url)
            .field("remote_store_anon_key", &"[REDACTED]")
            .field("sentry_dsn", &self.sentry_dsn)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if the anon key looks like an unconfigured placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let remote_store_url = required("REMOTE_STORE_URL")?;
        url::Url::parse(&remote_store_url).map_err(|e| {
            ConfigError::InvalidEnvVar("REMOTE_STORE_URL".to_string(), e.to_string())
        })?;

        let remote_store_anon_key = SecretString::from(required("REMOTE_STORE_ANON_KEY")?);
        reject_placeholder("REMOTE_STORE_ANON_KEY", &remote_store_anon_key)?;

        let host = optional("STOREFRONT_HOST")
            .unwrap_or_else(|| "127.0.0.1".to_string())
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string()))?;

        let port = optional("STOREFRONT_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string()))?;

        let base_url =
            optional("STOREFRONT_BASE_URL").unwrap_or_else(|| "http://localhost:3000".to_string());

        Ok(Self {
            host,
            port,
            base_url,
            remote_store_url,
            remote_store_anon_key,
            sentry_dsn: optional("SENTRY_DSN"),
        })
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Reject secrets that still carry an obvious placeholder value.
pub(crate) fn reject_placeholder(name: &str, secret: &SecretString) -> Result<(), ConfigError> {
    let value = secret.expose_secret().to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if value.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                name.to_string(),
                format!("contains placeholder pattern '{pattern}'"),
            ));
        }
    }
    Ok(())
}
