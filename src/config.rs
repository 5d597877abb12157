//! Typed application config parsed from environment variables.
//!
//! DESIGN
//! ======
//! All persistence is delegated to a hosted storage-and-auth backend, so the
//! only required configuration is its base URL and API key. Everything else
//! has a sensible default. `.env` loading happens in `main` via dotenvy.

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_IMAGE_BUCKET: &str = "cabin-images";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {var}")]
    MissingVar { var: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the hosted backend, without a trailing slash.
    pub backend_url: String,
    /// Service API key sent with every backend request.
    pub api_key: String,
    /// Storage bucket that holds cabin images.
    pub image_bucket: String,
    pub port: u16,
    pub timeouts: HttpTimeouts,
}

impl AppConfig {
    /// Build typed config from environment variables.
    ///
    /// Required:
    /// - `BACKEND_URL`: base URL of the hosted backend
    /// - `BACKEND_API_KEY`: API key for table/storage/auth requests
    ///
    /// Optional:
    /// - `CABIN_IMAGE_BUCKET`: default `cabin-images`
    /// - `PORT`: default 3000
    /// - `BACKEND_REQUEST_TIMEOUT_SECS`: default 30
    /// - `BACKEND_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend_url = normalize_base_url(&require("BACKEND_URL")?);
        let api_key = require("BACKEND_API_KEY")?;
        let image_bucket =
            std::env::var("CABIN_IMAGE_BUCKET").unwrap_or_else(|_| DEFAULT_IMAGE_BUCKET.to_string());

        Ok(Self {
            backend_url,
            api_key,
            image_bucket,
            port: env_parse("PORT", DEFAULT_PORT),
            timeouts: HttpTimeouts {
                request_secs: env_parse("BACKEND_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
                connect_secs: env_parse("BACKEND_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
            },
        })
    }
}

fn require(var: &'static str) -> Result<String, ConfigError> {
    std::env::var(var).map_err(|_| ConfigError::MissingVar { var })
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Trim whitespace and any trailing slashes so URL joins stay predictable.
fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
