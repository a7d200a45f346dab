//! Client configuration
//!
//! The API base address and request timeout come from the environment,
//! falling back to the local development server.

use crate::error::{AppError, AppResult};
use log::{info, warn};
use std::env;
use std::time::Duration;
use url::Url;

pub const API_URL_ENV: &str = "HABITCAL_API_URL";
pub const TIMEOUT_ENV: &str = "HABITCAL_TIMEOUT_SECS";
pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL every API path is appended to, without a trailing slash
    pub base_url: String,
    /// Total request timeout
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Reads `HABITCAL_API_URL` and `HABITCAL_TIMEOUT_SECS`.
    ///
    /// An unparsable timeout is ignored with a warning; an invalid base URL
    /// is an error.
    pub fn from_env() -> AppResult<Self> {
        let mut config = match env::var(API_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        };

        if let Ok(raw) = env::var(TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout = Duration::from_secs(secs),
                _ => warn!("Ignoring invalid {} value '{}'", TIMEOUT_ENV, raw),
            }
        }

        validate_config(&config)?;
        info!("Using API at {} (timeout {:?})", config.base_url, config.timeout);
        Ok(config)
    }

    /// Joins an API path such as `/api/habits` onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Checks that the base URL is an absolute http(s) URL with a host.
pub fn validate_config(config: &ClientConfig) -> AppResult<()> {
    if config.base_url.trim().is_empty() {
        return Err(AppError::config("API base URL cannot be empty"));
    }

    let parsed = Url::parse(&config.base_url)
        .map_err(|e| AppError::config(format!("Invalid API base URL '{}': {}", config.base_url, e)))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(AppError::config(format!(
            "API base URL must use http or https, got '{}://'",
            parsed.scheme()
        )));
    }

    if parsed.host_str().map_or(true, |h| h.is_empty()) {
        return Err(AppError::config(format!(
            "API base URL '{}' has no host",
            config.base_url
        )));
    }

    if config.timeout.is_zero() {
        return Err(AppError::config("Request timeout must be greater than zero"));
    }

    Ok(())
}
