//! HTTP client configuration module
//!
//! Centralized construction of the `reqwest` client used by the API client:
//! timeouts, default headers and connection pool settings.

use crate::config::ClientConfig;
use crate::error::ApiError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Connection timeout
    pub connect_timeout: Duration,
    /// Total request timeout
    pub timeout: Duration,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(10),
            user_agent: format!("HabitCal/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive HTTP settings from the client configuration
    pub fn from_client_config(config: &ClientConfig) -> Self {
        Self {
            // Never let the connect phase outlive the request itself
            connect_timeout: std::cmp::min(Duration::from_secs(5), config.timeout),
            timeout: config.timeout,
            ..Self::default()
        }
    }

    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// Build a reqwest client with this configuration
    pub fn build_client(&self) -> Result<Client, ApiError> {
        ClientBuilder::new()
            .user_agent(self.user_agent.clone())
            .default_headers(Self::default_headers())
            .connect_timeout(self.connect_timeout)
            .timeout(self.timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(2)
            .build()
            .map_err(|e| ApiError::RequestSetup(format!("Failed to build HTTP client: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout_is_ten_seconds() {
        assert_eq!(HttpConfig::default().timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_connect_timeout_capped_by_request_timeout() {
        let mut config = ClientConfig::default();
        config.timeout = Duration::from_secs(2);
        let http = HttpConfig::from_client_config(&config);
        assert_eq!(http.connect_timeout, Duration::from_secs(2));
        assert_eq!(http.timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_build_client() {
        assert!(HttpConfig::new().build_client().is_ok());
    }
}
