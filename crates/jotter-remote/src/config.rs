//! Remote backend configuration.
//!
//! Configuration comes from explicit construction or from `JOTTER_*`
//! environment variables:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `JOTTER_REMOTE_URL` | `http://127.0.0.1:8640` | Base URL of the remote service |
//! | `JOTTER_HTTP_TIMEOUT_SECS` | `30` | Per-request timeout in seconds |
//! | `JOTTER_POLL_INTERVAL_MS` | `2000` | Subscription poll interval in milliseconds |

use std::env;

use jotter_core::{defaults, Error, Result};

/// Connection settings shared by the remote document and blob stores.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Base URL of the remote service, without a trailing slash.
    pub base_url: String,
    /// Timeout applied to every HTTP request.
    pub timeout_secs: u64,
    /// How often open subscriptions poll the backend for changes.
    pub poll_interval_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::REMOTE_URL.to_string(),
            timeout_secs: defaults::HTTP_TIMEOUT_SECS,
            poll_interval_ms: defaults::POLL_INTERVAL_MS,
        }
    }
}

impl RemoteConfig {
    /// Build a config for the given base URL, defaults for everything else.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let base_url = env::var("JOTTER_REMOTE_URL")
            .map(normalize_base_url)
            .unwrap_or_else(|_| defaults::REMOTE_URL.to_string());
        let timeout_secs = env::var("JOTTER_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::HTTP_TIMEOUT_SECS);
        let poll_interval_ms = env::var("JOTTER_POLL_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults::POLL_INTERVAL_MS);

        Self {
            base_url,
            timeout_secs,
            poll_interval_ms,
        }
    }

    /// Override the poll interval.
    pub fn with_poll_interval_ms(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(Error::Config("base_url cannot be empty".to_string()));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                self.base_url
            )));
        }

        if self.timeout_secs == 0 {
            return Err(Error::Config("timeout_secs must be at least 1".to_string()));
        }

        Ok(())
    }
}

fn normalize_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(RemoteConfig::default().validate().is_ok());
    }

    #[test]
    fn test_new_strips_trailing_slash() {
        let config = RemoteConfig::new("http://localhost:9000/");
        assert_eq!(config.base_url, "http://localhost:9000");
    }

    #[test]
    fn test_validate_rejects_empty_base_url() {
        let config = RemoteConfig {
            base_url: String::new(),
            ..RemoteConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_non_http_scheme() {
        let config = RemoteConfig::new("ftp://example.com");
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = RemoteConfig {
            timeout_secs: 0,
            ..RemoteConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_with_poll_interval_overrides() {
        let config = RemoteConfig::default().with_poll_interval_ms(50);
        assert_eq!(config.poll_interval_ms, 50);
    }
}
