//! Client configuration

use std::time::Duration;

/// Default quiet period before buffered field edits are written
pub const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 500;

/// Default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration for connecting to the quote API
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | QUOTE_API_URL | http://localhost:8080 | API base URL |
/// | QUOTE_API_TOKEN | (none) | Bearer token |
/// | REQUEST_TIMEOUT_SECS | 30 | Request timeout |
/// | AUTOSAVE_DEBOUNCE_MS | 500 | Autosave quiet period |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:8080")
    pub base_url: String,

    /// Bearer token for authentication
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Autosave debounce window in milliseconds
    pub autosave_delay_ms: u64,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: DEFAULT_TIMEOUT_SECS,
            autosave_delay_ms: DEFAULT_AUTOSAVE_DELAY_MS,
        }
    }

    /// Load configuration from environment variables
    ///
    /// Unset or unparsable variables fall back to defaults
    pub fn from_env() -> Self {
        let mut config = Self::new(
            std::env::var("QUOTE_API_URL").unwrap_or_else(|_| "http://localhost:8080".into()),
        );
        config.token = std::env::var("QUOTE_API_TOKEN")
            .ok()
            .filter(|t| !t.is_empty());
        config.timeout = std::env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        config.autosave_delay_ms = std::env::var("AUTOSAVE_DEBOUNCE_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_AUTOSAVE_DELAY_MS);
        config
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the autosave debounce window
    pub fn with_autosave_delay(mut self, millis: u64) -> Self {
        self.autosave_delay_ms = millis;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides() {
        let config = ClientConfig::new("https://api.example.com")
            .with_token("secret")
            .with_timeout(5)
            .with_autosave_delay(250);

        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.token.as_deref(), Some("secret"));
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.autosave_delay(), Duration::from_millis(250));
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert!(config.token.is_none());
        assert_eq!(config.timeout, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.autosave_delay_ms, DEFAULT_AUTOSAVE_DELAY_MS);
    }
}
