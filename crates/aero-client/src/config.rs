//! Client configuration
//!
//! Sources, later ones winning:
//! 1. built-in defaults
//! 2. optional TOML file
//! 3. environment (`OPENAIP_API_KEY`, `OPENAIP_BASE_URL`)

use crate::error::{ClientError, ConfigError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// OpenAIP core API
pub const DEFAULT_BASE_URL: &str = "https://api.core.openaip.net/api";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "OPENAIP_API_KEY";

/// Environment variable overriding the base URL
pub const BASE_URL_ENV: &str = "OPENAIP_BASE_URL";

/// Aviation client configuration
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL, without trailing slash
    pub base_url: String,
    /// Provider API key; required at first use, never serialized
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Freshness window of cached responses, in seconds
    pub freshness_secs: u64,
    /// Maximum number of cached responses
    pub cache_capacity: u64,
    /// Page size for searches
    pub search_limit: u32,
    /// HTTP request timeout, in seconds
    pub request_timeout_secs: u64,
    /// Searches shorter than this return nothing without a network call
    pub min_query_len: usize,
}

impl ClientConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Parse TOML configuration
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load TOML configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;
        Self::from_toml_str(&content)
    }

    /// Apply overrides from the process environment
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    ///
    /// Empty values are ignored.
    #[must_use]
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = lookup(API_KEY_ENV) {
            self.api_key = Some(key);
        }
        if let Some(url) = lookup(BASE_URL_ENV) {
            self.base_url = url;
        }
        self
    }

    /// With API key
    #[inline]
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// With base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// With freshness window
    #[inline]
    #[must_use]
    pub fn with_freshness(mut self, window: Duration) -> Self {
        self.freshness_secs = window.as_secs();
        self
    }

    /// With search page size
    #[inline]
    #[must_use]
    pub fn with_search_limit(mut self, limit: u32) -> Self {
        self.search_limit = limit;
        self
    }

    /// Freshness window as a duration
    #[inline]
    #[must_use]
    pub fn freshness(&self) -> Duration {
        Duration::from_secs(self.freshness_secs)
    }

    /// Request timeout as a duration
    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Resolved API key
    pub fn api_key(&self) -> Result<&str, ClientError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ClientError::MissingApiKey)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            freshness_secs: 30 * 60,
            cache_capacity: aero_cache::DEFAULT_CAPACITY,
            search_limit: 10,
            request_timeout_secs: 15,
            min_query_len: 2,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("freshness_secs", &self.freshness_secs)
            .field("cache_capacity", &self.cache_capacity)
            .field("search_limit", &self.search_limit)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("min_query_len", &self.min_query_len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.freshness(), Duration::from_secs(1800));
        assert_eq!(config.search_limit, 10);
        assert_eq!(config.min_query_len, 2);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn missing_key_is_error() {
        let config = ClientConfig::default();
        assert!(matches!(config.api_key(), Err(ClientError::MissingApiKey)));

        let blank = ClientConfig::default().with_api_key("   ");
        assert!(matches!(blank.api_key(), Err(ClientError::MissingApiKey)));
    }

    #[test]
    fn overrides_from_lookup() {
        let env: HashMap<&str, &str> = [
            (API_KEY_ENV, "env-key"),
            (BASE_URL_ENV, "http://localhost:9000"),
        ]
        .into_iter()
        .collect();

        let config = ClientConfig::default()
            .with_overrides_from(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(config.api_key().unwrap(), "env-key");
        assert_eq!(config.base_url, "http://localhost:9000");
    }

    #[test]
    fn empty_override_ignored() {
        let config = ClientConfig::default()
            .with_api_key("file-key")
            .with_overrides_from(|_| Some(String::new()));

        assert_eq!(config.api_key().unwrap(), "file-key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ClientConfig::from_toml_str(
            r#"
            freshness_secs = 60
            api_key = "toml-key"
            "#,
        )
        .unwrap();

        assert_eq!(config.freshness(), Duration::from_secs(60));
        assert_eq!(config.api_key().unwrap(), "toml-key");
        assert_eq!(config.search_limit, 10);
    }

    #[test]
    fn invalid_toml_rejected() {
        let result = ClientConfig::from_toml_str("freshness_secs = \"soon\"");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "search_limit = 25").unwrap();

        let config = ClientConfig::load(file.path()).unwrap();
        assert_eq!(config.search_limit, 25);
    }

    #[test]
    fn load_missing_file() {
        let result = ClientConfig::load("/definitely/not/here/aeronav.toml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn key_never_serialized_or_debugged() {
        let config = ClientConfig::default().with_api_key("super-secret");

        let toml = toml::to_string(&config).unwrap();
        assert!(!toml.contains("super-secret"));
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
