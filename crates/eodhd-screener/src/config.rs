//! Configuration for screening operations

use crate::error::{Result, ScreenerError};
use eodhd_utils::{env_parse, env_string};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default EODHD REST endpoint
pub const DEFAULT_BASE_URL: &str = "https://eodhd.com/api";

/// Screener limit used when the caller does not supply one
pub const DEFAULT_SCREENER_LIMIT: u32 = 100;

/// Configuration for screening operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenerConfig {
    /// Fallback API key, used when a call does not carry its own
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Base URL of the EODHD REST API
    pub base_url: String,

    /// Per-request timeout
    pub request_timeout: Duration,

    /// Screener limit applied when the caller gives none
    pub default_screener_limit: u32,

    /// Maximum in-flight requests per fan-out round (`None` = the whole round)
    pub max_concurrency: Option<usize>,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            default_screener_limit: DEFAULT_SCREENER_LIMIT,
            max_concurrency: None,
        }
    }
}

impl ScreenerConfig {
    /// Create a new configuration builder
    pub fn builder() -> ScreenerConfigBuilder {
        ScreenerConfigBuilder::default()
    }

    /// Load configuration from `EODHD_*` environment variables
    ///
    /// Reads `EODHD_API_KEY`, `EODHD_BASE_URL`, `EODHD_TIMEOUT_SECS` and
    /// `EODHD_MAX_CONCURRENCY`. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env()?.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(ScreenerError::ConfigError(
                "base_url must not be empty".to_string(),
            ));
        }

        if self.request_timeout.is_zero() {
            return Err(ScreenerError::ConfigError(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        if self.default_screener_limit == 0 {
            return Err(ScreenerError::ConfigError(
                "default_screener_limit must be greater than 0".to_string(),
            ));
        }

        if self.max_concurrency == Some(0) {
            return Err(ScreenerError::ConfigError(
                "max_concurrency must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Resolve the credential for one call
    ///
    /// A non-blank per-call key wins over the configured key.
    pub fn resolve_api_key(&self, call_override: Option<&str>) -> Result<String> {
        call_override
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .or_else(|| {
                self.api_key
                    .as_deref()
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
            })
            .map(ToString::to_string)
            .ok_or(ScreenerError::MissingApiKey)
    }

    /// Concurrency for a round of `round_size` requests
    pub fn concurrency_for(&self, round_size: usize) -> usize {
        match self.max_concurrency {
            Some(cap) => cap.min(round_size).max(1),
            None => round_size.max(1),
        }
    }
}

/// Builder for ScreenerConfig
#[derive(Debug, Default)]
pub struct ScreenerConfigBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    request_timeout: Option<Duration>,
    default_screener_limit: Option<u32>,
    max_concurrency: Option<usize>,
}

impl ScreenerConfigBuilder {
    /// Set the fallback API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the API base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the default screener limit
    pub fn default_screener_limit(mut self, limit: u32) -> Self {
        self.default_screener_limit = Some(limit);
        self
    }

    /// Cap in-flight requests per fan-out round
    pub fn max_concurrency(mut self, cap: usize) -> Self {
        self.max_concurrency = Some(cap);
        self
    }

    /// Fill unset fields from `EODHD_*` environment variables
    ///
    /// Values already set on the builder take precedence.
    pub fn with_env(mut self) -> Result<Self> {
        if self.api_key.is_none() {
            self.api_key = env_string("EODHD_API_KEY");
        }
        if self.base_url.is_none() {
            self.base_url = env_string("EODHD_BASE_URL");
        }
        if self.request_timeout.is_none() {
            self.request_timeout = env_parse::<u64>("EODHD_TIMEOUT_SECS")?.map(Duration::from_secs);
        }
        if self.max_concurrency.is_none() {
            self.max_concurrency = env_parse::<usize>("EODHD_MAX_CONCURRENCY")?;
        }
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<ScreenerConfig> {
        let defaults = ScreenerConfig::default();

        let config = ScreenerConfig {
            api_key: self.api_key,
            base_url: self
                .base_url
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            default_screener_limit: self
                .default_screener_limit
                .unwrap_or(defaults.default_screener_limit),
            max_concurrency: self.max_concurrency.or(defaults.max_concurrency),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScreenerConfig::default();
        assert_eq!(config.base_url, "https://eodhd.com/api");
        assert_eq!(config.default_screener_limit, 100);
        assert_eq!(config.max_concurrency, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ScreenerConfig::builder()
            .api_key("demo")
            .base_url("http://localhost:8080/api/")
            .max_concurrency(8)
            .request_timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("demo"));
        assert_eq!(config.base_url, "http://localhost:8080/api");
        assert_eq!(config.max_concurrency, Some(8));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_validation_rejects_zero_concurrency() {
        let result = ScreenerConfig::builder().max_concurrency(0).build();
        assert!(matches!(result, Err(ScreenerError::ConfigError(_))));
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let config = ScreenerConfig {
            request_timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolve_api_key_prefers_override() {
        let config = ScreenerConfig::builder().api_key("from-env").build().unwrap();

        assert_eq!(config.resolve_api_key(Some("per-call")).unwrap(), "per-call");
        assert_eq!(config.resolve_api_key(None).unwrap(), "from-env");
        assert_eq!(config.resolve_api_key(Some("  ")).unwrap(), "from-env");
    }

    #[test]
    fn test_resolve_api_key_missing() {
        let config = ScreenerConfig::default();
        assert!(matches!(
            config.resolve_api_key(None),
            Err(ScreenerError::MissingApiKey)
        ));
        assert!(matches!(
            config.resolve_api_key(Some("")),
            Err(ScreenerError::MissingApiKey)
        ));
    }

    #[test]
    fn test_concurrency_for() {
        let unbounded = ScreenerConfig::default();
        assert_eq!(unbounded.concurrency_for(250), 250);
        assert_eq!(unbounded.concurrency_for(0), 1);

        let capped = ScreenerConfig::builder().max_concurrency(10).build().unwrap();
        assert_eq!(capped.concurrency_for(250), 10);
        assert_eq!(capped.concurrency_for(3), 3);
    }
}
