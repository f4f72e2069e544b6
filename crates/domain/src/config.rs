//! Client and host configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MAX_REQUESTS, DEFAULT_MAX_RETRIES, DEFAULT_MAX_RETRY_DELAY_MS,
    DEFAULT_RETRY_DELAY_MS, DEFAULT_SECRET_NAME, DEFAULT_TIMEOUT_MS,
    DEFAULT_TOKEN_EXPIRY_BUFFER_SECS, DEFAULT_WINDOW_MS,
};
use crate::impl_choice_conversions;
use crate::types::Credentials;

/// Fixed-window rate limit settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_ms: u64,
    pub enabled: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self { max_requests: DEFAULT_MAX_REQUESTS, window_ms: DEFAULT_WINDOW_MS, enabled: true }
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

/// Everything a `ServiceNowClient` needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub credentials: Credentials,
    pub rate_limit: RateLimitConfig,
    pub timeout_ms: u64,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Backoff before the first retry
    pub retry_delay_ms: u64,
    /// Backoff cap
    pub max_retry_delay_ms: u64,
    pub token_expiry_buffer_secs: i64,
}

impl ClientConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            rate_limit: RateLimitConfig::default(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            max_retry_delay_ms: DEFAULT_MAX_RETRY_DELAY_MS,
            token_expiry_buffer_secs: DEFAULT_TOKEN_EXPIRY_BUFFER_SECS,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn max_retry_delay(&self) -> Duration {
        Duration::from_millis(self.max_retry_delay_ms)
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl_choice_conversions!(LogFormat {
    Pretty => "pretty",
    Json => "json",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Pretty }
    }
}

/// Host-level configuration loaded from the environment or a file
///
/// Credentials are not part of it; they are read from a secret store under
/// `secret_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowgateConfig {
    pub secret_name: String,
    pub rate_limit: RateLimitConfig,
    pub timeout_ms: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub max_retry_delay_ms: u64,
    pub logging: LogSettings,
}

impl Default for SnowgateConfig {
    fn default() -> Self {
        Self {
            secret_name: DEFAULT_SECRET_NAME.to_string(),
            rate_limit: RateLimitConfig::default(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            max_retry_delay_ms: DEFAULT_MAX_RETRY_DELAY_MS,
            logging: LogSettings::default(),
        }
    }
}

impl SnowgateConfig {
    /// Combine with resolved credentials into a client configuration
    pub fn client_config(&self, credentials: Credentials) -> ClientConfig {
        ClientConfig {
            rate_limit: self.rate_limit,
            timeout_ms: self.timeout_ms,
            max_retries: self.max_retries,
            retry_delay_ms: self.retry_delay_ms,
            max_retry_delay_ms: self.max_retry_delay_ms,
            ..ClientConfig::new(credentials)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ClientConfig::new(Credentials::basic("https://x", "u", "p"));

        assert_eq!(config.rate_limit, RateLimitConfig { max_requests: 100, window_ms: 60_000, enabled: true });
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.retry_delay(), Duration::from_secs(1));
        assert_eq!(config.max_retry_delay(), Duration::from_secs(10));
        assert_eq!(config.token_expiry_buffer_secs, 60);
    }

    #[test]
    fn partial_host_config_fills_defaults() {
        let config: SnowgateConfig = serde_json::from_str(
            r#"{"secret_name":"prod/snow","rate_limit":{"max_requests":5},"logging":{"format":"json"}}"#,
        )
        .unwrap();

        assert_eq!(config.secret_name, "prod/snow");
        assert_eq!(config.rate_limit.max_requests, 5);
        assert_eq!(config.rate_limit.window_ms, 60_000);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.max_retries, 3);
    }

    #[test]
    fn client_config_carries_host_settings() {
        let host = SnowgateConfig { max_retries: 0, timeout_ms: 500, ..SnowgateConfig::default() };
        let client = host.client_config(Credentials::basic("https://x", "u", "p"));

        assert_eq!(client.max_retries, 0);
        assert_eq!(client.timeout_ms, 500);
        assert_eq!(client.credentials.username.as_deref(), Some("u"));
    }
}
