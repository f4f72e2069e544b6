//! Host configuration for the ServiceNow client.
//!
//! A `.env` file is merged into the process environment first. The
//! environment wins when `SERVICENOW_SECRET_NAME` is set; otherwise a
//! `snowgate.{json,toml}` or `config.{json,toml}` file is looked up.
//!
//! ## Variables
//! - `SERVICENOW_SECRET_NAME`: Secret holding the credentials (required)
//! - `SERVICENOW_RATE_LIMIT_ENABLED`: Whether rate limiting is on (true/false)
//! - `SERVICENOW_MAX_REQUESTS`: Requests admitted per window
//! - `SERVICENOW_WINDOW_MS`: Rate limit window in milliseconds
//! - `SERVICENOW_TIMEOUT_MS`: Per-request timeout in milliseconds
//! - `SERVICENOW_MAX_RETRIES`: Retries after the first attempt
//! - `SERVICENOW_RETRY_DELAY_MS`: Backoff before the first retry
//! - `SERVICENOW_MAX_RETRY_DELAY_MS`: Backoff cap
//! - `SNOWGATE_LOG_LEVEL`: Default log filter directive
//! - `SNOWGATE_LOG_FORMAT`: `pretty` or `json`
//!
//! Files are searched in the working directory, its parent and grandparent,
//! then next to the executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use snowgate_domain::{LogFormat, LogSettings, RateLimitConfig, Result, ServiceNowError, SnowgateConfig};

const CONFIG_FILE_NAMES: [&str; 4] = ["snowgate.json", "snowgate.toml", "config.json", "config.toml"];

/// Resolve configuration from the environment, falling back to a file.
///
/// Any environment failure (missing secret name, unparsable number) routes
/// to [`load_from_file`]; the file error is the one reported.
pub fn load() -> Result<SnowgateConfig> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    match load_from_env() {
        Ok(config) => {
            tracing::info!(secret = %config.secret_name, "using environment configuration");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "environment configuration unusable, searching for a file");
            load_from_file(None)
        }
    }
}

/// Build a [`SnowgateConfig`] from `SERVICENOW_*` and `SNOWGATE_*` variables.
///
/// Only `SERVICENOW_SECRET_NAME` is mandatory. A missing name or a value
/// that fails to parse yields `CONFIG_ERROR`.
pub fn load_from_env() -> Result<SnowgateConfig> {
    let defaults = SnowgateConfig::default();

    let secret_name = required_var("SERVICENOW_SECRET_NAME")?;

    let rate_limit = RateLimitConfig {
        max_requests: env_parse("SERVICENOW_MAX_REQUESTS", defaults.rate_limit.max_requests)?,
        window_ms: env_parse("SERVICENOW_WINDOW_MS", defaults.rate_limit.window_ms)?,
        enabled: env_bool("SERVICENOW_RATE_LIMIT_ENABLED", defaults.rate_limit.enabled),
    };

    let log_format = match std::env::var("SNOWGATE_LOG_FORMAT") {
        Ok(value) => LogFormat::from_str(&value).map_err(ServiceNowError::config)?,
        Err(_) => defaults.logging.format,
    };

    Ok(SnowgateConfig {
        secret_name,
        rate_limit,
        timeout_ms: env_parse("SERVICENOW_TIMEOUT_MS", defaults.timeout_ms)?,
        max_retries: env_parse("SERVICENOW_MAX_RETRIES", defaults.max_retries)?,
        retry_delay_ms: env_parse("SERVICENOW_RETRY_DELAY_MS", defaults.retry_delay_ms)?,
        max_retry_delay_ms: env_parse("SERVICENOW_MAX_RETRY_DELAY_MS", defaults.max_retry_delay_ms)?,
        logging: LogSettings {
            level: std::env::var("SNOWGATE_LOG_LEVEL").unwrap_or(defaults.logging.level),
            format: log_format,
        },
    })
}

/// Read a JSON or TOML config file, chosen by extension.
///
/// With `None` the standard locations are searched and the first hit wins.
/// Missing files, unreadable files and malformed contents are all
/// `CONFIG_ERROR`.
pub fn load_from_file(path: Option<PathBuf>) -> Result<SnowgateConfig> {
    let source = match path {
        Some(explicit) if explicit.exists() => explicit,
        Some(explicit) => {
            return Err(ServiceNowError::config(format!(
                "Config file not found: {}",
                explicit.display()
            )));
        }
        None => probe_config_paths().ok_or_else(|| {
            ServiceNowError::config("No snowgate config file found near the working directory or executable")
        })?,
    };

    tracing::info!(path = %source.display(), "reading snowgate configuration");

    let text = std::fs::read_to_string(&source).map_err(|e| {
        ServiceNowError::config(format!("Failed to read config file {}: {e}", source.display()))
    })?;

    parse_config(&text, &source)
}

fn parse_config(text: &str, source: &Path) -> Result<SnowgateConfig> {
    let extension = source.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(text)
            .map_err(|e| ServiceNowError::config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(text)
            .map_err(|e| ServiceNowError::config(format!("Invalid JSON format: {e}"))),
        _ => Err(ServiceNowError::config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing config file among the standard locations.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots: Vec<PathBuf> = std::env::current_dir()
        .map(|cwd| cwd.ancestors().take(3).map(Path::to_path_buf).collect())
        .unwrap_or_default();

    if let Some(dir) = std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf)) {
        roots.push(dir);
    }

    roots
        .iter()
        .flat_map(|root| CONFIG_FILE_NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

fn required_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| ServiceNowError::config(format!("Missing required environment variable: {key}")))
}

fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ServiceNowError::config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(default),
    }
}

/// `1`, `true`, `yes` and `on` are truthy, any other set value is false.
fn env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(raw) => matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => default,
    }
}
