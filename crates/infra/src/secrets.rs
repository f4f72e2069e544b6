//! [`SecretStore`] adapters
//!
//! - [`EnvSecretStore`]: one environment variable per secret
//! - [`FileSecretStore`]: one file per secret in a directory
//! - [`KeyringSecretStore`]: the platform keychain
//! - [`StaticSecretStore`]: in-memory, for tests and embedding

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use keyring::Entry;
use snowgate_core::SecretStore;
use snowgate_domain::{Result, ServiceNowError};
use tracing::debug;

use crate::errors::InfraError;

/// Environment variable name for a secret name
///
/// Uppercases ASCII alphanumerics and maps everything else to `_`, so
/// `servicenow/credentials` becomes `SERVICENOW_CREDENTIALS`.
pub fn secret_env_var(name: &str) -> String {
    let mapped: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect();
    if mapped.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{mapped}")
    } else {
        mapped
    }
}

/// Reads secrets from environment variables
#[derive(Debug, Clone, Default)]
pub struct EnvSecretStore {
    prefix: Option<String>,
}

impl EnvSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend `prefix` to every derived variable name
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: Some(prefix.into()) }
    }

    pub fn var_name(&self, name: &str) -> String {
        let var = secret_env_var(name);
        match &self.prefix {
            Some(prefix) => format!("{prefix}{var}"),
            None => var,
        }
    }
}

#[async_trait]
impl SecretStore for EnvSecretStore {
    async fn get_secret(&self, name: &str) -> Result<Option<String>> {
        let var = self.var_name(name);
        debug!(secret_name = name, env_var = %var, "reading secret from environment");
        Ok(std::env::var(&var).ok())
    }
}

/// Reads `<dir>/<name>.json`, with `/` in the name mapping to subdirectories
#[derive(Debug, Clone)]
pub struct FileSecretStore {
    root: PathBuf,
}

impl FileSecretStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path the secret `name` is read from
    ///
    /// # Errors
    /// `CREDENTIALS_ERROR` for empty names and names with `..` or absolute
    /// components.
    pub fn path_for(&self, name: &str) -> Result<PathBuf> {
        let segments: Vec<&str> = name.split('/').collect();
        let invalid = name.is_empty()
            || segments.iter().any(|s| s.is_empty() || *s == "." || *s == ".." || s.contains('\\'));
        if invalid {
            return Err(ServiceNowError::credentials(format!("Invalid secret name: {name}")));
        }

        let mut path = self.root.clone();
        if let Some((file, dirs)) = segments.split_last() {
            path.extend(dirs);
            path.push(format!("{file}.json"));
        }
        Ok(path)
    }
}

#[async_trait]
impl SecretStore for FileSecretStore {
    async fn get_secret(&self, name: &str) -> Result<Option<String>> {
        let path = self.path_for(name)?;
        debug!(secret_name = name, path = %path.display(), "reading secret from file");

        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(ServiceNowError::credentials(format!(
                "Failed to read secret file {}: {err}",
                path.display()
            ))),
        }
    }
}

/// Reads secrets from the platform keychain
///
/// Secrets are stored as the password of an entry whose service is
/// `service` and whose user is the secret name.
#[derive(Debug, Clone)]
pub struct KeyringSecretStore {
    service: String,
}

impl KeyringSecretStore {
    pub const DEFAULT_SERVICE: &'static str = "snowgate";

    pub fn new(service: impl Into<String>) -> Self {
        Self { service: service.into() }
    }

    /// Store `value` under `name`
    ///
    /// # Errors
    /// `CREDENTIALS_ERROR` when the keychain rejects the write.
    pub fn set_secret(&self, name: &str, value: &str) -> Result<()> {
        let entry = Entry::new(&self.service, name).map_err(InfraError::from)?;
        entry.set_password(value).map_err(InfraError::from)?;
        Ok(())
    }
}

impl Default for KeyringSecretStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SERVICE)
    }
}

#[async_trait]
impl SecretStore for KeyringSecretStore {
    async fn get_secret(&self, name: &str) -> Result<Option<String>> {
        debug!(service = %self.service, secret_name = name, "reading secret from keychain");

        let service = self.service.clone();
        let account = name.to_string();
        let lookup = tokio::task::spawn_blocking(move || {
            Entry::new(&service, &account).and_then(|entry| entry.get_password())
        })
        .await
        .map_err(|e| ServiceNowError::credentials(format!("keychain lookup aborted: {e}")))?;

        match lookup {
            Ok(secret) => Ok(Some(secret)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(InfraError::from(err).into()),
        }
    }
}

/// In-memory secrets
#[derive(Debug, Clone, Default)]
pub struct StaticSecretStore {
    secrets: HashMap<String, String>,
}

impl StaticSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_secret(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(name.into(), value.into());
        self
    }
}

#[async_trait]
impl SecretStore for StaticSecretStore {
    async fn get_secret(&self, name: &str) -> Result<Option<String>> {
        Ok(self.secrets.get(name).cloned())
    }
}
