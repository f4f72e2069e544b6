//! Secret store port.
//!
//! Credentials never live in configuration; they are fetched by name from a
//! [`SecretStore`]. Adapters in `snowgate-infra` read from the environment,
//! a directory of JSON files, the OS keychain, or memory.
//!
//! # Example
//!
//! ```no_run
//! use snowgate_core::SecretStore;
//!
//! async fn has_credentials(store: &dyn SecretStore) -> bool {
//!     matches!(store.get_secret("servicenow/credentials").await, Ok(Some(_)))
//! }
//! ```

use async_trait::async_trait;
use snowgate_domain::Result;

/// Port for reading named secrets.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch the secret string stored under `name`.
    ///
    /// Returns `Ok(None)` when no secret exists under that name. Backend
    /// failures are returned as `CREDENTIALS_ERROR`.
    async fn get_secret(&self, name: &str) -> Result<Option<String>>;
}
