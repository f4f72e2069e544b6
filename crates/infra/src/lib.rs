//! # Snowgate Infrastructure
//!
//! Impure adapters around the core ports and the ServiceNow client itself.
//!
//! This crate contains:
//! - The retrying HTTP client (reqwest)
//! - The ServiceNow request executor, domain operations and action dispatcher
//! - Secret stores (environment, files, keychain, in-memory)
//! - Configuration loading and tracing initialisation
//!
//! ## Architecture
//! - Implements traits defined in `snowgate-core`
//! - Depends on `snowgate-common`, `snowgate-domain` and `snowgate-core`
//! - Contains all "impure" code (network, filesystem, keychain)

pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod secrets;
pub mod servicenow;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use secrets::{EnvSecretStore, FileSecretStore, KeyringSecretStore, StaticSecretStore};
pub use servicenow::{
    handle, ActionResponse, AuthProvider, ServiceNowAction, ServiceNowClient, SharedClient,
};
