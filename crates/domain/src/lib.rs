//! # Snowgate Domain
//!
//! ServiceNow domain types for Snowgate.
//!
//! This crate contains:
//! - The uniform [`ServiceNowError`] and its [`ErrorCode`] taxonomy
//! - Credentials and client configuration
//! - Table record DTOs (incidents, changes, problems, knowledge, users, SLA)
//! - Typed request payloads for create and update operations
//! - Table names, state codes and defaults
//!
//! ## Architecture
//! - No dependencies on other Snowgate crates
//! - No I/O
//! - Records are plain serde types round-tripped through the Table API

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
