//! # Snowgate Core
//!
//! Pure logic layer - no network or platform code.
//!
//! This crate contains:
//! - The [`SecretStore`] port
//! - Credential parsing, validation and resolution
//! - Encoded query construction
//! - Required-parameter validation
//! - Incident metrics aggregation
//! - Date, duration and SLA helpers
//!
//! ## Architecture Principles
//! - Only depends on `snowgate-domain`
//! - All external access goes through traits
//! - Every function is testable without a server

pub mod credentials;
pub mod metrics;
pub mod ports;
pub mod query;
pub mod time;
pub mod validation;

pub use credentials::{parse_credentials, resolve_credentials, validate_credentials};
pub use metrics::{classify_state, compute_incident_metrics, StateBucket};
pub use ports::SecretStore;
pub use query::{build_query, sanitize_input, EncodedQuery, QueryValue};
pub use time::{format_duration, format_servicenow_date, is_sla_breached, parse_servicenow_date};
pub use validation::{non_blank, require_any, require_fields, require_present};
