//! ServiceNow Table API client
//!
//! - [`client`]: request executor (rate limit, auth, retry, error mapping)
//! - [`auth`]: basic and OAuth authorization headers
//! - incidents, changes, problems, knowledge, users, reporting: domain
//!   operations as inherent methods on [`ServiceNowClient`]
//! - [`actions`]: typed `{action, parameters}` dispatch
//! - [`shared`]: lazily built process-wide client

pub mod actions;
pub mod auth;
pub mod client;
pub mod shared;

mod changes;
mod incidents;
mod knowledge;
mod problems;
mod reporting;
mod users;

pub use actions::{handle, ActionResponse, ServiceNowAction};
pub use auth::{AuthProvider, ServiceNowGrantClient};
pub use client::ServiceNowClient;
pub use shared::SharedClient;
