//! Runtime primitives shared across Snowgate crates.
//!
//! Nothing in this crate knows about ServiceNow. It provides the generic
//! building blocks the client is assembled from.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: backoff strategies, retry configuration, OAuth token types
//! - `runtime`: the fixed-window rate limiter and the async token manager
//! - `observability`: tracing (pulled in by `runtime`)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod auth;
#[cfg(feature = "foundation")]
pub mod resilience;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "foundation")]
pub use auth::{AuthError, TokenResponse, TokenSet};
#[cfg(feature = "runtime")]
pub use auth::{TokenGrantClient, TokenManager};
#[cfg(feature = "runtime")]
pub use resilience::{RateLimitSettings, RateLimiter};
#[cfg(feature = "foundation")]
pub use resilience::{BackoffStrategy, Jitter, RetryConfig, RetryConfigBuilder, RetryConfigError};
