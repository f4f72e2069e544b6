//! Resilience patterns for outbound calls
//!
//! This module provides the two pieces every outbound request passes through:
//! - **Rate Limiter**: a fixed-window token bucket that admits at most
//!   `max_requests` calls per window and parks callers until the next window
//! - **Retry Logic**: exponential backoff with proportional jitter, expressed
//!   as a pure delay calculation so the caller owns the retry loop
//!
//! Bursts of `max_requests` at each window boundary are allowed. This is the
//! accepted tradeoff of a fixed window over a sliding one.

#[cfg(feature = "runtime")]
pub mod rate_limiter;
pub mod retry;

#[cfg(feature = "runtime")]
pub use rate_limiter::{RateLimitSettings, RateLimiter};
pub use retry::{BackoffStrategy, Jitter, RetryConfig, RetryConfigBuilder, RetryConfigError};
