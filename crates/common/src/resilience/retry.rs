//! Retry configuration and backoff delay calculation
//!
//! The retry loop itself lives with the transport that knows which failures
//! are transient. This module only answers "how many attempts" and "how long
//! to wait before the next one".

use std::time::Duration;

use rand::Rng;
use thiserror::Error;

/// Errors raised when a retry configuration is rejected.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RetryConfigError {
    /// The exponential base must be positive
    #[error("exponential base must be greater than 0, got {0}")]
    InvalidBase(f64),

    /// The jitter ratio must be within `0.0..=1.0`
    #[error("jitter ratio must be between 0 and 1, got {0}")]
    InvalidJitterRatio(f64),

    /// The initial delay exceeds the cap
    #[error("initial delay {initial:?} exceeds max delay {max:?}")]
    InitialExceedsMax { initial: Duration, max: Duration },
}

/// Backoff strategy for calculating retry delays
#[derive(Debug, Clone, PartialEq)]
pub enum BackoffStrategy {
    /// Fixed delay between retries
    Fixed(Duration),
    /// Exponential backoff: `min(initial_delay * base^attempt, max_delay)`
    Exponential { initial_delay: Duration, base: f64, max_delay: Duration },
}

impl BackoffStrategy {
    /// Calculate the delay that follows the given 0-based failed attempt
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        match self {
            BackoffStrategy::Fixed(delay) => *delay,
            BackoffStrategy::Exponential { initial_delay, base, max_delay } => {
                let exponent = attempt.min(63) as i32;
                let delay = initial_delay.as_millis() as f64 * base.powi(exponent);
                let delay_ms = delay.min(max_delay.as_millis() as f64) as u64;
                Duration::from_millis(delay_ms)
            }
        }
    }
}

/// Jitter type for adding randomness to retry delays
#[derive(Debug, Clone, PartialEq)]
pub enum Jitter {
    /// No jitter
    None,
    /// Full jitter: 0 to calculated_delay
    Full,
    /// Additive jitter: calculated_delay plus up to `ratio * calculated_delay`
    Proportional { ratio: f64 },
}

impl Jitter {
    /// Apply jitter to the calculated delay
    pub fn apply(&self, delay: Duration) -> Duration {
        match self {
            Jitter::None => delay,
            Jitter::Full => Duration::from_millis(random_up_to(delay.as_millis() as u64)),
            Jitter::Proportional { ratio } => {
                let spread = (delay.as_millis() as f64 * ratio) as u64;
                delay + Duration::from_millis(random_up_to(spread))
            }
        }
    }

    /// Largest delay this jitter can produce for `delay`
    pub fn upper_bound(&self, delay: Duration) -> Duration {
        match self {
            Jitter::None | Jitter::Full => delay,
            Jitter::Proportional { ratio } => {
                delay + Duration::from_millis((delay.as_millis() as f64 * ratio) as u64)
            }
        }
    }
}

fn random_up_to(max: u64) -> u64 {
    if max == 0 {
        return 0;
    }
    rand::thread_rng().gen_range(0..=max)
}

/// Configuration for retry behavior
///
/// `max_retries` counts retries, not attempts: a request is sent at most
/// `max_retries + 1` times.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt
    pub max_retries: u32,
    /// Backoff strategy for calculating delays
    pub backoff: BackoffStrategy,
    /// Jitter type for randomizing delays
    pub jitter: Jitter,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff: BackoffStrategy::Exponential {
                initial_delay: Duration::from_millis(1000),
                base: 2.0,
                max_delay: Duration::from_secs(10),
            },
            jitter: Jitter::Proportional { ratio: 0.1 },
        }
    }
}

impl RetryConfig {
    /// Create a configuration builder
    pub fn builder() -> RetryConfigBuilder {
        RetryConfigBuilder::default()
    }

    /// Configuration that never retries
    pub fn no_retry() -> Self {
        Self { max_retries: 0, backoff: BackoffStrategy::Fixed(Duration::ZERO), jitter: Jitter::None }
    }

    /// Total number of sends allowed, including the first one
    pub fn total_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Jittered delay to wait after the given 0-based failed attempt
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.jitter.apply(self.backoff.calculate_delay(attempt))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), RetryConfigError> {
        if let BackoffStrategy::Exponential { initial_delay, base, max_delay } = &self.backoff {
            if *base <= 0.0 {
                return Err(RetryConfigError::InvalidBase(*base));
            }
            if initial_delay > max_delay {
                return Err(RetryConfigError::InitialExceedsMax {
                    initial: *initial_delay,
                    max: *max_delay,
                });
            }
        }

        if let Jitter::Proportional { ratio } = self.jitter {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(RetryConfigError::InvalidJitterRatio(ratio));
            }
        }

        Ok(())
    }
}

/// Builder for RetryConfig with fluent API
#[derive(Debug, Default)]
pub struct RetryConfigBuilder {
    config: RetryConfig,
}

impl RetryConfigBuilder {
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    pub fn fixed_backoff(mut self, delay: Duration) -> Self {
        self.config.backoff = BackoffStrategy::Fixed(delay);
        self
    }

    pub fn exponential_backoff(
        mut self,
        initial_delay: Duration,
        base: f64,
        max_delay: Duration,
    ) -> Self {
        self.config.backoff = BackoffStrategy::Exponential { initial_delay, base, max_delay };
        self
    }

    pub fn no_jitter(mut self) -> Self {
        self.config.jitter = Jitter::None;
        self
    }

    pub fn full_jitter(mut self) -> Self {
        self.config.jitter = Jitter::Full;
        self
    }

    pub fn proportional_jitter(mut self, ratio: f64) -> Self {
        self.config.jitter = Jitter::Proportional { ratio };
        self
    }

    pub fn build(self) -> Result<RetryConfig, RetryConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
