//! Fixed-window token bucket for outbound request admission
//!
//! The bucket starts full. Once `window` has elapsed since the window opened,
//! the next caller resets it to `max_requests`. A caller that finds the bucket
//! empty is parked until the current window closes, then competes again.
//!
//! State lives behind a `parking_lot::Mutex` that is never held across an
//! await, so concurrent acquisitions from many tasks cannot overdraw the
//! bucket.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Configuration for the fixed-window rate limiter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitSettings {
    /// Requests admitted per window
    pub max_requests: u32,
    /// Window length
    pub window: Duration,
    /// When false, `acquire` returns immediately
    pub enabled: bool,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self { max_requests: 100, window: Duration::from_millis(60_000), enabled: true }
    }
}

impl RateLimitSettings {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.enabled {
            return Ok(());
        }
        if self.max_requests == 0 {
            return Err("max_requests must be greater than 0".to_string());
        }
        if self.window.is_zero() {
            return Err("window must be greater than zero".to_string());
        }
        Ok(())
    }
}

#[derive(Debug)]
struct WindowState {
    tokens: u32,
    window_started_at: Instant,
}

/// Fixed-window token bucket rate limiter
///
/// ```rust
/// use std::time::Duration;
///
/// use snowgate_common::resilience::{RateLimitSettings, RateLimiter};
///
/// # async fn example() -> Result<(), String> {
/// let limiter = RateLimiter::new(RateLimitSettings {
///     max_requests: 2,
///     window: Duration::from_secs(1),
///     enabled: true,
/// })?;
///
/// limiter.acquire().await;
/// limiter.acquire().await;
/// // A third call waits for the next window.
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RateLimiter {
    settings: RateLimitSettings,
    state: Mutex<WindowState>,
}

impl RateLimiter {
    /// Create a limiter whose bucket starts full
    pub fn new(settings: RateLimitSettings) -> Result<Self, String> {
        settings.validate()?;

        Ok(Self {
            state: Mutex::new(WindowState {
                tokens: settings.max_requests,
                window_started_at: Instant::now(),
            }),
            settings,
        })
    }

    /// Limiter that admits everything
    pub fn disabled() -> Self {
        Self {
            settings: RateLimitSettings { enabled: false, ..RateLimitSettings::default() },
            state: Mutex::new(WindowState { tokens: 0, window_started_at: Instant::now() }),
        }
    }

    /// Active settings
    pub fn settings(&self) -> &RateLimitSettings {
        &self.settings
    }

    /// Wait until a token is available, then consume it.
    pub async fn acquire(&self) {
        if !self.settings.enabled {
            return;
        }

        loop {
            let wait = {
                let mut state = self.state.lock();
                let now = Instant::now();
                self.refill(&mut state, now);

                if state.tokens > 0 {
                    state.tokens -= 1;
                    return;
                }

                self.settings.window.saturating_sub(now.duration_since(state.window_started_at))
            };

            debug!(wait_ms = wait.as_millis() as u64, "rate limit reached, waiting for next window");
            tokio::time::sleep(wait).await;
        }
    }

    /// Consume a token without waiting. Returns false when the bucket is empty.
    pub fn try_acquire(&self) -> bool {
        if !self.settings.enabled {
            return true;
        }

        let mut state = self.state.lock();
        self.refill(&mut state, Instant::now());
        if state.tokens > 0 {
            state.tokens -= 1;
            true
        } else {
            false
        }
    }

    /// Tokens left in the current window
    pub fn available_tokens(&self) -> u32 {
        if !self.settings.enabled {
            return self.settings.max_requests;
        }

        let mut state = self.state.lock();
        self.refill(&mut state, Instant::now());
        state.tokens
    }

    fn refill(&self, state: &mut WindowState, now: Instant) {
        if now.duration_since(state.window_started_at) >= self.settings.window {
            state.tokens = self.settings.max_requests;
            state.window_started_at = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn limiter(max_requests: u32, window_ms: u64) -> RateLimiter {
        RateLimiter::new(RateLimitSettings {
            max_requests,
            window: Duration::from_millis(window_ms),
            enabled: true,
        })
        .unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn request_beyond_budget_waits_for_next_window() {
        let limiter = limiter(3, 1000);
        let start = Instant::now();

        for _ in 0..3 {
            limiter.acquire().await;
        }
        assert_eq!(start.elapsed(), Duration::ZERO);

        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(1000));
        assert_eq!(limiter.available_tokens(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_beyond_budget_are_parked() {
        let limiter = Arc::new(limiter(2, 1000));
        let start = Instant::now();

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move {
                    limiter.acquire().await;
                    start.elapsed()
                })
            })
            .collect();

        let mut elapsed = Vec::new();
        for result in futures::future::join_all(handles).await {
            elapsed.push(result.unwrap());
        }
        elapsed.sort();

        assert_eq!(elapsed[0], Duration::ZERO);
        assert_eq!(elapsed[1], Duration::ZERO);
        assert!(elapsed[2] >= Duration::from_millis(1000), "third caller ran at {:?}", elapsed[2]);
    }

    #[tokio::test(start_paused = true)]
    async fn never_admits_more_than_budget_per_window() {
        let limiter = Arc::new(limiter(5, 500));
        let start = Instant::now();

        let handles: Vec<_> = (0..17)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move {
                    limiter.acquire().await;
                    start.elapsed().as_millis() / 500
                })
            })
            .collect();

        let mut per_window = std::collections::BTreeMap::new();
        for result in futures::future::join_all(handles).await {
            *per_window.entry(result.unwrap()).or_insert(0u32) += 1;
        }

        assert!(per_window.values().all(|count| *count <= 5), "{per_window:?}");
        assert_eq!(per_window.values().sum::<u32>(), 17);
    }

    #[tokio::test(start_paused = true)]
    async fn try_acquire_reports_exhaustion_and_recovers_after_window() {
        let limiter = limiter(2, 1000);

        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
        assert_eq!(limiter.available_tokens(), 0);

        tokio::time::advance(Duration::from_millis(999)).await;
        assert!(!limiter.try_acquire());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(limiter.available_tokens(), 2);
        assert!(limiter.try_acquire());
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_limiter_never_waits() {
        let limiter = RateLimiter::new(RateLimitSettings {
            max_requests: 1,
            window: Duration::from_secs(60),
            enabled: false,
        })
        .unwrap();
        let start = Instant::now();

        for _ in 0..50 {
            limiter.acquire().await;
        }
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert!(RateLimiter::disabled().try_acquire());
    }

    #[test]
    fn settings_validation() {
        let zero_budget =
            RateLimitSettings { max_requests: 0, window: Duration::from_secs(1), enabled: true };
        assert!(zero_budget.validate().is_err());

        let zero_window = RateLimitSettings { max_requests: 1, window: Duration::ZERO, enabled: true };
        assert!(zero_window.validate().is_err());

        let disabled = RateLimitSettings { enabled: false, ..zero_window };
        assert!(disabled.validate().is_ok());
        assert!(RateLimitSettings::default().validate().is_ok());
    }
}
