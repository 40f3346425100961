//! Retry policy with exponential backoff.
//!
//! Only operations that return an error are retried. An HTTP reply of any
//! status is a successful outcome as far as this policy is concerned, so a 500
//! is handed back to the caller rather than retried.
//!
//! Errors are not classified before retrying. A request that can never be
//! sent, such as one carrying an invalid header name, still consumes the full
//! retry budget and its backoff before the last error is reported.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Configuration for retry behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Additional attempts after the first. 0 disables retry.
    pub max_retries: u32,
    /// Delay unit; retry `n` waits `base_delay * factor^n`.
    pub base_delay: Duration,
    /// Growth factor between consecutive delays.
    pub factor: f64,
    /// Optional ceiling on a single delay. `None` leaves backoff uncapped.
    pub max_delay: Option<Duration>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            factor: 2.0,
            max_delay: None,
        }
    }
}

impl RetryConfig {
    /// Set the retry budget.
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the delay unit.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Set the growth factor.
    pub fn with_factor(mut self, factor: f64) -> Self {
        self.factor = factor;
        self
    }

    /// Cap every delay at `delay`.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = Some(delay);
        self
    }

    /// Disable retries.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Delay before retry number `retry` (1-indexed).
    ///
    /// With the defaults this is `2^retry` seconds.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
        let secs = self.base_delay.as_secs_f64() * self.factor.powi(exponent);
        // NaN.max(0.0) is 0.0, so a NaN or negative factor yields no delay.
        let delay = Duration::try_from_secs_f64(secs.max(0.0)).unwrap_or(Duration::MAX);

        match self.max_delay {
            Some(max) => delay.min(max),
            None => delay,
        }
    }

    /// Sum of every delay the full retry budget can incur.
    pub fn total_backoff(&self) -> Duration {
        (1..=self.max_retries).fold(Duration::ZERO, |acc, retry| {
            acc.saturating_add(self.delay_for(retry))
        })
    }
}

/// Tracks retries for a single logical operation.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
    attempt: u32,
}

impl RetryPolicy {
    /// Create a new retry policy from config.
    pub fn new(config: RetryConfig) -> Self {
        Self { config, attempt: 0 }
    }

    /// Number of retries taken so far.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Returns true if the budget allows another retry.
    pub fn should_retry(&self) -> bool {
        self.attempt < self.config.max_retries
    }

    /// Record a retry and return the delay to wait before it.
    /// Returns None if the budget is exhausted.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if !self.should_retry() {
            return None;
        }

        self.attempt += 1;
        Some(self.config.delay_for(self.attempt))
    }

    /// Reset the policy for a new operation.
    pub fn reset(&mut self) {
        self.attempt = 0;
    }

    /// Run `operation` until it succeeds or the budget is exhausted.
    ///
    /// Attempts are strictly sequential. Between attempts the task sleeps for
    /// the backoff delay without blocking the runtime. When the budget runs
    /// out the last error is returned.
    pub async fn execute<F, Fut, T, E>(&mut self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    let Some(delay) = self.next_delay() else {
                        return Err(err);
                    };

                    warn!(
                        attempt = self.attempt,
                        max_retries = self.config.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
