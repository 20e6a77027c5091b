//! Retry with exponential backoff, used for saga compensation.

use std::{future::Future, time::Duration};

use tokio::time::sleep;

/// Exponential backoff configuration.
///
/// Defaults: 3 retries, 100ms initial delay, 2s cap, doubling each retry.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: usize,
    pub initial_delay: Duration,
    /// Cap for the exponential delay
    pub max_delay: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (0-based), capped at `max_delay`.
    pub fn delay_for_attempt(&self, attempt: usize) -> Duration {
        if attempt == 0 {
            return self.initial_delay.min(self.max_delay);
        }

        let delay_ms =
            self.initial_delay.as_millis() as f64 * self.multiplier.powi(attempt as i32);
        Duration::from_millis(delay_ms as u64).min(self.max_delay)
    }
}

/// Runs `operation` until it succeeds or the policy's retries are exhausted,
/// returning the last error in the latter case.
pub async fn retry_with_backoff<F, Fut, T, E>(policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    log::info!("Operation succeeded after {attempt} retries");
                }
                return Ok(value);
            }
            Err(err) if attempt >= policy.max_retries => {
                log::warn!("Operation failed after {} attempts: {err}", attempt + 1);
                return Err(err);
            }
            Err(err) => {
                let delay = policy.delay_for_attempt(attempt);
                log::debug!("Attempt {} failed: {err}; retrying in {delay:?}", attempt + 1);
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
