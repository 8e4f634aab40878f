//! Retry policy with linear backoff
//!
//! Attempt `k` failing is followed by a wait of `base_delay × k` before
//! attempt `k + 1`, up to `max_attempts` attempts in total.

use std::time::Duration;

use backoff::backoff::Backoff;
use flowinsight_config::Config;

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    retry_client_errors: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            retry_client_errors: true,
        }
    }
}

impl RetryPolicy {
    /// `max_attempts` is clamped to at least 1
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            retry_client_errors: true,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.retry_attempts, config.retry_delay)
            .with_retry_client_errors(config.retry_client_errors)
    }

    /// When disabled, 4xx responses other than 408 and 429 fail on first
    /// occurrence
    pub fn with_retry_client_errors(mut self, enabled: bool) -> Self {
        self.retry_client_errors = enabled;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    pub fn retries_client_errors(&self) -> bool {
        self.retry_client_errors
    }

    /// Wait after attempt `attempt` (1-based) fails
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    pub fn is_retryable(&self, error: &ApiError) -> bool {
        match error {
            ApiError::Unauthorized | ApiError::InvalidRequest(_) => false,
            ApiError::HttpStatus { code, .. } => {
                self.retry_client_errors
                    || !(400..500).contains(code)
                    || *code == 408
                    || *code == 429
            }
            ApiError::Network(_) | ApiError::Malformed(_) => true,
        }
    }

    /// Fresh backoff schedule for one call
    pub fn backoff(&self) -> LinearBackoff {
        LinearBackoff {
            policy: self.clone(),
            failed_attempts: 0,
        }
    }
}

/// Backoff schedule driving `backoff::future::retry_notify`. Each call to
/// `next_backoff` records one failed attempt.
#[derive(Debug, Clone)]
pub struct LinearBackoff {
    policy: RetryPolicy,
    failed_attempts: u32,
}

impl Backoff for LinearBackoff {
    fn reset(&mut self) {
        self.failed_attempts = 0;
    }

    fn next_backoff(&mut self) -> Option<Duration> {
        self.failed_attempts = self.failed_attempts.saturating_add(1);
        if self.failed_attempts >= self.policy.max_attempts {
            None
        } else {
            Some(self.policy.delay_for(self.failed_attempts))
        }
    }
}
