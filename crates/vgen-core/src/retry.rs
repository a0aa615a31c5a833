//! Retry-on-overload policy for provider calls
//!
//! The decision is a pure function of the error class and the attempt number, so the
//! schedule can be checked without touching the network. [`retry_with_backoff`] is the
//! async driver that applies it.

use crate::{Error, Result};
use std::future::Future;
use std::time::Duration;

/// How a failed provider call should be treated by the retry loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    TransientOverload,
    Permanent,
}

impl ErrorClass {
    /// Classify by the overload signature (503 / unavailable / overloaded)
    pub fn of_overload(err: &Error) -> Self {
        if err.is_overloaded() {
            ErrorClass::TransientOverload
        } else {
            ErrorClass::Permanent
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    RetryAfter(Duration),
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Decide what to do after `attempt` (1-based) failed with an error of `class`.
    ///
    /// Delays double from `base_delay`: 1s, 2s, 4s for the default policy.
    pub fn decide(&self, class: ErrorClass, attempt: u32) -> RetryDecision {
        if class == ErrorClass::Permanent || attempt >= self.max_attempts {
            return RetryDecision::Fail;
        }
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        RetryDecision::RetryAfter(self.base_delay.saturating_mul(factor))
    }
}

/// Run `op` until it succeeds or the policy gives up, returning the last error.
pub async fn retry_with_backoff<T, F, Fut, C>(policy: &RetryPolicy, classify: C, mut op: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
    C: Fn(&Error) -> ErrorClass,
{
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) => match policy.decide(classify(&err), attempt) {
                RetryDecision::RetryAfter(delay) => {
                    tracing::warn!(
                        attempt,
                        max_attempts = policy.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        "Provider overloaded, retrying: {}",
                        err
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                RetryDecision::Fail => return Err(err),
            },
        }
    }
}
