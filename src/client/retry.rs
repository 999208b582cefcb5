//! Retry with exponential backoff for remote AI calls.
//!
//! [`RetryableCall`] runs an operation up to [`RetryPolicy::max_attempts`]
//! times. Each attempt reports either success, a [`Failure::Retryable`] (wait
//! and try again) or a [`Failure::Fatal`] (stop now). Payload validation
//! belongs inside the operation, so an empty or malformed reply is simply a
//! retryable failure.
//!
//! The wait before retry `n` is `base_delay * 2^(n-1)` with no jitter.

use std::future::Future;
use std::time::Duration;

use crate::client::error::AiError;

/// Base delay before the first retry.
pub const BASE_DELAY: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub const fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Recipe generation: 5 attempts.
    pub const fn recipes() -> Self {
        Self::new(5, BASE_DELAY)
    }

    /// Image generation: 4 attempts.
    pub const fn images() -> Self {
        Self::new(4, BASE_DELAY)
    }

    /// Ingredient identification: 5 attempts.
    pub const fn identification() -> Self {
        Self::new(5, BASE_DELAY)
    }

    /// Delay before the `retry`-th retry (1-based).
    pub fn delay_before_retry(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(31);
        self.base_delay.saturating_mul(1u32 << exponent)
    }
}

/// How a single attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// Abort the sequence and surface this error without further attempts.
    Fatal(AiError),
    /// Consume an attempt, back off and try again.
    Retryable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Succeeded,
    Retryable(String),
    Fatal(AiError),
}

/// One attempt of a retry sequence. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallAttempt {
    /// 1-based attempt number
    pub attempt: u32,
    /// Time waited before this attempt started
    pub delay: Duration,
    pub outcome: AttemptOutcome,
}

/// A bounded retry sequence around one remote operation.
#[derive(Debug)]
pub struct RetryableCall {
    operation: String,
    policy: RetryPolicy,
    attempts: Vec<CallAttempt>,
}

impl RetryableCall {
    pub fn new(operation: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            operation: operation.into(),
            policy,
            attempts: Vec::new(),
        }
    }

    /// Attempts made by the last [`run`](Self::run).
    pub fn attempts(&self) -> &[CallAttempt] {
        &self.attempts
    }

    /// Runs `op` until it succeeds, fails fatally, or attempts run out.
    ///
    /// `op` receives the 1-based attempt number. When every attempt fails with
    /// a retryable failure, `exhausted` is returned.
    pub async fn run<T, F, Fut>(&mut self, exhausted: AiError, mut op: F) -> Result<T, AiError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, Failure>>,
    {
        self.attempts.clear();
        let max_attempts = self.policy.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            let delay = if attempt == 1 {
                Duration::ZERO
            } else {
                self.policy.delay_before_retry(attempt - 1)
            };
            if !delay.is_zero() {
                tracing::debug!(
                    "Waiting {}ms before {} attempt {}/{}",
                    delay.as_millis(),
                    self.operation,
                    attempt,
                    max_attempts
                );
                tokio::time::sleep(delay).await;
            }

            match op(attempt).await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::info!("{} succeeded on attempt {}", self.operation, attempt);
                    }
                    self.record(attempt, delay, AttemptOutcome::Succeeded);
                    return Ok(value);
                }
                Err(Failure::Fatal(error)) => {
                    tracing::error!(
                        "{} aborted on attempt {}/{}: {}",
                        self.operation,
                        attempt,
                        max_attempts,
                        error
                    );
                    self.record(attempt, delay, AttemptOutcome::Fatal(error.clone()));
                    return Err(error);
                }
                Err(Failure::Retryable(reason)) => {
                    tracing::warn!(
                        "{} failed (attempt {}/{}): {}",
                        self.operation,
                        attempt,
                        max_attempts,
                        reason
                    );
                    self.record(attempt, delay, AttemptOutcome::Retryable(reason));
                }
            }
        }

        let last = self.attempts.last().map(|a| &a.outcome);
        tracing::error!(
            "{} failed after {} attempts. Last outcome: {:?}",
            self.operation,
            max_attempts,
            last
        );
        Err(exhausted)
    }

    fn record(&mut self, attempt: u32, delay: Duration, outcome: AttemptOutcome) {
        self.attempts.push(CallAttempt {
            attempt,
            delay,
            outcome,
        });
    }
}
