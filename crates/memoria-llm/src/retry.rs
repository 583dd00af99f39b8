//! HTTP retry policy for model calls
//!
//! [`RetryingModel`] wraps any [`Model`] and retries calls that fail with an
//! HTTP status from the allow-list in [`HttpRetryOptions`]. Delays grow
//! exponentially from `initial_delay` by `exp_base`, are capped at
//! `max_delay`, and receive up to `jitter` seconds of random noise.

use crate::error::{ModelError, ModelResult};
use crate::model::Model;
use crate::types::{LlmRequest, LlmResponse};
use async_trait::async_trait;
use http::StatusCode;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Retry configuration attached to a model binding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpRetryOptions {
    /// Maximum number of attempts, including the first call
    pub attempts: u32,

    /// Multiplier applied to the delay after every failed attempt
    pub exp_base: f64,

    /// Delay before the first retry, in seconds
    pub initial_delay: f64,

    /// Upper bound on the backoff delay, in seconds
    pub max_delay: f64,

    /// Maximum random delay added to every backoff, in seconds
    pub jitter: f64,

    /// HTTP status codes that trigger a retry
    pub http_status_codes: Vec<u16>,
}

impl Default for HttpRetryOptions {
    fn default() -> Self {
        Self {
            attempts: 5,
            exp_base: 7.0,
            initial_delay: 1.0,
            max_delay: 60.0,
            jitter: 1.0,
            http_status_codes: vec![429, 500, 503, 504],
        }
    }
}

impl HttpRetryOptions {
    /// Single attempt, never retry
    pub fn no_retry() -> Self {
        Self {
            attempts: 1,
            ..Default::default()
        }
    }

    /// Set the maximum number of attempts
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }

    /// Set the exponential base
    pub fn with_exp_base(mut self, exp_base: f64) -> Self {
        self.exp_base = exp_base;
        self
    }

    /// Set the initial delay in seconds
    pub fn with_initial_delay(mut self, seconds: f64) -> Self {
        self.initial_delay = seconds;
        self
    }

    /// Set the maximum delay in seconds
    pub fn with_max_delay(mut self, seconds: f64) -> Self {
        self.max_delay = seconds;
        self
    }

    /// Set the jitter in seconds
    pub fn with_jitter(mut self, seconds: f64) -> Self {
        self.jitter = seconds;
        self
    }

    /// Replace the retryable status codes
    pub fn with_status_codes(mut self, codes: Vec<u16>) -> Self {
        self.http_status_codes = codes;
        self
    }

    /// Effective attempt budget (at least one call is always made)
    pub fn max_attempts(&self) -> u32 {
        self.attempts.max(1)
    }

    /// Whether a status is in the allow-list
    pub fn is_retryable_status(&self, status: StatusCode) -> bool {
        self.http_status_codes.contains(&status.as_u16())
    }

    /// Whether an error should be retried
    pub fn is_retryable(&self, error: &ModelError) -> bool {
        match error {
            ModelError::Http { status, .. } => self.is_retryable_status(*status),
            _ => false,
        }
    }

    /// Backoff before retry number `retry` (1-based), without jitter
    pub fn base_delay(&self, retry: u32) -> Duration {
        if retry == 0 {
            return Duration::ZERO;
        }

        let exponent = i32::try_from(retry - 1).unwrap_or(i32::MAX);
        let delay = self.initial_delay * self.exp_base.powi(exponent);
        seconds_to_duration(delay.min(self.max_delay))
    }

    /// Backoff before retry number `retry` (1-based), including jitter
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let base = self.base_delay(retry);
        if self.jitter > 0.0 && self.jitter.is_finite() {
            let noise = rand::thread_rng().gen_range(0.0..self.jitter);
            base.saturating_add(seconds_to_duration(noise))
        } else {
            base
        }
    }
}

/// Seconds from configuration as a `Duration`, saturating at `Duration::MAX`
///
/// Negative and NaN values mean no delay.
fn seconds_to_duration(seconds: f64) -> Duration {
    if seconds.is_nan() || seconds <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
}

/// A model wrapper applying [`HttpRetryOptions`]
pub struct RetryingModel<M> {
    inner: M,
    options: HttpRetryOptions,
}

impl<M: Model> RetryingModel<M> {
    /// Wrap a model with a retry policy
    pub fn new(inner: M, options: HttpRetryOptions) -> Self {
        Self { inner, options }
    }

    /// The retry policy in use
    pub fn options(&self) -> &HttpRetryOptions {
        &self.options
    }

    /// The wrapped model
    pub fn inner(&self) -> &M {
        &self.inner
    }
}

#[async_trait]
impl<M: Model> Model for RetryingModel<M> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn generate_content(&self, request: LlmRequest) -> ModelResult<LlmResponse> {
        let max_attempts = self.options.max_attempts();
        let mut attempt = 1;

        loop {
            let error = match self.inner.generate_content(request.clone()).await {
                Ok(response) => {
                    if attempt > 1 {
                        debug!(model = %self.inner.name(), attempt, "Model call succeeded after retry");
                    }
                    return Ok(response);
                }
                Err(e) => e,
            };

            if !self.options.is_retryable(&error) {
                return Err(error);
            }

            if attempt >= max_attempts {
                warn!(
                    model = %self.inner.name(),
                    attempts = attempt,
                    error = %error,
                    "Model call retries exhausted"
                );
                return Err(ModelError::RetriesExhausted {
                    attempts: attempt,
                    last: Box::new(error),
                });
            }

            let delay = self.options.delay_for_retry(attempt);
            warn!(
                model = %self.inner.name(),
                attempt,
                max_attempts,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "Transient model failure, retrying"
            );

            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
