//! Retry/backoff state machine around a single-attempt [`Provider`].
//!
//! ```text
//! ATTEMPT ─┬─ Success ─────────────────────────────► done
//!          ├─ Retryable ─► sleep ─► ATTEMPT   (until max_attempts)
//!          └─ Permanent ──────────────────────────► failure
//! ```
//!
//! The delay before attempt `n` (0-based, n > 0) is the server's
//! `Retry-After` from the previous 429 when it sent one, otherwise
//! `backoff_factor ^ n` seconds. Each attempt runs under its own timeout.

use std::fmt;
use std::time::Duration;

use tracing::{info, warn};
use vedaguru_core::error::ProviderError;
use vedaguru_core::provider::{Provider, ProviderRequest, ProviderResponse};

/// How hard to try one request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    pub backoff_factor: f64,
    /// Per-attempt timeout
    pub timeout: Duration,
}

impl RetryPolicy {
    /// Delay before 0-based attempt `attempt`, given the error that ended the previous one.
    pub fn delay_before(&self, attempt: u32, previous: Option<&ProviderError>) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        if let Some(secs) = previous.and_then(ProviderError::retry_after_secs) {
            return Duration::from_secs(secs);
        }
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        Duration::try_from_secs_f64(self.backoff_factor.powi(exponent)).unwrap_or(Duration::ZERO)
    }
}

/// What one attempt came to.
#[derive(Debug)]
pub enum AttemptOutcome {
    Success(ProviderResponse),
    Retryable(ProviderError),
    Permanent(ProviderError),
}

impl AttemptOutcome {
    pub fn classify(result: Result<ProviderResponse, ProviderError>) -> Self {
        match result {
            Ok(response) => Self::Success(response),
            Err(e) if e.is_retryable() => Self::Retryable(e),
            Err(e) => Self::Permanent(e),
        }
    }
}

/// Short machine-readable reason a request ended without model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureTag {
    Timeout,
    Connection,
    /// Retryable HTTP status (5xx, 429)
    Http(u16),
    /// Any non-retryable provider failure
    ApiError,
    /// No usable provider for the request
    Configuration,
}

impl FailureTag {
    /// Tag for the error that ended the loop.
    pub fn from_error(error: &ProviderError) -> Self {
        match error {
            ProviderError::NotConfigured(_) => Self::Configuration,
            e if !e.is_retryable() => Self::ApiError,
            ProviderError::Timeout(_) => Self::Timeout,
            ProviderError::Network(_) => Self::Connection,
            e => e.status_code().map(Self::Http).unwrap_or(Self::ApiError),
        }
    }
}

impl fmt::Display for FailureTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => f.write_str("timeout"),
            Self::Connection => f.write_str("connection"),
            Self::Http(status) => write!(f, "http_{status}"),
            Self::ApiError => f.write_str("api_error"),
            Self::Configuration => f.write_str("configuration"),
        }
    }
}

/// A successful call.
#[derive(Debug)]
pub struct Completion {
    pub response: ProviderResponse,
    pub attempts: u32,
}

/// A call that never produced model output.
#[derive(Debug)]
pub struct RetryFailure {
    pub tag: FailureTag,
    pub attempts: u32,
    pub last_error: ProviderError,
}

impl fmt::Display for RetryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} after {} attempt(s): {}", self.tag, self.attempts, self.last_error)
    }
}

impl std::error::Error for RetryFailure {}

/// Run `request` against `provider` under `policy`.
pub async fn complete_with_retry(
    provider: &dyn Provider,
    request: ProviderRequest,
    policy: &RetryPolicy,
) -> Result<Completion, RetryFailure> {
    let max_attempts = policy.max_attempts.max(1);
    let mut last_error: Option<ProviderError> = None;

    for attempt in 0..max_attempts {
        let delay = policy.delay_before(attempt, last_error.as_ref());
        if !delay.is_zero() {
            info!(
                provider = provider.name(),
                attempt = attempt + 1,
                max_attempts,
                delay_secs = delay.as_secs_f64(),
                "Backing off before retry"
            );
            tokio::time::sleep(delay).await;
        }

        info!(
            provider = provider.name(),
            model = %request.model,
            attempt = attempt + 1,
            max_attempts,
            "Sending request"
        );

        let result = match tokio::time::timeout(policy.timeout, provider.complete(request.clone())).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(format!(
                "no response from '{}' within {}s",
                provider.name(),
                policy.timeout.as_secs_f64()
            ))),
        };

        match AttemptOutcome::classify(result) {
            AttemptOutcome::Success(response) => {
                match &response.usage {
                    Some(usage) => info!(
                        provider = provider.name(),
                        model = %response.model,
                        attempt = attempt + 1,
                        prompt_tokens = usage.prompt_tokens,
                        completion_tokens = usage.completion_tokens,
                        total_tokens = usage.total_tokens,
                        "Completion succeeded"
                    ),
                    None => info!(
                        provider = provider.name(),
                        model = %response.model,
                        attempt = attempt + 1,
                        "Completion succeeded"
                    ),
                }
                return Ok(Completion { response, attempts: attempt + 1 });
            }
            AttemptOutcome::Retryable(e) => {
                warn!(
                    provider = provider.name(),
                    attempt = attempt + 1,
                    max_attempts,
                    error = %e,
                    "Retryable provider failure"
                );
                last_error = Some(e);
            }
            AttemptOutcome::Permanent(e) => {
                warn!(
                    provider = provider.name(),
                    attempt = attempt + 1,
                    error = %e,
                    "Permanent provider failure, not retrying"
                );
                return Err(RetryFailure {
                    tag: FailureTag::from_error(&e),
                    attempts: attempt + 1,
                    last_error: e,
                });
            }
        }
    }

    let last_error = last_error
        .unwrap_or_else(|| ProviderError::NotConfigured("no attempt was made".into()));
    warn!(
        provider = provider.name(),
        attempts = max_attempts,
        error = %last_error,
        "All attempts failed"
    );
    Err(RetryFailure {
        tag: FailureTag::from_error(&last_error),
        attempts: max_attempts,
        last_error,
    })
}
