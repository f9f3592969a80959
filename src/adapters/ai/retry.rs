//! Shared transport helpers for HTTP-backed providers.
//!
//! Both the Ollama and the OpenAI-compatible adapters retry transient
//! failures with exponential backoff and classify HTTP statuses the same way.

use reqwest::StatusCode;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::AIError;

/// Bounded retry with exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubled on each further retry.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::from_secs(1),
        }
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Delay before retry number `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(1u32 << attempt.min(16))
    }

    /// Runs `op` until it succeeds, fails with a non-retryable error, or the
    /// retry budget is spent. The last error is returned.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, AIError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AIError>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.max_retries => {
                    let delay = self.delay_for(attempt);
                    tracing::debug!(error = %err, attempt, ?delay, "Retrying completion request");
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Maps a transport failure from reqwest.
pub fn map_send_error(err: reqwest::Error, timeout: Duration) -> AIError {
    if err.is_timeout() {
        AIError::Timeout {
            timeout_secs: timeout.as_secs() as u32,
        }
    } else if err.is_connect() {
        AIError::network(format!("Connection failed: {}", err))
    } else {
        AIError::network(err.to_string())
    }
}

/// Maps a non-success HTTP status and its body.
pub fn map_error_status(status: StatusCode, body: String) -> AIError {
    match status.as_u16() {
        401 | 403 => AIError::AuthenticationFailed,
        429 => AIError::rate_limited(30),
        400 | 404 => {
            if body.contains("maximum context length") || body.contains("context_length_exceeded")
            {
                AIError::context_too_long(0, 0)
            } else {
                AIError::InvalidRequest(body)
            }
        }
        500..=599 => AIError::unavailable(format!("Server error {}: {}", status, body)),
        _ => AIError::network(format!("Unexpected status {}: {}", status, body)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast(max_retries: u32) -> RetryPolicy {
        RetryPolicy::new(max_retries).with_base_delay(Duration::from_millis(1))
    }

    #[test]
    fn delay_doubles_per_attempt() {
        let policy = RetryPolicy::new(3);
        assert_eq!(policy.delay_for(0), Duration::from_secs(1));
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
    }

    #[tokio::test]
    async fn retries_transient_errors_until_success() {
        let calls = AtomicU32::new(0);
        let result = fast(2)
            .run(|| async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(AIError::network("reset"))
                } else {
                    Ok("done")
                }
            })
            .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn stops_after_budget() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = fast(1)
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(AIError::unavailable("down"))
            })
            .await;

        assert!(matches!(result, Err(AIError::Unavailable { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn does_not_retry_permanent_errors() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = fast(5)
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(AIError::AuthenticationFailed)
            })
            .await;

        assert!(matches!(result, Err(AIError::AuthenticationFailed)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn status_mapping() {
        assert!(matches!(
            map_error_status(StatusCode::UNAUTHORIZED, String::new()),
            AIError::AuthenticationFailed
        ));
        assert!(matches!(
            map_error_status(StatusCode::TOO_MANY_REQUESTS, String::new()),
            AIError::RateLimited { .. }
        ));
        assert!(matches!(
            map_error_status(StatusCode::NOT_FOUND, "model not found".into()),
            AIError::InvalidRequest(_)
        ));
        assert!(matches!(
            map_error_status(StatusCode::BAD_GATEWAY, String::new()),
            AIError::Unavailable { .. }
        ));
    }
}
