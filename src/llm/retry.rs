//! Retry loop for model calls.

use std::future::Future;

use tracing::warn;

use super::LlmError;
use crate::config::RetryConfig;

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// attempt budget is spent.
///
/// A `Retry-After` hint on a rate limit replaces the computed delay, still
/// capped at `max_delay`.
pub async fn with_retry<T, F, Fut>(policy: &RetryConfig, mut op: F) -> Result<T, LlmError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, LlmError>>,
{
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_retryable(&policy.http_status_codes) => return Err(e),
            Err(e) if attempt >= attempts => {
                return Err(if attempts == 1 {
                    e
                } else {
                    LlmError::RetriesExhausted {
                        attempts,
                        last: Box::new(e),
                    }
                });
            }
            Err(e) => {
                let delay = e
                    .retry_after()
                    .map(|d| d.min(policy.max_delay))
                    .unwrap_or_else(|| policy.delay_for(attempt));
                warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "model call failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
