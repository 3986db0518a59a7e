//! Retry logic for transient collaborator failures.
//!
//! [`with_retry`] wraps an async operation with automatic retry on
//! transient errors (object store or ledger unavailability). Non-transient
//! errors (validation, authorization, lifecycle conflicts) are returned
//! immediately: a lost compare-and-set is not a failure to repeat.
//!
//! Backoff doubles per attempt from `initial_backoff`, is capped at
//! `max_backoff`, and carries 0–50% random jitter so concurrent callers
//! do not retry in lockstep.

use crate::config::RetryConfig;
use crate::error::{DocumentPipelineError, Result};
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Executes `operation` with automatic retry on transient errors.
///
/// Returns the result of the first successful call, or the last error
/// once all attempts are exhausted. Only errors where
/// [`DocumentPipelineError::is_transient`] holds are retried.
pub async fn with_retry<F, Fut, T>(
    config: &RetryConfig,
    operation_name: &str,
    mut operation: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_error: Option<DocumentPipelineError> = None;

    for attempt in 0..=config.max_retries {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(
                        operation = operation_name,
                        attempt = attempt + 1,
                        "operation succeeded after retry",
                    );
                }
                return Ok(value);
            }
            Err(err) if err.is_transient() && attempt < config.max_retries => {
                let delay = compute_backoff(config, attempt);
                debug!(
                    operation = operation_name,
                    attempt = attempt + 1,
                    max_attempts = config.max_retries + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "transient error, retrying after backoff",
                );
                tokio::time::sleep(delay).await;
                last_error = Some(err);
            }
            Err(err) => {
                // Non-transient on any attempt, or transient on the last.
                return Err(err);
            }
        }
    }

    // All retries exhausted, return the last transient error
    Err(last_error.unwrap_or_else(|| {
        DocumentPipelineError::Internal("retry loop completed without result or error".to_string())
    }))
}

/// Computes the backoff duration for the given attempt number.
///
/// `min(initial_backoff * 2^attempt, max_backoff) + random(0..50% of delay)`
fn compute_backoff(config: &RetryConfig, attempt: u32) -> Duration {
    let base = config
        .initial_backoff()
        .saturating_mul(1u32.checked_shl(attempt).unwrap_or(u32::MAX));
    let capped = base.min(config.max_backoff());

    let jitter_range = capped.as_millis() as u64 / 2;
    if jitter_range > 0 {
        let jitter = rand::thread_rng().gen_range(0..=jitter_range);
        capped + Duration::from_millis(jitter)
    } else {
        capped
    }
}
