//! Retry with exponential back-off and jitter for source HTTP calls.
//!
//! [`retry_with_backoff`] wraps any fallible async operation and retries on
//! transient errors (network failures, 429, 5xx). Everything else is returned
//! immediately. With `max_retries = 0` the operation runs exactly once.

use std::future::Future;
use std::time::Duration;

use crate::error::SignalError;

const MAX_DELAY_MS: u64 = 10_000;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:** timeouts, connection failures, HTTP 429 and 5xx.
///
/// **Not retriable:** other 4xx (bad key, bad request), application-level
/// API errors, and malformed bodies.
pub(crate) fn is_retriable(err: &SignalError) -> bool {
    match err {
        SignalError::Http(e) => {
            e.is_timeout()
                || e.is_connect()
                || e.status()
                    .is_some_and(|s| s.is_server_error() || s.as_u16() == 429)
        }
        SignalError::Api { .. }
        | SignalError::Deserialize { .. }
        | SignalError::InvalidBaseUrl(_)
        | SignalError::Join(_) => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// The sleep before retry `n` is `backoff_base_ms × 2ⁿ⁻¹ ± 25 %`, capped at 10 s.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, SignalError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SignalError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::debug!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient source error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
