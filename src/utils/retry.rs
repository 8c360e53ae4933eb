// Retry logic with Retry-After hint support
// Author: kelexine (https://github.com/kelexine)

use backoff::{backoff::Backoff, ExponentialBackoff};
use std::time::Duration;
use tracing::debug;

/// Status used for failures that never reached the upstream (connect, DNS, timeout).
pub const TRANSPORT_ERROR: u16 = 0;

/// A failed attempt: HTTP status, error body and an optional server delay hint.
#[derive(Debug, Clone)]
pub struct AttemptError {
    pub status: u16,
    pub body: String,
    pub retry_after: Option<Duration>,
}

impl AttemptError {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            retry_after: None,
        }
    }

    pub fn transport(body: impl Into<String>) -> Self {
        Self::new(TRANSPORT_ERROR, body)
    }

    pub fn with_retry_after(mut self, delay: Option<Duration>) -> Self {
        self.retry_after = delay;
        self
    }
}

/// Parse a `Retry-After` header given in seconds (e.g. "3", "1.5").
/// Capped at 60 seconds.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    let seconds: f64 = value.trim().parse().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    let capped_seconds = seconds.min(60.0);
    Some(Duration::from_millis((capped_seconds * 1000.0) as u64))
}

/// Create exponential backoff configuration for retries
pub fn create_backoff() -> ExponentialBackoff {
    ExponentialBackoff {
        current_interval: Duration::from_millis(500),     // Start at 500ms
        initial_interval: Duration::from_millis(500),
        randomization_factor: 0.3,                         // Add jitter
        multiplier: 2.0,                                  // Double each time
        max_interval: Duration::from_secs(30),            // Cap at 30s
        max_elapsed_time: Some(Duration::from_secs(120)), // Give up after 2 minutes
        ..Default::default()
    }
}

/// Determine if a status code is retryable
pub fn is_retryable(status: u16) -> bool {
    matches!(status, TRANSPORT_ERROR | 429 | 500 | 502 | 503 | 504)
}

/// Execute operation, retrying transient failures up to `max_retries` times.
/// - Uses the upstream's Retry-After hint if available
/// - Falls back to exponential backoff
pub async fn with_retry<F, Fut, T>(
    operation_name: &str,
    max_retries: u32,
    mut operation: F,
) -> Result<T, AttemptError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, AttemptError>>,
{
    let mut backoff = create_backoff();
    let mut attempt = 0;

    loop {
        attempt += 1;

        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!("{} succeeded on attempt {}", operation_name, attempt);
                }
                return Ok(result);
            }
            Err(err) => {
                if !is_retryable(err.status) || attempt > max_retries {
                    return Err(err);
                }

                let delay = match err.retry_after {
                    Some(hint) => hint,
                    None => backoff.next_backoff().unwrap_or(Duration::from_secs(30)),
                };
                debug!(
                    "{} failed with {} (attempt {}), retrying after {}ms",
                    operation_name,
                    err.status,
                    attempt,
                    delay.as_millis()
                );

                tokio::time::sleep(delay).await;
            }
        }
    }
}
