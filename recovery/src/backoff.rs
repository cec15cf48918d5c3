//! Fixed exponential backoff schedule for boundary retries.

#[cfg(test)]
#[path = "backoff_test.rs"]
mod backoff_test;

use std::time::Duration;

/// Completed retries allowed before "Try Again" is disabled.
pub const RETRY_CEILING: u32 = 3;

/// Multiplier applied per completed retry; the first delay is one second.
pub const BACKOFF_BASE: u32 = 2;

/// Delay before completing the retry that follows `retry_count` completed
/// retries: `BACKOFF_BASE ^ retry_count` seconds.
///
/// Returns `None` once the ceiling is reached.
#[must_use]
pub fn backoff_delay(retry_count: u32) -> Option<Duration> {
    if is_exhausted(retry_count) {
        return None;
    }
    Some(Duration::from_secs(u64::from(BACKOFF_BASE.pow(retry_count))))
}

/// Whether no further retries are permitted.
#[must_use]
pub fn is_exhausted(retry_count: u32) -> bool {
    retry_count >= RETRY_CEILING
}
