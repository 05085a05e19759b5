//! Retry delay schedule

use std::time::Duration;

/// Delay to wait after failed retry `attempt` (1-indexed): `base * 2^(attempt-1)`.
///
/// Attempt 0 is treated as attempt 1. The result saturates instead of
/// overflowing.
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(31);
    base.saturating_mul(1u32 << exponent)
}
