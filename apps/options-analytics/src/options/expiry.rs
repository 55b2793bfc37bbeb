//! Days to expiry from timestamps.

use chrono::{DateTime, Utc};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Fractional calendar days from `now` until `expiry`, clamped at zero.
#[must_use]
pub fn days_to_expiry(expiry: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let remaining = expiry.signed_duration_since(now);
    let seconds = remaining.num_milliseconds() as f64 / 1000.0;
    (seconds / SECONDS_PER_DAY).max(0.0)
}
