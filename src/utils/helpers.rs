//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::{DateTime, Duration, Utc};
use crate::utils::errors::{StayBuddyError, Result};

/// Milliseconds in one day
pub const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Largest accepted kick delay, in days. Keeps deadline arithmetic well
/// inside chrono's representable date range.
pub const MAX_KICK_DAYS: i64 = 3650;

/// Convert a whole number of days to milliseconds, saturating on overflow
pub const fn days_to_ms(days: i64) -> i64 {
    days.saturating_mul(MS_PER_DAY)
}

/// Compute the eviction deadline for a member admitted at `now`.
///
/// Delays past the end of chrono's range saturate to the maximum
/// representable timestamp instead of panicking.
pub fn kick_date_after(now: DateTime<Utc>, delay_ms: i64) -> DateTime<Utc> {
    now.checked_add_signed(Duration::milliseconds(delay_ms))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Parse a user-supplied day count, rejecting anything but an integer
/// between 1 and [`MAX_KICK_DAYS`]
pub fn parse_positive_days(text: &str) -> Result<i64> {
    match text.trim().parse::<i64>() {
        Ok(days) if days > 0 && days <= MAX_KICK_DAYS => Ok(days),
        _ => Err(StayBuddyError::InvalidInput(format!(
            "expected between 1 and {} days, got '{}'",
            MAX_KICK_DAYS,
            text.trim()
        ))),
    }
}
