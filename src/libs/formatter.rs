//! Duration helpers used by the statistics and the flight tables.
//!
//! Flight times are `chrono::Duration` values computed from epoch
//! milliseconds. They are shown as `HH:MM:SS` where the hour field is not
//! wrapped at 24, so a logbook total of 130 hours reads `130:00:00`.
//!
//! ## Examples
//!
//! ```rust
//! use logbook::libs::formatter::{format_duration, sum_durations};
//! use chrono::Duration;
//!
//! let total = sum_durations([Duration::hours(1), Duration::minutes(150)]);
//! assert_eq!(format_duration(&total), "03:30:00");
//! ```

use chrono::Duration;

/// Formats a duration as `HH:MM:SS`.
///
/// Hours are zero-padded to at least two digits and never wrap. Flight
/// durations are not validated on input, so a negative duration can reach
/// this function; it keeps its sign (`-01:30:00`) instead of being clamped,
/// which makes inconsistent entries visible in the tables.
pub fn format_duration(duration: &Duration) -> String {
    let sign = if *duration < Duration::zero() { "-" } else { "" };
    let total_secs = duration.num_seconds().unsigned_abs();

    let hours = total_secs / 3600;
    let mins = (total_secs % 3600) / 60;
    let secs = total_secs % 60;

    format!("{}{:02}:{:02}:{:02}", sign, hours, mins, secs)
}

/// Adds up a sequence of durations. An empty sequence sums to zero and an
/// overflowing sum sticks at `Duration::MAX` or `Duration::MIN`.
pub fn sum_durations<I>(durations: I) -> Duration
where
    I: IntoIterator<Item = Duration>,
{
    durations.into_iter().fold(Duration::zero(), |acc, d| {
        acc.checked_add(&d).unwrap_or(if d < Duration::zero() { Duration::MIN } else { Duration::MAX })
    })
}
