//! Time labels shared by the status bar and the list screens.

use chrono::{DateTime, Local, TimeZone, Utc};

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Status bar clock, e.g. `09:41` or `09:41 AM`.
pub fn clock_label<Tz: TimeZone>(time: &DateTime<Tz>, use_24hr: bool) -> String
where
    Tz::Offset: std::fmt::Display,
{
    if use_24hr {
        time.format("%H:%M").to_string()
    } else {
        time.format("%I:%M %p").to_string()
    }
}

/// Relative age of `timestamp` at `now` (both epoch ms): `now`, `5m ago`,
/// `2h ago`, `3d ago`. Future timestamps read as `now`.
pub fn relative_time(timestamp: i64, now: i64) -> String {
    let diff = (now - timestamp).max(0);
    let minutes = diff / MINUTE_MS;
    if minutes < 1 {
        "now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if diff < DAY_MS {
        format!("{}h ago", diff / HOUR_MS)
    } else {
        format!("{}d ago", diff / DAY_MS)
    }
}

/// Message list timestamp: the local time of day for messages younger than
/// a day, otherwise a short date such as `Mar 4`.
pub fn message_time(timestamp: i64, now: i64, use_24hr: bool) -> String {
    let Some(utc) = DateTime::<Utc>::from_timestamp_millis(timestamp) else {
        return String::new();
    };
    let local = utc.with_timezone(&Local);
    if now - timestamp < DAY_MS {
        clock_label(&local, use_24hr)
    } else {
        local.format("%b %-d").to_string()
    }
}

/// Part of the day for a local hour: before noon is morning, before 17:00
/// afternoon, otherwise evening.
pub fn time_of_day(hour: u32) -> &'static str {
    if hour < 12 {
        "morning"
    } else if hour < 17 {
        "afternoon"
    } else {
        "evening"
    }
}

/// Home screen date line, e.g. `Wednesday, May 1`.
pub fn long_date<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format("%A, %B %-d").to_string()
}
