//! Civil timestamp helpers for plan and slot tables.
//!
//! All timestamps in this crate are naive civil times ([`NaiveDateTime`]):
//! whatever zone the input tables encode is carried through untouched.

use chrono::{NaiveDateTime, NaiveTime, Timelike};
use thiserror::Error;

/// Accepted input formats, tried in order. `%.f` also matches the absence
/// of a fractional part.
const INPUT_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Format used when writing timestamps to the output table.
pub const OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum TimestampError {
    #[error("unparseable timestamp '{0}'")]
    Unparseable(String),
}

/// Parse a timestamp string against the accepted format list.
///
/// Malformed input is a hard error: the caller is expected to abort the
/// run rather than continue with partial data.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, TimestampError> {
    let trimmed = raw.trim();
    for format in INPUT_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed);
        }
    }
    Err(TimestampError::Unparseable(raw.to_string()))
}

/// Format a timestamp for the output table.
pub fn format_timestamp(dt: NaiveDateTime) -> String {
    dt.format(OUTPUT_FORMAT).to_string()
}

/// Hour-and-minute component of a timestamp as minutes since midnight,
/// independent of the calendar date. Seconds are ignored.
///
/// Kept in integer minutes so that comparisons against an hour tolerance
/// are exact: a fractional-hour representation rounds at some minute
/// values and can push a difference of exactly N hours just past N.
pub fn time_of_day_minutes(dt: NaiveDateTime) -> i64 {
    i64::from(dt.hour()) * 60 + i64::from(dt.minute())
}

/// Substitute the hour and minute of `base`, keeping its date, seconds,
/// and sub-second part.
pub fn with_time_of_day(base: NaiveDateTime, hour: u32, minute: u32) -> NaiveDateTime {
    // hour/minute come from a valid timestamp, so construction cannot fail
    let time = NaiveTime::from_hms_nano_opt(
        hour,
        minute,
        base.time().second(),
        base.time().nanosecond(),
    )
    .unwrap_or_else(|| base.time());
    base.date().and_time(time)
}
