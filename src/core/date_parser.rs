//! Date parsing utilities
//!
//! Provider timestamps are normally RFC 3339, but trend bucketing has to
//! tolerate naive ISO date-times and bare dates as well.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a timestamp into an absolute instant
///
/// Supports RFC 3339 (`2024-01-15T10:30:00Z`, `...+02:00`) and naive ISO
/// date-times, which are taken to be UTC.
pub fn parse_instant(timestamp: &str) -> Option<DateTime<Utc>> {
    let trimmed = timestamp.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    parse_naive_datetime(trimmed).map(|naive| naive.and_utc())
}

/// Calendar date of a timestamp, in the offset the timestamp was written in
///
/// Accepts everything [`parse_instant`] does plus a bare `YYYY-MM-DD`.
/// Returns `None` for anything unparseable.
pub fn parse_event_date(timestamp: &str) -> Option<NaiveDate> {
    let trimmed = timestamp.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }
    if let Some(naive) = parse_naive_datetime(trimmed) {
        return Some(naive.date());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

/// Lower bound of a lookback window of `days` ending at `now`
///
/// Windows reaching past the earliest representable instant start there.
pub fn lookback_start(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    now.checked_sub_signed(Duration::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

fn parse_naive_datetime(value: &str) -> Option<NaiveDateTime> {
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}
