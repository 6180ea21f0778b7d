//! Textual timestamp helpers.
//!
//! Persisted timestamps are plain strings so that stored values round-trip
//! byte-for-byte. Comparison parses them as RFC 3339 and falls back to
//! lexical ordering for strings that do not parse.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use std::cmp::Ordering;

/// Formats one instant the way every record timestamp is written.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses a stored timestamp string.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

/// Orders two stored timestamps.
pub fn compare_timestamps(left: &str, right: &str) -> Ordering {
    match (parse_timestamp(left), parse_timestamp(right)) {
        (Some(left), Some(right)) => left.cmp(&right),
        _ => left.cmp(right),
    }
}

/// Returns the refreshed value for a monotonic `updatedAt` field.
///
/// The result is always strictly later than a parseable `previous`: when the
/// clock has not moved past it, `previous` is bumped by one millisecond.
pub fn refreshed(previous: &str, now: String) -> String {
    let Some(previous_at) = parse_timestamp(previous) else {
        return now;
    };
    match parse_timestamp(&now) {
        Some(now_at) if now_at > previous_at => now,
        _ => format_timestamp(previous_at + Duration::milliseconds(1)),
    }
}
