//! Timestamp parsing and formatting shared by the domain and storage layers.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

use crate::domain::models::ValidationError;

/// Years that format to four digits, and so read back and sort as stored text
const STORABLE_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// Parse a client-supplied date.
///
/// Accepts an RFC 3339 timestamp, a naive `YYYY-MM-DDTHH:MM:SS[.fff]`
/// timestamp (taken as UTC), or a plain ISO date (midnight UTC).
/// Years outside 0000-9999 are rejected.
pub fn parse_client_timestamp(
    field: &'static str,
    value: &str,
) -> Result<DateTime<Utc>, ValidationError> {
    let trimmed = value.trim();

    parse_any_format(trimmed)
        .filter(|timestamp| STORABLE_YEARS.contains(&timestamp.year()))
        .ok_or_else(|| ValidationError::InvalidDate {
            field,
            value: value.to_string(),
        })
}

fn parse_any_format(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&naive));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| Utc.from_utc_datetime(&midnight))
}

/// Fixed-width RFC 3339 (microseconds, `Z` suffix) so stored values sort lexicographically
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}
