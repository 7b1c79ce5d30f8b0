//! Textual time formats used inside statements.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, Utc};

/// RFC 1123 in GMT, e.g. `Mon, 01 Jan 2024 00:00:00 GMT`.
const RFC1123_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Birth dates in person verifications, e.g. `01 Jan 1990`.
const BIRTH_DATE_FORMAT: &str = "%d %b %Y";

/// Render a time as an RFC 1123 GMT string.
pub fn format_rfc1123(time: &DateTime<Utc>) -> String {
    time.format(RFC1123_FORMAT).to_string()
}

/// Parse the strict RFC 1123 GMT form written by current builders.
///
/// The weekday must agree with the date.
pub fn parse_rfc1123(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, RFC1123_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
        .filter(|time| format_rfc1123(time) == s)
}

/// Parse the free-form times found in pre-versioning statements.
///
/// Accepts RFC 1123, RFC 2822 (any offset) and RFC 3339, normalized to UTC.
pub fn parse_lenient(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    parse_rfc1123(s)
        .or_else(|| {
            DateTime::parse_from_rfc2822(s)
                .ok()
                .map(|t| t.with_timezone(&Utc))
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|t| t.with_timezone(&Utc))
        })
}

/// Drop sub-second precision, which the text format cannot carry.
pub fn truncate_to_seconds(time: DateTime<Utc>) -> DateTime<Utc> {
    time.trunc_subsecs(0)
}

pub fn format_birth_date(date: &NaiveDate) -> String {
    date.format(BIRTH_DATE_FORMAT).to_string()
}

pub fn parse_birth_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, BIRTH_DATE_FORMAT).ok()
}
