//! Ack timestamp encoding.
//!
//! `delivery-acked-at:` values are RFC 3339 in UTC at second precision with a
//! trailing `Z` (e.g. `2026-02-17T12:00:00Z`). Input times in any zone are
//! normalized to UTC before formatting.

use chrono::{DateTime, SecondsFormat, SubsecRound, TimeZone, Utc};

/// Normalize `at` to UTC and drop sub-second precision.
pub fn normalize_ack_time<Tz: TimeZone>(at: &DateTime<Tz>) -> DateTime<Utc> {
    at.with_timezone(&Utc).trunc_subsecs(0)
}

/// Format an ack time as it appears on the wire.
pub fn format_ack_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    normalize_ack_time(at).to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a wire timestamp. Anything that is not RFC 3339 yields `None`.
///
/// Offsets and fractional seconds are accepted. The date/time separator must
/// be an uppercase `T` and a zero offset an uppercase `Z`; chrono alone would
/// also take a space or lowercase letters.
pub fn parse_ack_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if value.as_bytes().get(10) != Some(&b'T') || value.contains(['t', 'z']) {
        return None;
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
