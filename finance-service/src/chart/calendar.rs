//! Calendar-date normalization for imported fee rows.
//!
//! Fee tables were migrated from the legacy application, which stored dates
//! as strings in a handful of shapes. Every date comparison in the chart
//! pipeline goes through this one parser so the bucketer and the classifier
//! cannot drift apart on date semantics.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse a raw textual date into a calendar day.
///
/// Accepts RFC 3339 timestamps (the common case in migrated rows),
/// `YYYY-MM-DD`, and `YYYY-MM-DD HH:MM:SS`. Returns `None` for anything
/// else; callers treat that as a data-quality fault, not a request error.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.date())
}
