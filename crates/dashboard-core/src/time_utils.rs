use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveDateTime};
use tracing::debug;

// ── Timestamp parsing ─────────────────────────────────────────────────────────

/// Naive date-time patterns accepted for `order_purchase_timestamp`, tried in
/// order after RFC 3339.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

/// Parse an order timestamp string.
///
/// Handles RFC 3339 (offset timestamps keep their local wall-clock time and
/// the offset is dropped), the common `YYYY-MM-DD HH:MM:SS` family, and bare dates, which
/// resolve to midnight. Returns `None` for empty or unrecognised input.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    debug!("could not parse timestamp \"{}\"", s);
    None
}

// ── Calendar helpers ──────────────────────────────────────────────────────────

/// Calendar-month key for a timestamp, e.g. `"2018-03"`.
pub fn month_key(ts: &NaiveDateTime) -> String {
    format!("{:04}-{:02}", ts.year(), ts.month())
}

/// Whole days between the calendar dates of `later` and `earlier`.
/// Time of day is discarded before subtracting.
pub fn days_between(later: &NaiveDateTime, earlier: &NaiveDateTime) -> i64 {
    (later.date() - earlier.date()).num_days()
}

/// Move `date` by `days` (negative moves backwards). Saturates at the ends of
/// chrono's representable range.
pub fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    let magnitude = Days::new(days.unsigned_abs());
    let shifted = if days >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    };
    shifted.unwrap_or(date)
}

/// Move `date` by whole calendar months. The day is clamped to the length of
/// the target month (Jan 31 + 1 month = Feb 28/29).
pub fn shift_months(date: NaiveDate, months: i32) -> NaiveDate {
    let magnitude = Months::new(months.unsigned_abs());
    let shifted = if months >= 0 {
        date.checked_add_months(magnitude)
    } else {
        date.checked_sub_months(magnitude)
    };
    shifted.unwrap_or(date)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
