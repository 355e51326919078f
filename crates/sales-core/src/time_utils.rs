use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::{Result, SalesError};

/// Date-time layouts tried, in order, before the date-only layouts.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Date-only layouts. Slashed day/month forms are read month-first, falling
/// back to day-first only when month-first is impossible (`25/01/2021`).
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%b-%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
];

/// Parse a free-form date string into a calendar date.
///
/// Time-of-day and UTC offsets are discarded; the date is taken as written
/// (an offset timestamp keeps its local calendar day). Returns `None` for
/// empty or unrecognised input.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    // RFC 3339 first so that offsets like `+05:00` or a trailing `Z` parse.
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.date());
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    parse_compact(s)
}

/// Parse the configured reference date, which must be an ISO `YYYY-MM-DD`
/// calendar date.
pub fn parse_reference_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| SalesError::InvalidReferenceDate(raw.to_string()))
}

/// `YYYYMMDD` with no separators. Handled by hand because `%Y` would swallow
/// all eight digits.
fn parse_compact(s: &str) -> Option<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year = s[..4].parse().ok()?;
    let month = s[4..6].parse().ok()?;
    let day = s[6..].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
