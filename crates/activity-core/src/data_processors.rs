use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::models::{ActivityTable, Value, LOGIN_DATE, SESSION_DURATION};

// ── DateProcessor ─────────────────────────────────────────────────────────────

/// Parses calendar dates from the variety of forms found in activity logs.
pub struct DateProcessor;

impl DateProcessor {
    /// Parse a date string, discarding any time-of-day component.
    ///
    /// Handles RFC 3339, ISO-8601 date-times with `T` or space separators
    /// (optionally fractional seconds), and the date-only forms
    /// `YYYY-MM-DD`, `YYYY/MM/DD`, `MM/DD/YYYY`.
    pub fn parse_str(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.date_naive());
        }

        const DATETIME_FORMATS: &[&str] = &[
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%d %H:%M",
        ];
        for fmt in DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive.date());
            }
        }

        const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return Some(date);
            }
        }

        debug!("could not parse date \"{}\"", s);
        None
    }

    /// Coerce a cell to `Value::Date`, or `Value::Missing` if it will not parse.
    pub fn coerce(value: &Value) -> Value {
        match value {
            Value::Date(d) => Value::Date(*d),
            Value::Text(s) => Self::parse_str(s).map_or(Value::Missing, Value::Date),
            Value::Number(_) | Value::Missing => Value::Missing,
        }
    }
}

// ── NumberProcessor ───────────────────────────────────────────────────────────

/// Coerces cells to finite numbers.
pub struct NumberProcessor;

impl NumberProcessor {
    /// Parse a finite `f64`. `nan` and infinities are rejected.
    pub fn parse_str(s: &str) -> Option<f64> {
        s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
    }

    /// Coerce a cell to `Value::Number`, or `Value::Missing` if it will not parse.
    pub fn coerce(value: &Value) -> Value {
        match value {
            Value::Number(n) => Value::Number(*n),
            Value::Text(s) => Self::parse_str(s).map_or(Value::Missing, Value::Number),
            Value::Date(_) | Value::Missing => Value::Missing,
        }
    }
}

// ── Normalizer ────────────────────────────────────────────────────────────────

/// Return a copy of `table` with `login_date` coerced to dates and
/// `session_duration` coerced to numbers.
///
/// Absent columns stay absent and no row is ever dropped. Applying it twice
/// gives the same table as applying it once.
pub fn normalize(table: &ActivityTable) -> ActivityTable {
    let mut out = table.clone();
    if let Ok(t) = out.map_column(LOGIN_DATE, DateProcessor::coerce) {
        out = t;
    }
    if let Ok(t) = out.map_column(SESSION_DURATION, NumberProcessor::coerce) {
        out = t;
    }
    out
}

// ── Tests ──────────────────────────────────────────────────────────────────────
