//! Row filters: date range, minimum duration, and username.
//!
//! Each filter validates its own arguments at construction, so an invalid
//! request fails before any file is opened. Applying a filter coerces its
//! one required column, keeps the matching rows, and returns a new table.

use std::path::Path;

use activity_core::data_processors::{DateProcessor, NumberProcessor};
use activity_core::error::{ActivityError, Result};
use activity_core::models::{ActivityTable, Value, LOGIN_DATE, SESSION_DURATION, USERNAME};
use chrono::NaiveDate;
use tracing::debug;

use crate::reader::load_table;

// ── RowFilter ─────────────────────────────────────────────────────────────────

/// A single-column predicate over an [`ActivityTable`].
pub trait RowFilter {
    /// The column the predicate reads. Absence is an error.
    fn required_column(&self) -> &'static str;

    /// Coerce a raw cell before matching. The coerced value replaces the
    /// original in the output table.
    fn coerce(&self, value: &Value) -> Value {
        value.clone()
    }

    /// Whether a coerced cell selects its row. Missing cells never match.
    fn matches(&self, value: &Value) -> bool;

    /// Console message for a run that selected nothing.
    fn no_match_message(&self) -> String;

    /// Select the matching rows of `table`.
    fn apply(&self, table: &ActivityTable) -> Result<ActivityTable> {
        let column = self.required_column();
        let coerced = table.map_column(column, |v| self.coerce(v))?;
        let idx = coerced.column_index(column)?;
        let selected = coerced.select(|row| self.matches(&row[idx]));
        debug!(
            "Filter on '{}' kept {} of {} rows",
            column,
            selected.len(),
            table.len()
        );
        Ok(selected)
    }
}

/// Result of running a filter over a file.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    /// Rows in the loaded source, before filtering.
    pub source_rows: usize,
    /// The selected rows.
    pub matched: ActivityTable,
}

impl FilterOutcome {
    /// True when the source itself had no rows, as opposed to rows that
    /// all failed the predicate.
    pub fn source_was_empty(&self) -> bool {
        self.source_rows == 0
    }
}

/// Load `path` and apply `filter` to it.
pub fn filter_file(filter: &dyn RowFilter, path: &Path) -> Result<FilterOutcome> {
    let table = load_table(path)?;
    let matched = filter.apply(&table)?;
    Ok(FilterOutcome {
        source_rows: table.len(),
        matched,
    })
}

// ── DateRangeFilter ───────────────────────────────────────────────────────────

/// Keeps rows whose `login_date` lies in `[start, end]`.
#[derive(Debug, Clone)]
pub struct DateRangeFilter {
    start: NaiveDate,
    end: NaiveDate,
    start_raw: String,
    end_raw: String,
}

impl DateRangeFilter {
    /// Parse both bounds. Fails on an unparseable bound or when
    /// `start > end`.
    pub fn new(start: &str, end: &str) -> Result<Self> {
        let start_date = DateProcessor::parse_str(start)
            .ok_or_else(|| ActivityError::InvalidDate(start.to_string()))?;
        let end_date = DateProcessor::parse_str(end)
            .ok_or_else(|| ActivityError::InvalidDate(end.to_string()))?;

        if start_date > end_date {
            return Err(ActivityError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        Ok(Self {
            start: start_date,
            end: end_date,
            start_raw: start.to_string(),
            end_raw: end.to_string(),
        })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

impl RowFilter for DateRangeFilter {
    fn required_column(&self) -> &'static str {
        LOGIN_DATE
    }

    fn coerce(&self, value: &Value) -> Value {
        DateProcessor::coerce(value)
    }

    fn matches(&self, value: &Value) -> bool {
        value
            .as_date()
            .is_some_and(|d| self.start <= d && d <= self.end)
    }

    fn no_match_message(&self) -> String {
        format!(
            "No sessions found between {} and {}.",
            self.start_raw, self.end_raw
        )
    }
}

// ── DurationFilter ────────────────────────────────────────────────────────────

/// Keeps rows whose `session_duration` is at least `min_duration`.
#[derive(Debug, Clone)]
pub struct DurationFilter {
    min_duration: f64,
}

impl DurationFilter {
    /// Fails when `min_duration` is negative or not a finite number.
    pub fn new(min_duration: f64) -> Result<Self> {
        if !min_duration.is_finite() {
            return Err(ActivityError::InvalidDuration(min_duration));
        }
        if min_duration < 0.0 {
            return Err(ActivityError::NegativeDuration(min_duration));
        }
        Ok(Self { min_duration })
    }

    pub fn min_duration(&self) -> f64 {
        self.min_duration
    }
}

impl RowFilter for DurationFilter {
    fn required_column(&self) -> &'static str {
        SESSION_DURATION
    }

    fn coerce(&self, value: &Value) -> Value {
        NumberProcessor::coerce(value)
    }

    fn matches(&self, value: &Value) -> bool {
        value.as_number().is_some_and(|d| d >= self.min_duration)
    }

    fn no_match_message(&self) -> String {
        format!("No sessions found with duration >= {}.", self.min_duration)
    }
}

// ── UsernameFilter ────────────────────────────────────────────────────────────

/// Keeps rows whose `username` equals the target, ignoring case.
///
/// The column is compared as read; missing cells never match.
#[derive(Debug, Clone)]
pub struct UsernameFilter {
    target: String,
    target_folded: String,
}

impl UsernameFilter {
    pub fn new(target: &str) -> Self {
        Self {
            target: target.to_string(),
            target_folded: target.to_lowercase(),
        }
    }
}

impl RowFilter for UsernameFilter {
    fn required_column(&self) -> &'static str {
        USERNAME
    }

    fn matches(&self, value: &Value) -> bool {
        value
            .as_text()
            .is_some_and(|name| name.to_lowercase() == self.target_folded)
    }

    fn no_match_message(&self) -> String {
        format!("No records found for username '{}'.", self.target)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sessions() -> ActivityTable {
        ActivityTable::from_strings(
            &["user_id", "username", "login_date", "session_duration"],
            &[
                &["1", "alice", "2024-01-01", "10"],
                &["2", "Bob", "2024-01-02", "45"],
                &["3", "ALICE", "2024-01-03", "abc"],
                &["4", "", "not-a-date", "30"],
            ],
        )
    }

    // ── DateRangeFilter ───────────────────────────────────────────────────────

    #[test]
    fn test_date_range_inclusive_bounds() {
        let filter = DateRangeFilter::new("2024-01-01", "2024-01-02").unwrap();
        let result = filter.apply(&sessions()).unwrap();
        let dates: Vec<Value> = result.column(LOGIN_DATE).unwrap().cloned().collect();
        assert_eq!(
            dates,
            vec![Value::Date(ymd(2024, 1, 1)), Value::Date(ymd(2024, 1, 2))]
        );
    }

    #[test]
    fn test_date_range_unparseable_rows_excluded() {
        let filter = DateRangeFilter::new("2000-01-01", "2100-01-01").unwrap();
        let result = filter.apply(&sessions()).unwrap();
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_date_range_start_after_end() {
        let err = DateRangeFilter::new("2024-02-01", "2024-01-01").unwrap_err();
        assert!(matches!(err, ActivityError::InvalidDateRange { .. }));
    }

    #[test]
    fn test_date_range_same_day_allowed() {
        let filter = DateRangeFilter::new("2024-01-02", "2024-01-02").unwrap();
        assert_eq!(filter.apply(&sessions()).unwrap().len(), 1);
    }

    #[test]
    fn test_date_range_invalid_start() {
        match DateRangeFilter::new("2024-13-01", "2024-01-01").unwrap_err() {
            ActivityError::InvalidDate(s) => assert_eq!(s, "2024-13-01"),
            other => panic!("expected InvalidDate, got {:?}", other),
        }
    }

    #[test]
    fn test_date_range_invalid_end() {
        match DateRangeFilter::new("2024-01-01", "yesterday").unwrap_err() {
            ActivityError::InvalidDate(s) => assert_eq!(s, "yesterday"),
            other => panic!("expected InvalidDate, got {:?}", other),
        }
    }

    #[test]
    fn test_date_range_missing_column() {
        let table = ActivityTable::from_strings(&["username"], &[&["alice"]]);
        let filter = DateRangeFilter::new("2024-01-01", "2024-01-02").unwrap();
        assert!(matches!(
            filter.apply(&table).unwrap_err(),
            ActivityError::ColumnNotFound(c) if c == LOGIN_DATE
        ));
    }

    #[test]
    fn test_date_range_no_match_is_empty_not_error() {
        let filter = DateRangeFilter::new("1999-01-01", "1999-12-31").unwrap();
        let result = filter.apply(&sessions()).unwrap();
        assert!(result.is_empty());
        assert_eq!(
            filter.no_match_message(),
            "No sessions found between 1999-01-01 and 1999-12-31."
        );
    }

    #[test]
    fn test_date_range_fails_before_file_access() {
        let missing = Path::new("/tmp/never-created-activity-input.csv");
        let err = DateRangeFilter::new("2024-02-01", "2024-01-01")
            .and_then(|f| filter_file(&f, missing))
            .unwrap_err();
        assert!(matches!(err, ActivityError::InvalidDateRange { .. }));
    }

    // ── DurationFilter ────────────────────────────────────────────────────────

    #[test]
    fn test_duration_threshold_inclusive() {
        let filter = DurationFilter::new(30.0).unwrap();
        let result = filter.apply(&sessions()).unwrap();
        let durations: Vec<f64> = result
            .column(SESSION_DURATION)
            .unwrap()
            .filter_map(Value::as_number)
            .collect();
        assert_eq!(durations, vec![45.0, 30.0]);
    }

    #[test]
    fn test_duration_zero_keeps_all_numeric() {
        let filter = DurationFilter::new(0.0).unwrap();
        assert_eq!(filter.apply(&sessions()).unwrap().len(), 3);
    }

    #[test]
    fn test_duration_negative_rejected() {
        let err = DurationFilter::new(-1.0).unwrap_err();
        assert!(matches!(err, ActivityError::NegativeDuration(d) if d == -1.0));
    }

    #[test]
    fn test_duration_non_finite_rejected() {
        for min in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(
                matches!(
                    DurationFilter::new(min),
                    Err(ActivityError::InvalidDuration(_))
                ),
                "{min} should be rejected"
            );
        }
    }

    #[test]
    fn test_duration_missing_column() {
        let table = ActivityTable::from_strings(&["username"], &[&["alice"]]);
        let filter = DurationFilter::new(1.0).unwrap();
        assert!(matches!(
            filter.apply(&table).unwrap_err(),
            ActivityError::ColumnNotFound(_)
        ));
    }

    #[test]
    fn test_duration_no_match_message() {
        let filter = DurationFilter::new(10.0).unwrap();
        assert_eq!(
            filter.no_match_message(),
            "No sessions found with duration >= 10."
        );
    }

    // ── UsernameFilter ────────────────────────────────────────────────────────

    #[test]
    fn test_username_case_insensitive() {
        let filter = UsernameFilter::new("Alice");
        let result = filter.apply(&sessions()).unwrap();
        let ids: Vec<String> = result
            .column("user_id")
            .unwrap()
            .map(|v| v.to_string())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_username_exact_not_substring() {
        let filter = UsernameFilter::new("ali");
        assert!(filter.apply(&sessions()).unwrap().is_empty());
    }

    #[test]
    fn test_username_missing_never_matches() {
        let filter = UsernameFilter::new("");
        assert!(!filter.matches(&Value::Missing));
        assert!(filter.apply(&sessions()).unwrap().is_empty());
    }

    #[test]
    fn test_username_keeps_raw_columns() {
        let filter = UsernameFilter::new("bob");
        let result = filter.apply(&sessions()).unwrap();
        assert_eq!(result.rows()[0][2], Value::Text("2024-01-02".to_string()));
    }

    #[test]
    fn test_username_missing_column() {
        let table = ActivityTable::from_strings(&["user_id"], &[&["1"]]);
        assert!(UsernameFilter::new("alice").apply(&table).is_err());
    }

    // ── filter_file ───────────────────────────────────────────────────────────

    #[test]
    fn test_filter_file_missing_source() {
        let filter = UsernameFilter::new("alice");
        let err = filter_file(&filter, Path::new("/tmp/never-created-activity-input.csv"))
            .unwrap_err();
        assert!(matches!(err, ActivityError::FileRead { .. }));
    }
}
