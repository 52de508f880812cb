use chrono::NaiveDate;
use std::fmt;

use crate::error::{ActivityError, Result};

/// Column holding the opaque user identifier.
pub const USER_ID: &str = "user_id";
/// Column holding the username used for grouping and search.
pub const USERNAME: &str = "username";
/// Column holding the login calendar date.
pub const LOGIN_DATE: &str = "login_date";
/// Column holding the numeric session duration.
pub const SESSION_DURATION: &str = "session_duration";
/// Column holding the free-form activity label.
pub const ACTIVITY_TYPE: &str = "activity_type";

/// A single cell of an [`ActivityTable`].
///
/// Raw loads only produce `Missing` and `Text`; the normalizer replaces text
/// in the date and duration columns with `Date` / `Number`, or with `Missing`
/// when the text does not parse.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent or unparseable.
    Missing,
    /// Raw text as read from the source.
    Text(String),
    /// A calendar date.
    Date(NaiveDate),
    /// A finite number.
    Number(f64),
}

impl Value {
    /// Build a cell from raw source text. Empty text becomes `Missing`.
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Value::Missing
        } else {
            Value::Text(trimmed.to_string())
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// Dates render as `YYYY-MM-DD`, numbers with Rust's shortest round-trip
/// form (`10`, `12.5`), and `Missing` as the empty string.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => Ok(()),
            Value::Text(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Value::Number(n) => write!(f, "{}", n),
        }
    }
}

/// An ordered set of activity records sharing one column schema.
///
/// Every row has exactly `columns.len()` cells. Computations never mutate a
/// table; filters and the normalizer build new ones.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActivityTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl ActivityTable {
    /// Build a table, padding short rows with `Missing` and dropping cells
    /// past the schema width. Callers that need strict width checks do them
    /// beforehand.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Value::Missing);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Convenience constructor for tests and fixtures: every non-empty
    /// string becomes `Value::Text`.
    pub fn from_strings(columns: &[&str], rows: &[&[&str]]) -> Self {
        Self::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|cell| Value::from_raw(cell)).collect())
                .collect(),
        )
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Position of `name` in the schema.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| ActivityError::ColumnNotFound(name.to_string()))
    }

    /// Iterate the cells of one column in row order.
    pub fn column(&self, name: &str) -> Result<impl Iterator<Item = &Value> + '_> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Return a new table whose `name` column has every cell replaced by
    /// `f(cell)`. Other columns are cloned unchanged.
    pub fn map_column(&self, name: &str, f: impl Fn(&Value) -> Value) -> Result<Self> {
        let idx = self.column_index(name)?;
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut row = row.clone();
                row[idx] = f(&row[idx]);
                row
            })
            .collect();
        Ok(Self {
            columns: self.columns.clone(),
            rows,
        })
    }

    /// Return a new table holding only the rows for which `keep` is true.
    pub fn select(&self, keep: impl Fn(&[Value]) -> bool) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }
}
