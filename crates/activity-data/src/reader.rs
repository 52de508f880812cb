//! CSV loading for activity logs.
//!
//! Reads a comma-separated file with a header row into an [`ActivityTable`]
//! whose cells are raw text or `Missing`. Type coercion happens later, in the
//! normalizer or in the individual row filters.

use std::path::Path;

use activity_core::error::{ActivityError, Result};
use activity_core::models::{ActivityTable, Value};
use tracing::debug;

// ── Public API ────────────────────────────────────────────────────────────────

/// Load `path` into a raw [`ActivityTable`].
///
/// * Missing or unreadable file → [`ActivityError::FileRead`].
/// * No header row → [`ActivityError::EmptyInput`].
/// * A row wider than the header → [`ActivityError::MalformedRow`].
/// * A row narrower than the header is padded with `Missing`.
pub fn load_table(path: &Path) -> Result<ActivityTable> {
    let file = std::fs::File::open(path).map_err(|source| ActivityError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let table = read_table(file).map_err(|e| match e {
        ActivityError::EmptyInput(_) => ActivityError::EmptyInput(path.to_path_buf()),
        other => other,
    })?;

    debug!(
        "Loaded {} rows with {} columns from {}",
        table.len(),
        table.columns().len(),
        path.display()
    );
    Ok(table)
}

/// Parse CSV text from any reader. Used by [`load_table`] and by tests that
/// have the data in memory.
pub fn read_table<R: std::io::Read>(source: R) -> Result<ActivityTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if columns.is_empty() || columns.iter().all(String::is_empty) {
        return Err(ActivityError::EmptyInput(Default::default()));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() > columns.len() {
            return Err(ActivityError::MalformedRow {
                line: record.position().map(|p| p.line()).unwrap_or(0),
                expected: columns.len(),
                found: record.len(),
            });
        }
        rows.push(record.iter().map(Value::from_raw).collect());
    }

    Ok(ActivityTable::new(columns, rows))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_csv(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{}", content).unwrap();
        path
    }

    // ── load_table ────────────────────────────────────────────────────────────

    #[test]
    fn test_load_table_basic() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(
            dir.path(),
            "input.csv",
            "user_id,username,login_date\n1,alice,2024-01-01\n2,bob,2024-01-02\n",
        );

        let table = load_table(&path).unwrap();
        assert_eq!(table.columns(), &["user_id", "username", "login_date"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1][1], Value::Text("bob".to_string()));
    }

    #[test]
    fn test_load_table_missing_file() {
        let err = load_table(Path::new("/tmp/does-not-exist-activity-test.csv")).unwrap_err();
        assert!(matches!(err, ActivityError::FileRead { .. }));
    }

    #[test]
    fn test_load_table_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "empty.csv", "");
        match load_table(&path).unwrap_err() {
            ActivityError::EmptyInput(p) => assert_eq!(p, path),
            other => panic!("expected EmptyInput, got {:?}", other),
        }
    }

    #[test]
    fn test_load_table_header_only() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "header.csv", "username,activity_type\n");
        let table = load_table(&path).unwrap();
        assert!(table.is_empty());
        assert!(table.has_column("activity_type"));
    }

    // ── read_table ────────────────────────────────────────────────────────────

    #[test]
    fn test_read_table_empty_cells_are_missing() {
        let table = read_table("user_id,username\n,alice\n3,\n".as_bytes()).unwrap();
        assert_eq!(table.rows()[0][0], Value::Missing);
        assert_eq!(table.rows()[1][1], Value::Missing);
    }

    #[test]
    fn test_read_table_short_rows_padded() {
        let table = read_table("a,b,c\n1,2\n".as_bytes()).unwrap();
        assert_eq!(table.rows()[0].len(), 3);
        assert_eq!(table.rows()[0][2], Value::Missing);
    }

    #[test]
    fn test_read_table_long_row_rejected() {
        let err = read_table("a,b\n1,2,3\n".as_bytes()).unwrap_err();
        match err {
            ActivityError::MalformedRow { line, expected, found } => {
                assert_eq!(line, 2);
                assert_eq!(expected, 2);
                assert_eq!(found, 3);
            }
            other => panic!("expected MalformedRow, got {:?}", other),
        }
    }

    #[test]
    fn test_read_table_trims_whitespace() {
        let table = read_table("username , activity_type\n alice , login \n".as_bytes()).unwrap();
        assert_eq!(table.columns(), &["username", "activity_type"]);
        assert_eq!(table.rows()[0][0], Value::Text("alice".to_string()));
    }

    #[test]
    fn test_read_table_quoted_commas() {
        let table = read_table("username,activity_type\nalice,\"click, scroll\"\n".as_bytes()).unwrap();
        assert_eq!(table.rows()[0][1], Value::Text("click, scroll".to_string()));
    }

    #[test]
    fn test_read_table_extra_columns_pass_through() {
        let table = read_table("username,device\nalice,mobile\n".as_bytes()).unwrap();
        assert_eq!(table.column("device").unwrap().next(), Some(&Value::Text("mobile".to_string())));
    }
}
