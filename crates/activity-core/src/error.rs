use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the activity statistics crates.
#[derive(Error, Debug)]
pub enum ActivityError {
    /// A file could not be opened or read from disk.
    #[error("Error reading file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader or writer rejected the data.
    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The input file has no header row.
    #[error("No columns to parse from file {0}")]
    EmptyInput(PathBuf),

    /// A data row carries more fields than the header declares.
    #[error("Malformed row at line {line}: expected {expected} fields, saw {found}")]
    MalformedRow {
        line: u64,
        expected: usize,
        found: usize,
    },

    /// A column was requested that the table does not declare.
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    /// A date argument could not be parsed.
    #[error("'{0}' is not a valid date. Please use YYYY-MM-DD.")]
    InvalidDate(String),

    /// The start of a date range lies after its end.
    #[error("Start date must be before or equal to end date ({start} > {end}).")]
    InvalidDateRange { start: String, end: String },

    /// A minimum duration below zero was requested.
    #[error("Minimum duration cannot be negative (got {0}).")]
    NegativeDuration(f64),

    /// A minimum duration that is NaN or infinite was requested.
    #[error("Minimum duration must be a finite number (got {0}).")]
    InvalidDuration(f64),

    /// The export target is neither `.csv` nor `.txt`.
    #[error("Export file must be .csv or .txt: {0}")]
    InvalidExportExtension(PathBuf),

    /// Writing the export file failed.
    #[error("Error exporting file {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: Box<ActivityError>,
    },

    /// A summary could not be serialised.
    #[error("Failed to serialise JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the activity crates.
pub type Result<T> = std::result::Result<T, ActivityError>;
