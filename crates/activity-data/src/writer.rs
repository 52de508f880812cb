//! Export of filtered tables to delimited text files.

use std::path::{Path, PathBuf};

use activity_core::error::{ActivityError, Result};
use activity_core::models::ActivityTable;
use tracing::debug;

/// Delimiter choice for an export file, decided by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// `.csv` – comma separated.
    Csv,
    /// `.txt` – tab separated.
    Tsv,
}

impl ExportFormat {
    /// A file name ending `.csv` → [`ExportFormat::Csv`], ending `.txt` →
    /// [`ExportFormat::Tsv`]; anything else is
    /// [`ActivityError::InvalidExportExtension`].
    ///
    /// Matches on the name suffix, so a bare `.csv` is accepted.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if name.ends_with(".csv") {
            Ok(ExportFormat::Csv)
        } else if name.ends_with(".txt") {
            Ok(ExportFormat::Tsv)
        } else {
            Err(ActivityError::InvalidExportExtension(path.to_path_buf()))
        }
    }

    pub fn delimiter(self) -> u8 {
        match self {
            ExportFormat::Csv => b',',
            ExportFormat::Tsv => b'\t',
        }
    }
}

/// A validated export destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
    pub path: PathBuf,
    pub format: ExportFormat,
}

impl ExportTarget {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let format = ExportFormat::from_path(&path)?;
        Ok(Self { path, format })
    }

    /// Write `table` here. See [`export_table`].
    pub fn write(&self, table: &ActivityTable) -> Result<()> {
        export_table(table, &self.path, self.format)
    }
}

/// Write `table` with a header row to `path`, replacing any existing file.
///
/// Missing cells are written as empty fields and dates as `YYYY-MM-DD`.
/// Failures are wrapped in [`ActivityError::Export`]; a partially written
/// file is left as is.
pub fn export_table(table: &ActivityTable, path: &Path, format: ExportFormat) -> Result<()> {
    write_delimited(table, path, format).map_err(|e| ActivityError::Export {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;
    debug!("Exported {} rows to {}", table.len(), path.display());
    Ok(())
}

fn write_delimited(table: &ActivityTable, path: &Path, format: ExportFormat) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(format.delimiter())
        .from_path(path)?;
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
