//! Console rendering for tables and statistics.

use crate::models::{ActivityTable, Value};

/// Placeholder printed for missing cells.
pub const MISSING_MARKER: &str = "NaN";

/// Format a number with thousands separators and a fixed number of decimals.
///
/// # Examples
///
/// ```
/// use activity_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5, 1), "1,234.5");
/// assert_eq!(format_number(15.0, 2), "15.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let formatted = format!("{:.prec$}", value.abs(), prec = decimals as usize);
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut out = String::new();
    if value < 0.0 && formatted.chars().any(|c| c != '0' && c != '.') {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Render a cell for the console; missing cells show [`MISSING_MARKER`].
pub fn format_cell(value: &Value) -> String {
    match value {
        Value::Missing => MISSING_MARKER.to_string(),
        other => other.to_string(),
    }
}

/// Render `table` as fixed-width text with a header line and no row index.
///
/// Each column is right-aligned to the widest of its header and cells, and
/// columns are separated by a single space.
pub fn render_table(table: &ActivityTable) -> String {
    let cells: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| row.iter().map(format_cell).collect())
        .collect();

    let widths: Vec<usize> = table
        .columns()
        .iter()
        .enumerate()
        .map(|(i, name)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(cells.len() + 1);
    lines.push(join_aligned(table.columns(), &widths));
    for row in &cells {
        lines.push(join_aligned(row, &widths));
    }
    lines.join("\n")
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn join_aligned(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{:>w$}", cell, w = w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
