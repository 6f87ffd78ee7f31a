//! Output formatting shared by the command handlers.
//!
//! Agents receive results as plain text: one line per row, values separated by
//! `", "`. A single-column result is rendered as the bare values.

use crate::db::CellValue;

/// Text rendered for SQL NULL.
pub const NULL_TEXT: &str = "NULL";

pub fn format_cell(value: &CellValue) -> &str {
    value.as_deref().unwrap_or(NULL_TEXT)
}

/// Render one row. Single-column rows become the bare value.
pub fn format_row(row: &[CellValue]) -> String {
    match row {
        [single] => format_cell(single).to_string(),
        _ => row.iter().map(format_cell).collect::<Vec<_>>().join(", "),
    }
}

/// Render a result set as newline-separated rows. No rows yields an empty string.
pub fn flatten_rows(rows: &[Vec<CellValue>]) -> String {
    rows.iter()
        .map(|row| format_row(row))
        .collect::<Vec<_>>()
        .join("\n")
}
