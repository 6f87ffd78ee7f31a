//! PostgreSQL value decoding.
//!
//! Statements run over the simple-query protocol, so the server sends every
//! value in its text form and the tool renders it exactly as `psql` would:
//! `bytea` as `\x..` hex, booleans as `t`/`f`, numerics with their scale.

use sqlx::postgres::PgRow;
use sqlx::{Row, ValueRef};

/// One decoded cell. `None` is SQL NULL.
pub type CellValue = Option<String>;

/// Trait for converting database rows to text cells.
pub trait RowToText {
    fn to_cells(&self) -> Vec<CellValue>;
}

impl RowToText for PgRow {
    fn to_cells(&self) -> Vec<CellValue> {
        (0..self.len()).map(|idx| decode_cell(self, idx)).collect()
    }
}

fn decode_cell(row: &PgRow, idx: usize) -> CellValue {
    let raw = match row.try_get_raw(idx) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::error!(column = idx, error = %e, "Failed to read column");
            return None;
        }
    };

    if raw.is_null() {
        return None;
    }

    match raw.as_bytes() {
        Ok(bytes) => Some(decode_text(bytes)),
        Err(e) => {
            tracing::error!(column = idx, error = %e, "Failed to read column bytes");
            None
        }
    }
}

/// Text-format value as a `String`; invalid UTF-8 is replaced, not rejected.
pub fn decode_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_keeps_server_rendering() {
        assert_eq!(decode_text(b"\\x41"), "\\x41");
        assert_eq!(decode_text(b"10.50"), "10.50");
        assert_eq!(decode_text(b"t"), "t");
    }

    #[test]
    fn test_decode_text_replaces_invalid_utf8() {
        assert_eq!(decode_text(&[b'a', 0xFF, b'b']), "a\u{FFFD}b");
    }
}
