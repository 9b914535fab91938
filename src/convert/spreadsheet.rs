//! XLSX workbook to flat comma-separated text.
//!
//! Cells are joined with `,` as displayed; embedded commas, quotes and
//! newlines are not escaped. Sheets follow workbook order with no marker
//! between them. Every sheet is emitted from cell A1, so blank leading rows
//! become empty lines and blank leading columns become empty fields.

use crate::error::{ConvertError, ConvertResult};
use calamine::{Data, Reader, Xlsx, XlsxError, open_workbook_from_rs};
use std::io::Cursor;
use tracing::debug;

pub fn spreadsheet_to_csv(input: &[u8]) -> ConvertResult<Vec<u8>> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(input))
        .map_err(|e: XlsxError| ConvertError::Parse(e.to_string()))?;

    let mut out = String::new();
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| ConvertError::Parse(format!("sheet '{}': {}", name, e)))?;

        // The range starts at the first non-empty cell, not at A1.
        let Some((first_row, first_col)) = range.start() else {
            debug!("Sheet '{}' is empty", name);
            continue;
        };
        debug!(
            "Sheet '{}': {} rows from ({}, {})",
            name,
            range.height(),
            first_row,
            first_col
        );

        for _ in 0..first_row {
            out.push('\n');
        }
        let padding = ",".repeat(first_col as usize);
        for row in range.rows() {
            out.push_str(&padding);
            out.push_str(&join_row(row));
            out.push('\n');
        }
    }

    Ok(out.into_bytes())
}

fn join_row(row: &[Data]) -> String {
    row.iter()
        .map(|cell| cell.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
