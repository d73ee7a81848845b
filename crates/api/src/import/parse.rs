//! Spreadsheet byte parsing: CSV / XLSX -> untyped raw rows.
//!
//! Both parsers produce the same shape: the header row as an ordered list
//! of trimmed strings, and one [`RawRow`] per non-blank data line. Cell
//! typing is preserved where the format supports it (XLSX numbers and
//! booleans); everything downstream of this module is format-agnostic.
//!
//! Only the first worksheet of an XLSX workbook is read; multi-sheet
//! imports are not supported.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use csv::ReaderBuilder;
use scalebook_core::error::CoreError;
use scalebook_core::import::{CellValue, RawRow, CSV_CONTENT_TYPES, XLSX_CONTENT_TYPE};

/// The result of parsing an uploaded spreadsheet.
#[derive(Debug, Clone)]
pub struct ParsedSheet {
    /// Header row, in column order.
    pub headers: Vec<String>,
    /// One raw row per non-blank data line.
    pub rows: Vec<RawRow>,
}

/// Supported spreadsheet formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetKind {
    Csv,
    Xlsx,
}

/// Determine the spreadsheet format from the upload's content type, falling
/// back to the filename extension for generic or missing content types.
///
/// Returns `None` for unsupported uploads.
pub fn detect_kind(content_type: Option<&str>, filename: &str) -> Option<SpreadsheetKind> {
    if let Some(ct) = content_type {
        // Strip any parameters (e.g. "text/csv; charset=utf-8").
        let base = ct.split(';').next().unwrap_or(ct).trim().to_lowercase();
        if CSV_CONTENT_TYPES.contains(&base.as_str()) {
            return Some(SpreadsheetKind::Csv);
        }
        if base == XLSX_CONTENT_TYPE {
            return Some(SpreadsheetKind::Xlsx);
        }
        if base != "application/octet-stream" {
            return None;
        }
        // Generic content type: fall through to the extension.
    }

    let lower = filename.to_lowercase();
    if lower.ends_with(".csv") {
        Some(SpreadsheetKind::Csv)
    } else if lower.ends_with(".xlsx") {
        Some(SpreadsheetKind::Xlsx)
    } else {
        None
    }
}

/// Parse uploaded bytes into headers and raw rows.
pub fn parse_spreadsheet(kind: SpreadsheetKind, bytes: &[u8]) -> Result<ParsedSheet, CoreError> {
    match kind {
        SpreadsheetKind::Csv => parse_csv(bytes),
        SpreadsheetKind::Xlsx => parse_xlsx(bytes),
    }
}

fn parse_csv(bytes: &[u8]) -> Result<ParsedSheet, CoreError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // tolerate uneven row lengths
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| CoreError::Validation(format!("Failed to parse CSV file: {e}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record =
            result.map_err(|e| CoreError::Validation(format!("Failed to parse CSV file: {e}")))?;

        let mut row = RawRow::new();
        for (col_idx, value) in record.iter().enumerate() {
            let Some(header) = headers.get(col_idx) else {
                continue;
            };
            let trimmed = value.trim();
            let cell = if trimmed.is_empty() {
                CellValue::Blank
            } else {
                CellValue::Text(trimmed.to_string())
            };
            row.insert(header.clone(), cell);
        }

        if is_blank_row(&row) {
            continue;
        }
        rows.push(row);
    }

    Ok(ParsedSheet { headers, rows })
}

fn parse_xlsx(bytes: &[u8]) -> Result<ParsedSheet, CoreError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))
        .map_err(|e| CoreError::Validation(format!("Failed to parse XLSX file: {e}")))?;

    let sheet_names = workbook.sheet_names();
    let Some(sheet_name) = sheet_names.first().cloned() else {
        return Err(CoreError::Validation(
            "XLSX workbook contains no sheets".to_string(),
        ));
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| CoreError::Validation(format!("Failed to parse XLSX file: {e}")))?;

    let mut sheet_rows = range.rows();
    let Some(header_row) = sheet_rows.next() else {
        return Err(CoreError::Validation("No data found".to_string()));
    };

    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for data_row in sheet_rows {
        let mut row = RawRow::new();
        for (col_idx, cell) in data_row.iter().enumerate() {
            let Some(header) = headers.get(col_idx) else {
                continue;
            };
            row.insert(header.clone(), convert_cell(cell));
        }

        if is_blank_row(&row) {
            continue;
        }
        rows.push(row);
    }

    Ok(ParsedSheet { headers, rows })
}

/// Convert a calamine cell into the pipeline's untyped cell value.
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Blank,
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                CellValue::Blank
            } else {
                CellValue::Text(trimmed.to_string())
            }
        }
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        // Excel date cells are rendered as ISO dates so the normal
        // date-string validation path applies.
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => CellValue::Text(naive.date().format("%Y-%m-%d").to_string()),
            None => CellValue::Text(cell.to_string()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.trim().to_string()),
        Data::Error(_) => CellValue::Blank,
    }
}

/// A row is blank when every cell is blank.
fn is_blank_row(row: &RawRow) -> bool {
    row.values().all(|cell| matches!(cell, CellValue::Blank))
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- detect_kind ----------------------------------------------------------

    #[test]
    fn csv_content_types_detected() {
        assert_eq!(
            detect_kind(Some("text/csv"), "animals.csv"),
            Some(SpreadsheetKind::Csv)
        );
        assert_eq!(
            detect_kind(Some("text/csv; charset=utf-8"), "animals.csv"),
            Some(SpreadsheetKind::Csv)
        );
        assert_eq!(
            detect_kind(Some("application/csv"), "animals.csv"),
            Some(SpreadsheetKind::Csv)
        );
    }

    #[test]
    fn xlsx_content_type_detected() {
        assert_eq!(
            detect_kind(Some(XLSX_CONTENT_TYPE), "animals.xlsx"),
            Some(SpreadsheetKind::Xlsx)
        );
    }

    #[test]
    fn octet_stream_falls_back_to_extension() {
        assert_eq!(
            detect_kind(Some("application/octet-stream"), "animals.CSV"),
            Some(SpreadsheetKind::Csv)
        );
        assert_eq!(
            detect_kind(Some("application/octet-stream"), "animals.xlsx"),
            Some(SpreadsheetKind::Xlsx)
        );
    }

    #[test]
    fn missing_content_type_falls_back_to_extension() {
        assert_eq!(detect_kind(None, "animals.xlsx"), Some(SpreadsheetKind::Xlsx));
    }

    #[test]
    fn unsupported_uploads_rejected() {
        assert_eq!(detect_kind(Some("application/pdf"), "animals.pdf"), None);
        assert_eq!(detect_kind(None, "animals.txt"), None);
        assert_eq!(detect_kind(Some("application/octet-stream"), "animals"), None);
    }

    // -- CSV parsing ----------------------------------------------------------

    #[test]
    fn csv_headers_and_rows_parsed() {
        let bytes = b"name,sex,species\nRex,male,Ball Python\nNova,female,Corn Snake\n";
        let sheet = parse_spreadsheet(SpreadsheetKind::Csv, bytes).unwrap();

        assert_eq!(sheet.headers, ["name", "sex", "species"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(
            sheet.rows[0].get("name"),
            Some(&CellValue::Text("Rex".to_string()))
        );
        assert_eq!(
            sheet.rows[1].get("species"),
            Some(&CellValue::Text("Corn Snake".to_string()))
        );
    }

    #[test]
    fn csv_empty_cells_become_blank() {
        let bytes = b"name,notes\nRex,\n";
        let sheet = parse_spreadsheet(SpreadsheetKind::Csv, bytes).unwrap();

        assert_eq!(sheet.rows[0].get("notes"), Some(&CellValue::Blank));
    }

    #[test]
    fn csv_blank_lines_skipped() {
        let bytes = b"name,sex\nRex,male\n,\nNova,female\n";
        let sheet = parse_spreadsheet(SpreadsheetKind::Csv, bytes).unwrap();

        assert_eq!(sheet.rows.len(), 2);
    }

    #[test]
    fn csv_values_and_headers_trimmed() {
        let bytes = b" name , sex \n Rex , male \n";
        let sheet = parse_spreadsheet(SpreadsheetKind::Csv, bytes).unwrap();

        assert_eq!(sheet.headers, ["name", "sex"]);
        assert_eq!(
            sheet.rows[0].get("name"),
            Some(&CellValue::Text("Rex".to_string()))
        );
    }

    #[test]
    fn csv_with_no_data_rows_yields_empty_batch() {
        let bytes = b"name,sex\n";
        let sheet = parse_spreadsheet(SpreadsheetKind::Csv, bytes).unwrap();

        assert_eq!(sheet.headers.len(), 2);
        assert!(sheet.rows.is_empty());
    }

    #[test]
    fn invalid_xlsx_bytes_rejected() {
        let err = parse_spreadsheet(SpreadsheetKind::Xlsx, b"definitely not a zip").unwrap_err();
        assert!(err.to_string().contains("Failed to parse XLSX file"));
    }
}
