//! Row normalization: untyped spreadsheet cells -> typed field values.
//!
//! Normalization never fails. Every [`RawRow`] yields exactly one
//! [`NormalizedRow`]; malformed values (e.g. a non-numeric weight) are
//! carried through as-is and rejected by validation, where the failure is
//! visible to the user with a per-row reason.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::import::fields::{CanonicalField, HeaderMapping, ValueKind};

/// Strings coerced to `true` during boolean normalization (case-insensitive).
pub const TRUTHY_STRINGS: &[&str] = &["true", "1", "yes"];

/// An untyped cell value as produced by the spreadsheet parsers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Blank,
}

/// One spreadsheet line: original header -> untyped cell value.
///
/// Ephemeral; discarded after normalization.
pub type RawRow = HashMap<String, CellValue>;

/// A typed field value after normalization.
///
/// Untagged on the wire: booleans, numbers, strings, and string lists
/// serialize to their natural JSON forms so the preview payload can be
/// echoed back verbatim by the client at commit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// The value as text, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The value as a number: native numbers pass through, numeric strings
    /// are parsed. Booleans and lists are never numbers.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

/// One normalized row: canonical field -> typed value, plus the original
/// 0-based row index. The index is stable and defines the ordering used by
/// parent-reference resolution and the commit loop. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRow {
    pub row_index: usize,
    pub fields: HashMap<CanonicalField, FieldValue>,
}

impl NormalizedRow {
    pub fn get(&self, field: CanonicalField) -> Option<&FieldValue> {
        self.fields.get(&field)
    }

    /// Text value of a field, if present and textual.
    pub fn text(&self, field: CanonicalField) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    /// Text value of a field, trimmed, if present and non-blank.
    pub fn non_blank_text(&self, field: CanonicalField) -> Option<&str> {
        self.text(field)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Numeric value of a field, if present and coercible.
    pub fn number(&self, field: CanonicalField) -> Option<f64> {
        self.get(field).and_then(FieldValue::as_number)
    }
}

/// Normalize one raw row against the batch's header mapping.
///
/// Values under unmapped headers are dropped. Blank cells (and cells that
/// trim to the empty string) leave the field absent rather than present-but-
/// empty, so validation's "if present" rules see a clean picture.
pub fn normalize_row(row_index: usize, raw: &RawRow, mapping: &HeaderMapping) -> NormalizedRow {
    let mut fields = HashMap::new();

    for (header, mapped) in mapping {
        let Some(field) = mapped else { continue };
        let Some(cell) = raw.get(header) else { continue };
        if let Some(value) = normalize_cell(cell, field.kind()) {
            fields.insert(*field, value);
        }
    }

    NormalizedRow { row_index, fields }
}

/// Convert all raw rows, assigning 0-based row indices in input order.
pub fn normalize_rows(raw_rows: &[RawRow], mapping: &HeaderMapping) -> Vec<NormalizedRow> {
    raw_rows
        .iter()
        .enumerate()
        .map(|(i, raw)| normalize_row(i, raw, mapping))
        .collect()
}

/// Apply the declared kind's conversion to one cell. `None` means the field
/// is absent from the normalized row.
fn normalize_cell(cell: &CellValue, kind: ValueKind) -> Option<FieldValue> {
    let cell = match cell {
        CellValue::Blank => return None,
        CellValue::Text(s) if s.trim().is_empty() => return None,
        other => other,
    };

    match kind {
        ValueKind::Text | ValueKind::Date => Some(FieldValue::Text(cell_to_text(cell))),
        ValueKind::Boolean => match cell {
            CellValue::Text(s) => Some(FieldValue::Bool(is_truthy(s))),
            CellValue::Bool(b) => Some(FieldValue::Bool(*b)),
            // A native non-boolean passes through; validation rejects it.
            CellValue::Number(n) => Some(FieldValue::Number(*n)),
            CellValue::Blank => None,
        },
        ValueKind::Number => match cell {
            CellValue::Number(n) => Some(FieldValue::Number(*n)),
            // Unparseable text is kept as text so validation can reject it
            // with a per-row reason instead of failing normalization.
            CellValue::Text(s) => {
                let trimmed = s.trim();
                match trimmed.parse::<f64>() {
                    Ok(n) => Some(FieldValue::Number(n)),
                    Err(_) => Some(FieldValue::Text(trimmed.to_string())),
                }
            }
            CellValue::Bool(b) => Some(FieldValue::Number(if *b { 1.0 } else { 0.0 })),
            CellValue::Blank => None,
        },
        ValueKind::TextList => {
            let items: Vec<String> = cell_to_text(cell)
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
            Some(FieldValue::List(items))
        }
    }
}

/// Render a cell as trimmed text.
fn cell_to_text(cell: &CellValue) -> String {
    match cell {
        CellValue::Text(s) => s.trim().to_string(),
        CellValue::Number(n) => format_number(*n),
        CellValue::Bool(b) => b.to_string(),
        CellValue::Blank => String::new(),
    }
}

/// Format a numeric cell the way a spreadsheet displays it: integral values
/// without a trailing `.0`.
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Case-insensitive membership in [`TRUTHY_STRINGS`].
fn is_truthy(s: &str) -> bool {
    TRUTHY_STRINGS.contains(&s.trim().to_lowercase().as_str())
}
