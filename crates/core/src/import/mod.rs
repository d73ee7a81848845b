//! Core types, constants, and pure logic for the bulk spreadsheet importer.
//!
//! This module has zero external dependencies (no DB, no async, no I/O).
//! The pipeline runs strictly downward:
//!
//! ```text
//! raw rows -> normalized rows -> (validation | parent resolution) -> preview
//! ```
//!
//! Commit-side orchestration (taxonomy reconciliation, record creation)
//! lives in the API crate, which composes these pieces with the repository
//! layer.

pub mod fields;
pub mod normalize;
pub mod parentage;
pub mod preview;
pub mod validate;

pub use fields::{map_headers, CanonicalField, HeaderMapping, ReptileStatus, Sex, ValueKind};
pub use normalize::{normalize_row, normalize_rows, CellValue, FieldValue, NormalizedRow, RawRow};
pub use parentage::{resolve_parent_references, ParentResolution};
pub use preview::{assemble_preview, ImportPreview};
pub use validate::{parse_date, validate_row, validate_rows, RowValidity};

// ── Constants ────────────────────────────────────────────────────────

/// Maximum number of data rows accepted in one import batch.
pub const MAX_IMPORT_ROWS: usize = 500;

/// Maximum accepted upload size in bytes (2 MiB).
pub const MAX_IMPORT_FILE_BYTES: usize = 2 * 1024 * 1024;

/// Content types recognised as CSV uploads.
pub const CSV_CONTENT_TYPES: &[&str] = &["text/csv", "application/csv"];

/// The standard XLSX content type.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Default care-level classification for species auto-created during commit.
pub const DEFAULT_CARE_LEVEL: &str = "intermediate";

/// Morph label used for code generation when a row names no morph.
pub const DEFAULT_MORPH_LABEL: &str = "Normal";
