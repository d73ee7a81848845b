//! Field-level validation of normalized rows.
//!
//! Rules run in a fixed order and the first failing rule determines the
//! user-facing reason; the order matters for error text, not correctness.
//! Validation never inspects other rows -- cross-row concerns (parent
//! references) are handled by [`crate::import::parentage`].

use chrono::NaiveDate;

use crate::import::fields::{CanonicalField, ReptileStatus, Sex};
use crate::import::normalize::{FieldValue, NormalizedRow};

/// Date formats accepted for `hatch_date` / `acquisition_date`.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Boolean-like strings accepted for breeder flags (case-insensitive).
const BOOLEAN_STRINGS: &[&str] = &["true", "false", "1", "0", "yes", "no"];

/// The validation outcome for one row. Exactly one per normalized row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowValidity {
    pub row_index: usize,
    pub valid: bool,
    /// The first failing rule's reason; absent for valid rows.
    pub reason: Option<String>,
}

impl RowValidity {
    fn ok(row_index: usize) -> Self {
        Self {
            row_index,
            valid: true,
            reason: None,
        }
    }

    fn fail(row_index: usize, reason: impl Into<String>) -> Self {
        Self {
            row_index,
            valid: false,
            reason: Some(reason.into()),
        }
    }
}

/// Parse a date string against the accepted formats.
///
/// Calendar validity is enforced (`2023-02-30` fails).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let trimmed = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

/// Validate one normalized row against the field-level rules.
pub fn validate_row(row: &NormalizedRow) -> RowValidity {
    let idx = row.row_index;

    // 1. Name is mandatory.
    if row.non_blank_text(CanonicalField::Name).is_none() {
        return RowValidity::fail(idx, "Name is required");
    }

    // 2. Sex is mandatory and constrained.
    let sex_ok = row
        .non_blank_text(CanonicalField::Sex)
        .and_then(Sex::from_str)
        .is_some();
    if !sex_ok {
        return RowValidity::fail(
            idx,
            format!("Sex must be one of: {}", Sex::ALL.join(", ")),
        );
    }

    // 3. Species is mandatory.
    if row.non_blank_text(CanonicalField::Species).is_none() {
        return RowValidity::fail(idx, "Species is required");
    }

    // 4. Acquisition date is mandatory and must be a real calendar date.
    let acquisition_ok = row
        .non_blank_text(CanonicalField::AcquisitionDate)
        .and_then(parse_date)
        .is_some();
    if !acquisition_ok {
        return RowValidity::fail(idx, "A valid acquisition date is required");
    }

    // 5. Status, when present, is constrained.
    if let Some(status) = row.non_blank_text(CanonicalField::Status) {
        if ReptileStatus::from_str(status).is_none() {
            return RowValidity::fail(
                idx,
                format!("Status must be one of: {}", ReptileStatus::ALL.join(", ")),
            );
        }
    }

    // 6. Hatch date, when present, must parse.
    if let Some(hatch) = row.non_blank_text(CanonicalField::HatchDate) {
        if parse_date(hatch).is_none() {
            return RowValidity::fail(idx, "Hatch date is not a valid date");
        }
    }

    // 7. Measurements, when present, must be finite and positive.
    for (field, label) in [
        (CanonicalField::Weight, "Weight"),
        (CanonicalField::Length, "Length"),
    ] {
        if row.get(field).is_some() {
            match row.number(field) {
                Some(n) if n.is_finite() && n > 0.0 => {}
                _ => {
                    return RowValidity::fail(idx, format!("{label} must be a positive number"));
                }
            }
        }
    }

    // 8. Generation, when present, must be finite and non-negative.
    if row.get(CanonicalField::Generation).is_some() {
        match row.number(CanonicalField::Generation) {
            Some(n) if n.is_finite() && n >= 0.0 => {}
            _ => {
                return RowValidity::fail(idx, "Generation must be a non-negative number");
            }
        }
    }

    // 9. Breeder flags, when present, must be boolean-like.
    for (field, label) in [
        (CanonicalField::IsBreeder, "Is breeder"),
        (CanonicalField::RetiredBreeder, "Retired breeder"),
    ] {
        if let Some(value) = row.get(field) {
            if !is_boolean_like(value) {
                return RowValidity::fail(idx, format!("{label} must be a boolean value"));
            }
        }
    }

    RowValidity::ok(idx)
}

/// Validate all rows, producing one outcome per row in input order.
pub fn validate_rows(rows: &[NormalizedRow]) -> Vec<RowValidity> {
    rows.iter().map(validate_row).collect()
}

/// `true` for booleans, recognised boolean strings, and 0/1 numerics.
fn is_boolean_like(value: &FieldValue) -> bool {
    match value {
        FieldValue::Bool(_) => true,
        FieldValue::Text(s) => BOOLEAN_STRINGS.contains(&s.trim().to_lowercase().as_str()),
        FieldValue::Number(n) => *n == 0.0 || *n == 1.0,
        FieldValue::List(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::fields::map_headers;
    use crate::import::normalize::{normalize_row, CellValue, RawRow};

    /// Build a normalized row from header/value pairs the way the pipeline
    /// does, so tests exercise the real normalization path.
    fn row_from(pairs: &[(&str, &str)]) -> NormalizedRow {
        let headers: Vec<String> = pairs.iter().map(|(h, _)| h.to_string()).collect();
        let mapping = map_headers(&headers);
        let raw: RawRow = pairs
            .iter()
            .map(|(h, v)| (h.to_string(), CellValue::Text(v.to_string())))
            .collect();
        normalize_row(0, &raw, &mapping)
    }

    fn valid_pairs() -> Vec<(&'static str, &'static str)> {
        vec![
            ("name", "Rex"),
            ("sex", "male"),
            ("species", "Ball Python"),
            ("acquisition_date", "2024-03-01"),
        ]
    }

    #[test]
    fn minimal_valid_row_passes() {
        let validity = validate_row(&row_from(&valid_pairs()));
        assert!(validity.valid);
        assert!(validity.reason.is_none());
    }

    #[test]
    fn missing_name_rejected() {
        let mut pairs = valid_pairs();
        pairs.remove(0);
        let validity = validate_row(&row_from(&pairs));
        assert!(!validity.valid);
        assert_eq!(validity.reason.as_deref(), Some("Name is required"));
    }

    #[test]
    fn blank_name_rejected() {
        let mut pairs = valid_pairs();
        pairs[0].1 = "   ";
        let validity = validate_row(&row_from(&pairs));
        assert_eq!(validity.reason.as_deref(), Some("Name is required"));
    }

    #[test]
    fn invalid_sex_rejected() {
        let mut pairs = valid_pairs();
        pairs[1].1 = "both";
        let validity = validate_row(&row_from(&pairs));
        assert!(!validity.valid);
        assert!(validity.reason.unwrap().starts_with("Sex must be one of"));
    }

    #[test]
    fn sex_is_case_insensitive() {
        let mut pairs = valid_pairs();
        pairs[1].1 = "FEMALE";
        assert!(validate_row(&row_from(&pairs)).valid);
    }

    #[test]
    fn missing_species_rejected() {
        let mut pairs = valid_pairs();
        pairs.remove(2);
        let validity = validate_row(&row_from(&pairs));
        assert_eq!(validity.reason.as_deref(), Some("Species is required"));
    }

    #[test]
    fn missing_acquisition_date_rejected() {
        let mut pairs = valid_pairs();
        pairs.remove(3);
        let validity = validate_row(&row_from(&pairs));
        assert_eq!(
            validity.reason.as_deref(),
            Some("A valid acquisition date is required")
        );
    }

    #[test]
    fn malformed_acquisition_date_rejected() {
        let mut pairs = valid_pairs();
        pairs[3].1 = "last tuesday";
        let validity = validate_row(&row_from(&pairs));
        assert_eq!(
            validity.reason.as_deref(),
            Some("A valid acquisition date is required")
        );
    }

    #[test]
    fn impossible_calendar_date_rejected() {
        let mut pairs = valid_pairs();
        pairs[3].1 = "2023-02-30";
        assert!(!validate_row(&row_from(&pairs)).valid);
    }

    #[test]
    fn unknown_status_rejected() {
        let mut pairs = valid_pairs();
        pairs.push(("status", "escaped"));
        let validity = validate_row(&row_from(&pairs));
        assert!(validity
            .reason
            .unwrap()
            .starts_with("Status must be one of"));
    }

    #[test]
    fn known_statuses_accepted() {
        for status in ReptileStatus::ALL {
            let mut pairs = valid_pairs();
            pairs.push(("status", status));
            assert!(validate_row(&row_from(&pairs)).valid, "status: {status}");
        }
    }

    #[test]
    fn malformed_hatch_date_rejected() {
        let mut pairs = valid_pairs();
        pairs.push(("hatch_date", "not-a-date"));
        let validity = validate_row(&row_from(&pairs));
        assert_eq!(
            validity.reason.as_deref(),
            Some("Hatch date is not a valid date")
        );
    }

    #[test]
    fn absent_optional_fields_are_fine() {
        // Only the four mandatory fields are present.
        assert!(validate_row(&row_from(&valid_pairs())).valid);
    }

    #[test]
    fn non_numeric_weight_rejected() {
        let mut pairs = valid_pairs();
        pairs.push(("weight", "heavy"));
        let validity = validate_row(&row_from(&pairs));
        assert_eq!(
            validity.reason.as_deref(),
            Some("Weight must be a positive number")
        );
    }

    #[test]
    fn zero_weight_rejected() {
        let mut pairs = valid_pairs();
        pairs.push(("weight", "0"));
        assert!(!validate_row(&row_from(&pairs)).valid);
    }

    #[test]
    fn negative_length_rejected() {
        let mut pairs = valid_pairs();
        pairs.push(("length", "-12"));
        let validity = validate_row(&row_from(&pairs));
        assert_eq!(
            validity.reason.as_deref(),
            Some("Length must be a positive number")
        );
    }

    #[test]
    fn positive_measurements_accepted() {
        let mut pairs = valid_pairs();
        pairs.push(("weight", "1450.5"));
        pairs.push(("length", "120"));
        assert!(validate_row(&row_from(&pairs)).valid);
    }

    #[test]
    fn negative_generation_rejected() {
        let mut pairs = valid_pairs();
        pairs.push(("generation", "-1"));
        let validity = validate_row(&row_from(&pairs));
        assert_eq!(
            validity.reason.as_deref(),
            Some("Generation must be a non-negative number")
        );
    }

    #[test]
    fn zero_generation_accepted() {
        let mut pairs = valid_pairs();
        pairs.push(("generation", "0"));
        assert!(validate_row(&row_from(&pairs)).valid);
    }

    #[test]
    fn breeder_flag_strings_accepted() {
        let mut pairs = valid_pairs();
        pairs.push(("is_breeder", "yes"));
        pairs.push(("retired_breeder", "no"));
        assert!(validate_row(&row_from(&pairs)).valid);
    }

    #[test]
    fn numeric_breeder_flag_rejected() {
        // A native numeric cell bypasses string coercion during
        // normalization and must be caught here.
        let mut row = row_from(&valid_pairs());
        row.fields
            .insert(CanonicalField::IsBreeder, FieldValue::Number(3.0));
        let validity = validate_row(&row);
        assert_eq!(
            validity.reason.as_deref(),
            Some("Is breeder must be a boolean value")
        );
    }

    #[test]
    fn first_failing_rule_wins() {
        // Both name and species are missing; the name rule fires first.
        let validity = validate_row(&row_from(&[("sex", "male")]));
        assert_eq!(validity.reason.as_deref(), Some("Name is required"));
    }

    #[test]
    fn validate_rows_keeps_input_order() {
        let rows = vec![
            {
                let mut r = row_from(&valid_pairs());
                r.row_index = 0;
                r
            },
            {
                let mut r = row_from(&[("sex", "male")]);
                r.row_index = 1;
                r
            },
        ];

        let outcomes = validate_rows(&rows);
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].valid);
        assert!(!outcomes[1].valid);
        assert_eq!(outcomes[1].row_index, 1);
    }

    // -- parse_date -----------------------------------------------------------

    #[test]
    fn parse_date_accepts_common_formats() {
        assert!(parse_date("2024-01-31").is_some());
        assert!(parse_date("2024/01/31").is_some());
        assert!(parse_date("01/31/2024").is_some());
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert!(parse_date("soon").is_none());
        assert!(parse_date("").is_none());
        assert!(parse_date("2024-13-01").is_none());
    }
}
