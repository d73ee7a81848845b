//! Dry-run preview assembly.
//!
//! Pure composition of the import pipeline stages: header mapping, per-row
//! normalization, per-row validation, batch-wide parent resolution, and
//! distinct taxonomy counting. The preview gives the client a complete
//! accounting of every row before anything touches the catalog.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::import::fields::{map_headers, CanonicalField, HeaderMapping};
use crate::import::normalize::{normalize_rows, NormalizedRow, RawRow};
use crate::import::parentage::{resolve_parent_references, ParentResolution};
use crate::import::validate::validate_rows;
use crate::import::MAX_IMPORT_ROWS;
use crate::naming::NameKey;

/// The dry-run report returned by the preview endpoint.
///
/// Invariant: `valid_rows` and the keys of `invalid_rows` are disjoint and
/// together cover `0..total_rows`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportPreview {
    /// Original spreadsheet headers, in column order.
    pub headers: Vec<String>,
    /// Original header -> canonical field (`null` when unmapped).
    pub mapped_headers: HeaderMapping,
    /// Every normalized row, valid or not, in original order.
    pub rows: Vec<NormalizedRow>,
    /// Indices of rows that passed field-level validation.
    pub valid_rows: Vec<usize>,
    /// Row index -> first failing rule's reason, in row order.
    pub invalid_rows: IndexMap<usize, String>,
    /// Distinct case-insensitive species names across all rows.
    pub species_count: usize,
    /// Distinct case-insensitive morph names across all rows.
    pub morph_count: usize,
    pub total_rows: usize,
    /// One entry per row that named a dam or sire.
    pub parent_relationships: Vec<ParentResolution>,
}

/// Assemble the preview for one batch.
///
/// Batch-level bounds are fatal and return an error with no partial report;
/// per-row problems are collected into the report instead.
pub fn assemble_preview(
    headers: Vec<String>,
    raw_rows: Vec<RawRow>,
) -> Result<ImportPreview, CoreError> {
    if raw_rows.is_empty() {
        return Err(CoreError::Validation("No data found".to_string()));
    }
    if raw_rows.len() > MAX_IMPORT_ROWS {
        return Err(CoreError::Validation(format!(
            "Import exceeds the maximum limit of {MAX_IMPORT_ROWS} rows"
        )));
    }

    let mapping = map_headers(&headers);
    let rows = normalize_rows(&raw_rows, &mapping);

    let mut valid_rows = Vec::new();
    let mut invalid_rows = IndexMap::new();
    for outcome in validate_rows(&rows) {
        match outcome.reason {
            None => valid_rows.push(outcome.row_index),
            Some(reason) => {
                invalid_rows.insert(outcome.row_index, reason);
            }
        }
    }

    let parent_relationships = resolve_parent_references(&rows);

    Ok(ImportPreview {
        headers,
        species_count: distinct_count(&rows, CanonicalField::Species),
        morph_count: distinct_count(&rows, CanonicalField::Morph),
        total_rows: rows.len(),
        mapped_headers: mapping,
        valid_rows,
        invalid_rows,
        parent_relationships,
        rows,
    })
}

/// Count distinct case-insensitive non-blank values of `field` across all
/// rows, independent of per-row validity.
fn distinct_count(rows: &[NormalizedRow], field: CanonicalField) -> usize {
    let names: HashSet<NameKey> = rows
        .iter()
        .filter_map(|row| row.non_blank_text(field))
        .map(NameKey::new)
        .collect();
    names.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::normalize::CellValue;

    fn raw_row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(h, v)| (h.to_string(), CellValue::Text(v.to_string())))
            .collect()
    }

    fn standard_headers() -> Vec<String> {
        ["name", "sex", "species", "morph", "acquisition_date", "dam"]
            .iter()
            .map(|h| h.to_string())
            .collect()
    }

    fn valid_raw(name: &str, sex: &str, species: &str) -> RawRow {
        raw_row(&[
            ("name", name),
            ("sex", sex),
            ("species", species),
            ("acquisition_date", "2024-03-01"),
        ])
    }

    // -- batch bounds ---------------------------------------------------------

    #[test]
    fn empty_batch_is_fatal() {
        let err = assemble_preview(standard_headers(), vec![]).unwrap_err();
        assert!(err.to_string().contains("No data found"));
    }

    #[test]
    fn oversized_batch_is_fatal() {
        let rows: Vec<RawRow> = (0..MAX_IMPORT_ROWS + 1)
            .map(|i| valid_raw(&format!("Snake {i}"), "male", "Ball Python"))
            .collect();

        let err = assemble_preview(standard_headers(), rows).unwrap_err();
        assert!(err
            .to_string()
            .contains("exceeds the maximum limit of 500 rows"));
    }

    #[test]
    fn batch_of_exactly_500_rows_succeeds() {
        let rows: Vec<RawRow> = (0..MAX_IMPORT_ROWS)
            .map(|i| valid_raw(&format!("Snake {i}"), "male", "Ball Python"))
            .collect();

        let preview = assemble_preview(standard_headers(), rows).unwrap();
        assert_eq!(preview.total_rows, 500);
        assert_eq!(preview.valid_rows.len(), 500);
    }

    // -- partition invariant --------------------------------------------------

    #[test]
    fn valid_and_invalid_partition_the_index_range() {
        let rows = vec![
            valid_raw("Rex", "male", "Ball Python"),
            raw_row(&[("name", "Broken")]), // missing sex etc.
            valid_raw("Nova", "female", "Corn Snake"),
            raw_row(&[("sex", "male")]), // missing name
        ];

        let preview = assemble_preview(standard_headers(), rows).unwrap();
        assert_eq!(preview.total_rows, 4);

        let mut covered: Vec<usize> = preview
            .valid_rows
            .iter()
            .copied()
            .chain(preview.invalid_rows.keys().copied())
            .collect();
        covered.sort_unstable();
        assert_eq!(covered, vec![0, 1, 2, 3]);

        for idx in &preview.valid_rows {
            assert!(!preview.invalid_rows.contains_key(idx));
        }
    }

    #[test]
    fn invalid_rows_carry_reasons() {
        let rows = vec![valid_raw("Rex", "male", "Ball Python"), raw_row(&[("sex", "male")])];

        let preview = assemble_preview(standard_headers(), rows).unwrap();
        assert_eq!(preview.invalid_rows.get(&1).map(String::as_str), Some("Name is required"));
    }

    // -- taxonomy counts ------------------------------------------------------

    #[test]
    fn species_count_is_case_insensitive_and_ignores_validity() {
        let rows = vec![
            valid_raw("Rex", "male", "Ball Python"),
            valid_raw("Nova", "female", "BALL PYTHON"),
            // Invalid row (no name) still contributes its species.
            raw_row(&[("sex", "male"), ("species", "Corn Snake")]),
        ];

        let preview = assemble_preview(standard_headers(), rows).unwrap();
        assert_eq!(preview.species_count, 2);
    }

    #[test]
    fn morph_count_skips_blank_values() {
        let rows = vec![
            raw_row(&[
                ("name", "Rex"),
                ("sex", "male"),
                ("species", "Ball Python"),
                ("morph", "Albino"),
                ("acquisition_date", "2024-03-01"),
            ]),
            raw_row(&[
                ("name", "Nova"),
                ("sex", "female"),
                ("species", "Ball Python"),
                ("morph", "  "),
                ("acquisition_date", "2024-03-01"),
            ]),
        ];

        let preview = assemble_preview(standard_headers(), rows).unwrap();
        assert_eq!(preview.morph_count, 1);
    }

    // -- header surface -------------------------------------------------------

    #[test]
    fn unmapped_headers_surface_in_mapping() {
        let headers: Vec<String> = ["name", "sex", "species", "acquisition_date", "Enclosure"]
            .iter()
            .map(|h| h.to_string())
            .collect();
        let rows = vec![valid_raw("Rex", "male", "Ball Python")];

        let preview = assemble_preview(headers.clone(), rows).unwrap();
        assert_eq!(preview.headers, headers);
        assert_eq!(preview.mapped_headers["Enclosure"], None);
        assert_eq!(
            preview.mapped_headers["species"],
            Some(CanonicalField::Species)
        );
    }

    // -- end-to-end scenario --------------------------------------------------

    #[test]
    fn dam_reference_to_male_row_is_flagged() {
        // Rex is male; Nova names him as dam. Ordering is fine (Rex is
        // earlier), so the sex rule must fire.
        let rows = vec![
            valid_raw("Rex", "male", "Ball Python"),
            raw_row(&[
                ("name", "Nova"),
                ("sex", "female"),
                ("species", "Ball Python"),
                ("acquisition_date", "2024-03-01"),
                ("dam", "Rex"),
            ]),
        ];

        let preview = assemble_preview(standard_headers(), rows).unwrap();
        assert_eq!(preview.valid_rows.len(), 2);
        assert_eq!(preview.parent_relationships.len(), 1);

        let resolution = &preview.parent_relationships[0];
        assert_eq!(resolution.row_index, 1);
        assert!(!resolution.valid);
        assert!(resolution
            .error
            .as_deref()
            .unwrap()
            .contains("Dam 'Rex' is male"));
    }

    // -- serialization --------------------------------------------------------

    #[test]
    fn preview_serializes_with_wire_field_names() {
        let rows = vec![valid_raw("Rex", "male", "Ball Python")];
        let preview = assemble_preview(standard_headers(), rows).unwrap();

        let json = serde_json::to_value(&preview).unwrap();
        for key in [
            "headers",
            "mappedHeaders",
            "rows",
            "validRows",
            "invalidRows",
            "speciesCount",
            "morphCount",
            "totalRows",
            "parentRelationships",
        ] {
            assert!(json.get(key).is_some(), "missing key: {key}");
        }
    }
}
