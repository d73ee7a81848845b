//! Cross-row parent-reference resolution.
//!
//! Rows may name a dam and/or sire by animal name. References are resolved
//! against the batch itself via a case-insensitive name index; names not
//! found in the batch are treated as *external* (the parent is assumed to
//! already exist in the catalog) and accepted without validation.
//!
//! Same-batch references carry two constraints:
//!
//! - **Ordering**: the referenced parent must appear at a strictly earlier
//!   row index. Commit processes rows in original order, and a child needs
//!   its parent's generated id, so a later-row parent cannot be linked.
//! - **Sex consistency**: a dam must resolve to a female row and a sire to
//!   a male row, whenever the resolved row declares a sex.
//!
//! Resolution is independent of row validity: an invalid row still
//! participates in the name index and still has its references checked.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::import::fields::CanonicalField;
use crate::import::normalize::NormalizedRow;
use crate::naming::NameKey;

/// The outcome of resolving one row's parent references.
///
/// Produced only for rows that named at least one parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentResolution {
    pub row_index: usize,
    pub valid: bool,
    /// The dam name as given in the row, if any.
    pub dam: Option<String>,
    /// The sire name as given in the row, if any.
    pub sire: Option<String>,
    /// The first constraint violation encountered; absent when valid.
    pub error: Option<String>,
}

/// Which parent role a reference names. Checked independently per row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParentRole {
    Dam,
    Sire,
}

impl ParentRole {
    fn label(&self) -> &'static str {
        match self {
            Self::Dam => "Dam",
            Self::Sire => "Sire",
        }
    }

    fn expected_sex(&self) -> &'static str {
        match self {
            Self::Dam => "female",
            Self::Sire => "male",
        }
    }
}

/// Build the batch name index: lower-cased name -> row index, for every row
/// with a non-blank name. When two rows share a name the later row wins;
/// duplicate names within one batch are a discouraged edge case, and
/// last-wins is the pipeline's fixed policy.
pub fn build_name_index(rows: &[NormalizedRow]) -> HashMap<NameKey, usize> {
    let mut index = HashMap::new();
    for row in rows {
        if let Some(name) = row.non_blank_text(CanonicalField::Name) {
            index.insert(NameKey::new(name), row.row_index);
        }
    }
    index
}

/// Resolve parent references for every row in the batch.
///
/// Returns one [`ParentResolution`] per row that named a dam or sire, in
/// row order. Rows without parent references contribute nothing.
pub fn resolve_parent_references(rows: &[NormalizedRow]) -> Vec<ParentResolution> {
    let name_index = build_name_index(rows);

    rows.iter()
        .filter_map(|row| resolve_row(row, rows, &name_index))
        .collect()
}

fn resolve_row(
    row: &NormalizedRow,
    rows: &[NormalizedRow],
    name_index: &HashMap<NameKey, usize>,
) -> Option<ParentResolution> {
    let dam = row
        .non_blank_text(CanonicalField::DamName)
        .map(String::from);
    let sire = row
        .non_blank_text(CanonicalField::SireName)
        .map(String::from);

    if dam.is_none() && sire.is_none() {
        return None;
    }

    // Each role is checked independently; the first violation found (dam
    // first) becomes the resolution's error.
    let mut error = None;
    for (role, parent) in [(ParentRole::Dam, &dam), (ParentRole::Sire, &sire)] {
        if let Some(parent_name) = parent {
            if let Some(violation) = check_reference(row, parent_name, role, rows, name_index) {
                error.get_or_insert(violation);
            }
        }
    }

    Some(ParentResolution {
        row_index: row.row_index,
        valid: error.is_none(),
        dam,
        sire,
        error,
    })
}

/// Check one parent reference. `None` means the reference is acceptable,
/// including the external case where the name is not in the batch at all.
fn check_reference(
    row: &NormalizedRow,
    parent_name: &str,
    role: ParentRole,
    rows: &[NormalizedRow],
    name_index: &HashMap<NameKey, usize>,
) -> Option<String> {
    let Some(&parent_index) = name_index.get(&NameKey::new(parent_name)) else {
        // External reference: the parent lives outside this batch.
        return None;
    };

    if parent_index > row.row_index {
        return Some(format!(
            "{} '{}' appears later in import (row {}). Please reorder rows.",
            role.label(),
            parent_name,
            parent_index + 1,
        ));
    }

    let parent_row = rows.iter().find(|r| r.row_index == parent_index)?;
    if let Some(found_sex) = parent_row.non_blank_text(CanonicalField::Sex) {
        if !found_sex.eq_ignore_ascii_case(role.expected_sex()) {
            return Some(format!(
                "{} '{}' is {}, expected {}",
                role.label(),
                parent_name,
                found_sex.to_lowercase(),
                role.expected_sex(),
            ));
        }
    }

    None
}
