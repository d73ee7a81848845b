//! Commit-side orchestration: taxonomy reconciliation and record creation.
//!
//! The commit loop is strictly sequential in original row order. Two things
//! depend on that ordering and must not be parallelised:
//!
//! - Code generation threads the growing created-record count through the
//!   loop, so sequence numbers stay monotonic within one commit run.
//! - Same-batch parent references link a child to its dam/sire's freshly
//!   generated id, so the parent row must have been processed first.
//!
//! Per-row failures are collected, never fatal: one row's error neither
//! discards work already committed for prior rows nor blocks later rows.

use std::collections::HashMap;

use chrono::{Datelike, Utc};
use indexmap::IndexMap;
use scalebook_core::import::{
    parse_date, CanonicalField, FieldValue, NormalizedRow, ReptileStatus, Sex,
    DEFAULT_CARE_LEVEL, DEFAULT_MORPH_LABEL,
};
use scalebook_core::naming::{generate_reptile_code, NameKey};
use scalebook_core::types::DbId;
use scalebook_db::models::growth::CreateGrowthEntry;
use scalebook_db::models::reptile::{CreateReptile, Reptile};
use scalebook_db::models::taxonomy::{CreateMorph, CreateSpecies};
use scalebook_db::repositories::{GrowthRepo, MorphRepo, ReptileRepo, SpeciesRepo};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppError;

/// A morph known to the taxonomy index.
#[derive(Debug, Clone)]
struct MorphEntry {
    id: DbId,
    /// The stored human-readable label, used for code generation.
    label: String,
}

/// Case-insensitive in-memory view of the taxonomy visible to one user.
///
/// Seeded from the store at the start of a commit run and grown as missing
/// entries are created; never shrinks during a run. Owned exclusively by a
/// single commit invocation.
pub struct TaxonomyIndex {
    species: HashMap<NameKey, DbId>,
    /// Keyed by (species id, morph name): morph names are only unique
    /// within a species.
    morphs: HashMap<(DbId, NameKey), MorphEntry>,
}

impl TaxonomyIndex {
    /// Seed the index from the user's current species/morph listings.
    ///
    /// The two reads are independent and issued concurrently.
    pub async fn load(pool: &PgPool, user_id: DbId) -> Result<Self, sqlx::Error> {
        let (species_list, morph_list) = tokio::try_join!(
            SpeciesRepo::list_for_user(pool, user_id),
            MorphRepo::list_for_user(pool, user_id),
        )?;

        let species = species_list
            .into_iter()
            .map(|s| (NameKey::new(&s.name), s.id))
            .collect();
        let morphs = morph_list
            .into_iter()
            .map(|m| {
                (
                    (m.species_id, NameKey::new(&m.name)),
                    MorphEntry {
                        id: m.id,
                        label: m.name,
                    },
                )
            })
            .collect();

        Ok(Self { species, morphs })
    }

    fn species_id(&self, name: &str) -> Option<DbId> {
        self.species.get(&NameKey::new(name)).copied()
    }

    fn morph(&self, species_id: DbId, name: &str) -> Option<&MorphEntry> {
        self.morphs.get(&(species_id, NameKey::new(name)))
    }
}

/// The commit result returned to the client.
///
/// `success` describes pipeline completion -- every selected row was
/// attempted -- not that every row succeeded; callers inspect `errors` for
/// the rows that failed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitOutcome {
    pub success: bool,
    pub reptiles: Vec<Reptile>,
    pub errors: Vec<String>,
    pub species_added: Vec<String>,
    pub morphs_added: Vec<String>,
}

/// Create missing species, then missing morphs, for the selected rows.
///
/// Species are created with the default care-level classification, owned by
/// the acting user (never global). A morph whose species cannot be resolved
/// is silently skipped; the record-creation step surfaces the missing
/// species as a row error. Creation failures are logged and skipped so the
/// rest of the batch proceeds.
async fn reconcile_taxonomy(
    pool: &PgPool,
    user_id: DbId,
    index: &mut TaxonomyIndex,
    rows: &[&NormalizedRow],
) -> (Vec<String>, Vec<String>) {
    // Distinct missing species, first-seen display name, in row order.
    let mut missing_species: IndexMap<NameKey, String> = IndexMap::new();
    for row in rows {
        if let Some(name) = row.non_blank_text(CanonicalField::Species) {
            let key = NameKey::new(name);
            if index.species.contains_key(&key) || missing_species.contains_key(&key) {
                continue;
            }
            missing_species.insert(key, name.to_string());
        }
    }

    let mut species_added = Vec::new();
    for (key, name) in missing_species {
        let input = CreateSpecies {
            owner_id: Some(user_id),
            name: name.clone(),
            care_level: DEFAULT_CARE_LEVEL.to_string(),
            is_global: false,
        };
        match SpeciesRepo::create(pool, &input).await {
            Ok(species) => {
                index.species.insert(key, species.id);
                species_added.push(name);
            }
            Err(e) => {
                tracing::warn!(species = %name, error = %e, "Failed to create species");
            }
        }
    }

    // Distinct missing (species, morph) pairs among rows whose species is
    // now resolvable.
    let mut missing_morphs: IndexMap<(DbId, NameKey), String> = IndexMap::new();
    for row in rows {
        let Some(morph_name) = row.non_blank_text(CanonicalField::Morph) else {
            continue;
        };
        let Some(species_id) = row
            .non_blank_text(CanonicalField::Species)
            .and_then(|s| index.species_id(s))
        else {
            continue;
        };
        let key = (species_id, NameKey::new(morph_name));
        if index.morphs.contains_key(&key) || missing_morphs.contains_key(&key) {
            continue;
        }
        missing_morphs.insert(key, morph_name.to_string());
    }

    let mut morphs_added = Vec::new();
    for ((species_id, key), name) in missing_morphs {
        let input = CreateMorph {
            species_id,
            owner_id: Some(user_id),
            name: name.clone(),
        };
        match MorphRepo::create(pool, &input).await {
            Ok(morph) => {
                index.morphs.insert(
                    (species_id, key),
                    MorphEntry {
                        id: morph.id,
                        label: morph.name,
                    },
                );
                morphs_added.push(name);
            }
            Err(e) => {
                tracing::warn!(morph = %name, error = %e, "Failed to create morph");
            }
        }
    }

    (species_added, morphs_added)
}

/// Commit the selected rows in original row order.
///
/// Only batch-level store failures (seeding the taxonomy index, counting
/// existing records) abort the run; everything after that is per-row.
pub async fn commit_rows(
    pool: &PgPool,
    user_id: DbId,
    rows: &[NormalizedRow],
    selected_rows: &[usize],
) -> Result<CommitOutcome, AppError> {
    // Selection is by row index; processing must follow original order.
    let mut selection: Vec<usize> = selected_rows.to_vec();
    selection.sort_unstable();
    selection.dedup();

    let selected: Vec<&NormalizedRow> = selection
        .iter()
        .filter_map(|idx| rows.iter().find(|row| row.row_index == *idx))
        .collect();

    let mut index = TaxonomyIndex::load(pool, user_id).await?;
    let (species_added, morphs_added) =
        reconcile_taxonomy(pool, user_id, &mut index, &selected).await;

    let existing_count = ReptileRepo::count_for_user(pool, user_id).await? as usize;
    let current_year = Utc::now().year();
    let today = Utc::now().date_naive();

    let mut created: Vec<Reptile> = Vec::new();
    let mut errors: Vec<String> = Vec::new();
    // Names created in this batch -> new record id, for dam/sire linkage.
    let mut batch_names: HashMap<NameKey, DbId> = HashMap::new();

    for row in selected {
        let Some(name) = row.non_blank_text(CanonicalField::Name).map(String::from) else {
            errors.push(format!("Row {}: Name is required", row.row_index + 1));
            continue;
        };

        // 1. Species must be resolvable through the index.
        let species_name = row
            .non_blank_text(CanonicalField::Species)
            .unwrap_or_default()
            .to_string();
        let Some(species_id) = index.species_id(&species_name) else {
            errors.push(format!("Species not found for reptile {name}"));
            continue;
        };

        // 2. Duplicate names are skipped, not overwritten. A same-name row
        // earlier in this batch also trips this check, since its record is
        // already in the store by now.
        match ReptileRepo::find_by_name_for_user(pool, user_id, &name).await {
            Ok(Some(_)) => {
                errors.push(format!("Reptile '{name}' already exists, skipping"));
                continue;
            }
            Ok(None) => {}
            Err(e) => {
                errors.push(format!("Failed to import reptile '{name}': {e}"));
                continue;
            }
        }

        // 3. Resolve the morph to a stored label for code generation.
        let (morph_id, morph_label) = match row.non_blank_text(CanonicalField::Morph) {
            Some(morph_name) => match index.morph(species_id, morph_name) {
                Some(entry) => (Some(entry.id), entry.label.clone()),
                None => (None, morph_name.to_string()),
            },
            None => (None, DEFAULT_MORPH_LABEL.to_string()),
        };

        let sex = row
            .non_blank_text(CanonicalField::Sex)
            .and_then(Sex::from_str)
            .unwrap_or(Sex::Unknown);
        let status = row
            .non_blank_text(CanonicalField::Status)
            .and_then(ReptileStatus::from_str)
            .unwrap_or(ReptileStatus::Active);

        let hatch_date = row
            .non_blank_text(CanonicalField::HatchDate)
            .and_then(parse_date);
        let Some(acquisition_date) = row
            .non_blank_text(CanonicalField::AcquisitionDate)
            .and_then(parse_date)
        else {
            errors.push(format!(
                "A valid acquisition date is required for reptile {name}"
            ));
            continue;
        };

        // 4. Use the supplied code when the sheet carried one; otherwise
        // generate from the growing record count.
        let code = match row.non_blank_text(CanonicalField::ReptileCode) {
            Some(code) => code.to_string(),
            None => generate_reptile_code(
                existing_count + created.len(),
                &species_name,
                &morph_label,
                hatch_date,
                current_year,
                sex,
            ),
        };

        let dam_id = row
            .non_blank_text(CanonicalField::DamName)
            .and_then(|dam| batch_names.get(&NameKey::new(dam)).copied());
        let sire_id = row
            .non_blank_text(CanonicalField::SireName)
            .and_then(|sire| batch_names.get(&NameKey::new(sire)).copied());

        let input = CreateReptile {
            owner_id: user_id,
            species_id,
            morph_id,
            dam_id,
            sire_id,
            name: name.clone(),
            code,
            sex: sex.as_str().to_string(),
            status: status.as_str().to_string(),
            hatch_date,
            acquisition_date,
            visual_traits: list_field(row, CanonicalField::VisualTraits),
            het_traits: list_field(row, CanonicalField::HetTraits),
            original_breeder: text_field(row, CanonicalField::OriginalBreeder),
            breeding_line: text_field(row, CanonicalField::BreedingLine),
            lineage_path: text_field(row, CanonicalField::LineagePath),
            generation: row.number(CanonicalField::Generation).map(|n| n as i32),
            is_breeder: bool_field(row, CanonicalField::IsBreeder),
            retired_breeder: bool_field(row, CanonicalField::RetiredBreeder),
            notes: text_field(row, CanonicalField::Notes),
        };

        // 5. Create the record; a store failure isolates to this row.
        let reptile = match ReptileRepo::create(pool, &input).await {
            Ok(reptile) => reptile,
            Err(e) => {
                errors.push(format!("Failed to import reptile '{name}': {e}"));
                continue;
            }
        };
        batch_names.insert(NameKey::new(&reptile.name), reptile.id);

        // 6. Derive a growth entry when measurements were supplied. A
        // failure here is a row error but does not undo the record.
        let weight = positive_number(row, CanonicalField::Weight);
        let length = positive_number(row, CanonicalField::Length);
        if weight.is_some() || length.is_some() {
            let entry = CreateGrowthEntry {
                reptile_id: reptile.id,
                measured_on: today,
                weight_grams: weight,
                length_cm: length,
            };
            if let Err(e) = GrowthRepo::create(pool, &entry).await {
                errors.push(format!("Failed to record measurement for '{name}': {e}"));
            }
        }

        created.push(reptile);
    }

    tracing::info!(
        user_id,
        imported = created.len(),
        failed = errors.len(),
        species_added = species_added.len(),
        morphs_added = morphs_added.len(),
        "Bulk import committed"
    );

    Ok(CommitOutcome {
        success: true,
        reptiles: created,
        errors,
        species_added,
        morphs_added,
    })
}

fn text_field(row: &NormalizedRow, field: CanonicalField) -> Option<String> {
    row.non_blank_text(field).map(String::from)
}

fn list_field(row: &NormalizedRow, field: CanonicalField) -> Vec<String> {
    match row.get(field) {
        Some(FieldValue::List(items)) => items.clone(),
        _ => Vec::new(),
    }
}

fn bool_field(row: &NormalizedRow, field: CanonicalField) -> bool {
    matches!(row.get(field), Some(FieldValue::Bool(true)))
}

fn positive_number(row: &NormalizedRow, field: CanonicalField) -> Option<f64> {
    row.number(field).filter(|n| n.is_finite() && *n > 0.0)
}
