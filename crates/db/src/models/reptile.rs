//! Reptile record model.

use chrono::NaiveDate;
use scalebook_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `reptiles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reptile {
    pub id: DbId,
    pub owner_id: DbId,
    pub species_id: DbId,
    pub morph_id: Option<DbId>,
    /// Same-batch parent linkage set during import; `None` for external or
    /// unresolved parents.
    pub dam_id: Option<DbId>,
    pub sire_id: Option<DbId>,
    pub name: String,
    /// Canonical identifier, either supplied by the row or generated.
    pub code: String,
    pub sex: String,
    pub status: String,
    pub hatch_date: Option<NaiveDate>,
    pub acquisition_date: NaiveDate,
    pub visual_traits: Vec<String>,
    pub het_traits: Vec<String>,
    pub original_breeder: Option<String>,
    pub breeding_line: Option<String>,
    pub lineage_path: Option<String>,
    pub generation: Option<i32>,
    pub is_breeder: bool,
    pub retired_breeder: bool,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a reptile record.
#[derive(Debug, Clone)]
pub struct CreateReptile {
    pub owner_id: DbId,
    pub species_id: DbId,
    pub morph_id: Option<DbId>,
    pub dam_id: Option<DbId>,
    pub sire_id: Option<DbId>,
    pub name: String,
    pub code: String,
    pub sex: String,
    pub status: String,
    pub hatch_date: Option<NaiveDate>,
    pub acquisition_date: NaiveDate,
    pub visual_traits: Vec<String>,
    pub het_traits: Vec<String>,
    pub original_breeder: Option<String>,
    pub breeding_line: Option<String>,
    pub lineage_path: Option<String>,
    pub generation: Option<i32>,
    pub is_breeder: bool,
    pub retired_breeder: bool,
    pub notes: Option<String>,
}
