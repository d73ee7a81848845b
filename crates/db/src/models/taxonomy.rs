//! Species and morph taxonomy models.
//!
//! Species may be owned by a user or shared globally (`is_global`); morphs
//! are always scoped to a species. Both are auto-created during import
//! commit when a selected row references a name the catalog lacks.

use scalebook_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `species` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Species {
    pub id: DbId,
    pub owner_id: Option<DbId>,
    pub name: String,
    pub care_level: String,
    pub is_global: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a species.
#[derive(Debug, Clone)]
pub struct CreateSpecies {
    pub owner_id: Option<DbId>,
    pub name: String,
    pub care_level: String,
    pub is_global: bool,
}

/// A row from the `morphs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Morph {
    pub id: DbId,
    pub species_id: DbId,
    pub owner_id: Option<DbId>,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a morph.
#[derive(Debug, Clone)]
pub struct CreateMorph {
    pub species_id: DbId,
    pub owner_id: Option<DbId>,
    pub name: String,
}
