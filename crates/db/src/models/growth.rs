//! Growth measurement model.
//!
//! Import commit derives one entry per row that supplied a weight or
//! length, so the imported animal starts its growth history at day one.

use chrono::NaiveDate;
use scalebook_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `growth_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GrowthEntry {
    pub id: DbId,
    pub reptile_id: DbId,
    pub measured_on: NaiveDate,
    pub weight_grams: Option<f64>,
    pub length_cm: Option<f64>,
    pub created_at: Timestamp,
}

/// DTO for inserting a growth entry.
#[derive(Debug, Clone)]
pub struct CreateGrowthEntry {
    pub reptile_id: DbId,
    pub measured_on: NaiveDate,
    pub weight_grams: Option<f64>,
    pub length_cm: Option<f64>,
}
