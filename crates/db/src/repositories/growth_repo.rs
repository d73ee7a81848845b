//! Repository for growth measurements.

use sqlx::PgPool;

use crate::models::growth::{CreateGrowthEntry, GrowthEntry};

/// Column list for `growth_entries`.
const GROWTH_COLUMNS: &str =
    "id, reptile_id, measured_on, weight_grams, length_cm, created_at";

/// Provides CRUD operations for growth entries.
pub struct GrowthRepo;

impl GrowthRepo {
    /// Insert a new growth entry.
    pub async fn create(
        pool: &PgPool,
        input: &CreateGrowthEntry,
    ) -> Result<GrowthEntry, sqlx::Error> {
        let sql = format!(
            "INSERT INTO growth_entries (reptile_id, measured_on, weight_grams, length_cm) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {GROWTH_COLUMNS}"
        );
        sqlx::query_as::<_, GrowthEntry>(&sql)
            .bind(input.reptile_id)
            .bind(input.measured_on)
            .bind(input.weight_grams)
            .bind(input.length_cm)
            .fetch_one(pool)
            .await
    }
}
