//! Repository for reptile records.

use scalebook_core::types::DbId;
use sqlx::PgPool;

use crate::models::reptile::{CreateReptile, Reptile};

/// Column list for `reptiles`.
const REPTILE_COLUMNS: &str =
    "id, owner_id, species_id, morph_id, dam_id, sire_id, name, code, sex, status, \
     hatch_date, acquisition_date, visual_traits, het_traits, original_breeder, \
     breeding_line, lineage_path, generation, is_breeder, retired_breeder, notes, \
     created_at, updated_at";

/// Provides CRUD operations for reptile records.
pub struct ReptileRepo;

impl ReptileRepo {
    /// Insert a new reptile record.
    pub async fn create(pool: &PgPool, input: &CreateReptile) -> Result<Reptile, sqlx::Error> {
        let sql = format!(
            "INSERT INTO reptiles \
                (owner_id, species_id, morph_id, dam_id, sire_id, name, code, sex, \
                 status, hatch_date, acquisition_date, visual_traits, het_traits, \
                 original_breeder, breeding_line, lineage_path, generation, \
                 is_breeder, retired_breeder, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, \
                     $15, $16, $17, $18, $19, $20) \
             RETURNING {REPTILE_COLUMNS}"
        );
        sqlx::query_as::<_, Reptile>(&sql)
            .bind(input.owner_id)
            .bind(input.species_id)
            .bind(input.morph_id)
            .bind(input.dam_id)
            .bind(input.sire_id)
            .bind(&input.name)
            .bind(&input.code)
            .bind(&input.sex)
            .bind(&input.status)
            .bind(input.hatch_date)
            .bind(input.acquisition_date)
            .bind(&input.visual_traits)
            .bind(&input.het_traits)
            .bind(&input.original_breeder)
            .bind(&input.breeding_line)
            .bind(&input.lineage_path)
            .bind(input.generation)
            .bind(input.is_breeder)
            .bind(input.retired_breeder)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find a user's reptile by name (case-insensitive).
    pub async fn find_by_name_for_user(
        pool: &PgPool,
        user_id: DbId,
        name: &str,
    ) -> Result<Option<Reptile>, sqlx::Error> {
        let sql = format!(
            "SELECT {REPTILE_COLUMNS} FROM reptiles \
             WHERE owner_id = $1 AND LOWER(name) = LOWER($2)"
        );
        sqlx::query_as::<_, Reptile>(&sql)
            .bind(user_id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Count a user's reptile records.
    pub async fn count_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM reptiles WHERE owner_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }
}
