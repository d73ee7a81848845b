//! Repository for species taxonomy entries.

use scalebook_core::types::DbId;
use sqlx::PgPool;

use crate::models::taxonomy::{CreateSpecies, Species};

/// Column list for `species`.
const SPECIES_COLUMNS: &str =
    "id, owner_id, name, care_level, is_global, created_at, updated_at";

/// Provides CRUD operations for species.
pub struct SpeciesRepo;

impl SpeciesRepo {
    /// List the species visible to a user: their own plus globally shared
    /// entries, ordered by name.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Species>, sqlx::Error> {
        let sql = format!(
            "SELECT {SPECIES_COLUMNS} FROM species \
             WHERE owner_id = $1 OR is_global = true \
             ORDER BY name"
        );
        sqlx::query_as::<_, Species>(&sql)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Insert a new species.
    pub async fn create(pool: &PgPool, input: &CreateSpecies) -> Result<Species, sqlx::Error> {
        let sql = format!(
            "INSERT INTO species (owner_id, name, care_level, is_global) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {SPECIES_COLUMNS}"
        );
        sqlx::query_as::<_, Species>(&sql)
            .bind(input.owner_id)
            .bind(&input.name)
            .bind(&input.care_level)
            .bind(input.is_global)
            .fetch_one(pool)
            .await
    }
}
