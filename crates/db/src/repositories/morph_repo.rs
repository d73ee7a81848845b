//! Repository for morph taxonomy entries.

use scalebook_core::types::DbId;
use sqlx::PgPool;

use crate::models::taxonomy::{CreateMorph, Morph};

/// Column list for `morphs`.
const MORPH_COLUMNS: &str = "id, species_id, owner_id, name, created_at, updated_at";

/// Provides CRUD operations for morphs.
pub struct MorphRepo;

impl MorphRepo {
    /// List the morphs visible to a user: their own plus shared entries
    /// with no owner, ordered by name.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Morph>, sqlx::Error> {
        let sql = format!(
            "SELECT {MORPH_COLUMNS} FROM morphs \
             WHERE owner_id = $1 OR owner_id IS NULL \
             ORDER BY name"
        );
        sqlx::query_as::<_, Morph>(&sql)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Insert a new morph tied to a species.
    pub async fn create(pool: &PgPool, input: &CreateMorph) -> Result<Morph, sqlx::Error> {
        let sql = format!(
            "INSERT INTO morphs (species_id, owner_id, name) \
             VALUES ($1, $2, $3) \
             RETURNING {MORPH_COLUMNS}"
        );
        sqlx::query_as::<_, Morph>(&sql)
            .bind(input.species_id)
            .bind(input.owner_id)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }
}
