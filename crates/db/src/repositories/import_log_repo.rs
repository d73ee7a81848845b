//! Repository for import attempt logs.

use scalebook_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::import_log::{CreateImportLog, ImportLog};

/// Column list for `import_logs`.
const IMPORT_LOG_COLUMNS: &str =
    "id, user_id, batch_id, total_rows, imported, failed, created_at";

/// Provides access to the import attempt log.
pub struct ImportLogRepo;

impl ImportLogRepo {
    /// Record a committed import attempt.
    pub async fn create(pool: &PgPool, input: &CreateImportLog) -> Result<ImportLog, sqlx::Error> {
        let sql = format!(
            "INSERT INTO import_logs (user_id, batch_id, total_rows, imported, failed) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {IMPORT_LOG_COLUMNS}"
        );
        sqlx::query_as::<_, ImportLog>(&sql)
            .bind(input.user_id)
            .bind(input.batch_id)
            .bind(input.total_rows)
            .bind(input.imported)
            .bind(input.failed)
            .fetch_one(pool)
            .await
    }

    /// Count a user's import attempts since `cutoff` (the rate-limit window).
    pub async fn count_since(
        pool: &PgPool,
        user_id: DbId,
        cutoff: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM import_logs WHERE user_id = $1 AND created_at >= $2",
        )
        .bind(user_id)
        .bind(cutoff)
        .fetch_one(pool)
        .await
    }
}
