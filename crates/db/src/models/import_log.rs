//! Import attempt log.
//!
//! One row per committed import. The trailing-hour count of a user's rows
//! here is the rate limiter's window source.

use scalebook_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `import_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ImportLog {
    pub id: DbId,
    pub user_id: DbId,
    pub batch_id: Uuid,
    pub total_rows: i32,
    pub imported: i32,
    pub failed: i32,
    pub created_at: Timestamp,
}

/// DTO for inserting an import log row.
#[derive(Debug, Clone)]
pub struct CreateImportLog {
    pub user_id: DbId,
    pub batch_id: Uuid,
    pub total_rows: i32,
    pub imported: i32,
    pub failed: i32,
}
