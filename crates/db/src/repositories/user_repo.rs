//! Repository for user accounts.

use scalebook_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::User;

/// Column list for `users`.
const USER_COLUMNS: &str =
    "id, email, display_name, role, reptile_limit, created_at, updated_at";

/// Read access to user accounts.
pub struct UserRepo;

impl UserRepo {
    /// Find a user by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
