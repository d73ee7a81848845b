//! User account model.
//!
//! Authentication and session handling live outside this service; the
//! importer only needs the acting user's subscription allowance.

use scalebook_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub display_name: String,
    pub role: String,
    /// Maximum number of reptile records the subscription allows.
    /// `None` means unlimited.
    pub reptile_limit: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
