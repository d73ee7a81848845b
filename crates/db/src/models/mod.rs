//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize`-free create DTO for inserts (built server-side)

pub mod growth;
pub mod import_log;
pub mod reptile;
pub mod taxonomy;
pub mod user;
