//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Lookups that may
//! legitimately find nothing return `Option` rather than an error, so
//! "not found" is never conflated with a store failure.

pub mod growth_repo;
pub mod import_log_repo;
pub mod morph_repo;
pub mod reptile_repo;
pub mod species_repo;
pub mod user_repo;

pub use growth_repo::GrowthRepo;
pub use import_log_repo::ImportLogRepo;
pub use morph_repo::MorphRepo;
pub use reptile_repo::ReptileRepo;
pub use species_repo::SpeciesRepo;
pub use user_repo::UserRepo;
