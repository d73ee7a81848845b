//! Import orchestration: spreadsheet parsing and commit-side reconciliation.
//!
//! The pure pipeline stages (header mapping, normalization, validation,
//! parent resolution, preview assembly, code generation) live in
//! `scalebook_core::import`; this module supplies the pieces that touch
//! bytes and the database.

pub mod commit;
pub mod parse;
