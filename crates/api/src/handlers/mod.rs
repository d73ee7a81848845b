//! Request handlers.
//!
//! Handlers delegate to the pure pipeline in `scalebook_core::import` and
//! the repositories in `scalebook_db`, mapping errors via
//! [`crate::error::AppError`].

pub mod import;
