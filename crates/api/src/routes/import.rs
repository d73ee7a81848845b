//! Route definitions for the bulk spreadsheet importer.
//!
//! Mounted at `/reptiles/import`.

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::handlers::import;
use crate::state::AppState;

/// Multipart bodies may slightly exceed the 2 MiB file limit because of
/// boundary overhead; the handler enforces the file-size limit itself.
const BODY_LIMIT_BYTES: usize = 4 * 1024 * 1024;

/// Routes mounted at `/reptiles/import`.
///
/// ```text
/// POST   /preview    -> preview_import  (multipart)
/// POST   /commit     -> commit_import
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/preview", post(import::preview_import))
        .route("/commit", post(import::commit_import))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
}
