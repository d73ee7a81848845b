pub mod health;
pub mod import;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /reptiles/import/preview    import preview (multipart upload)
/// /reptiles/import/commit     import commit
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/reptiles/import", import::router())
}
