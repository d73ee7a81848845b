//! Handlers for the bulk spreadsheet importer.
//!
//! Two-phase protocol: `preview` parses and validates an uploaded file
//! without touching the catalog; `commit` receives the previewed rows back
//! plus the indices the user chose to import, and creates records with
//! per-row failure tolerance.
//!
//! No server-side session state persists between the phases -- the client
//! resubmits the full row set at commit time.

use axum::extract::{Multipart, State};
use axum::Json;
use chrono::{Duration, Utc};
use scalebook_core::error::CoreError;
use scalebook_core::import::{
    assemble_preview, ImportPreview, NormalizedRow, MAX_IMPORT_FILE_BYTES, MAX_IMPORT_ROWS,
};
use scalebook_core::rate_limit::{import_allowed, MAX_IMPORTS_PER_WINDOW, RATE_LIMIT_WINDOW_MINUTES};
use scalebook_core::types::DbId;
use scalebook_db::models::import_log::CreateImportLog;
use scalebook_db::repositories::{ImportLogRepo, ReptileRepo, UserRepo};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::import::commit::{commit_rows, CommitOutcome};
use crate::import::parse::{detect_kind, parse_spreadsheet};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ── Preview ──────────────────────────────────────────────────────────

/// POST /api/v1/reptiles/import/preview
///
/// Accept a multipart CSV/XLSX upload and return the dry-run report:
/// header mapping, normalized rows, per-row validity, parent-reference
/// resolution, and taxonomy counts. Nothing is written to the catalog.
pub async fn preview_import(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<ImportPreview>>> {
    check_rate_limit(&state, user.user_id).await?;

    // Pull the uploaded file out of the multipart body.
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") || field.file_name().is_some() {
            let filename = field.file_name().unwrap_or("upload").to_string();
            let content_type = field.content_type().map(String::from);
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            upload = Some((filename, content_type, data));
            break;
        }
    }

    let Some((filename, content_type, data)) = upload else {
        return Err(AppError::BadRequest("No file provided".to_string()));
    };

    if data.len() > MAX_IMPORT_FILE_BYTES {
        return Err(AppError::BadRequest(
            "File exceeds maximum size of 2MB".to_string(),
        ));
    }

    let Some(kind) = detect_kind(content_type.as_deref(), &filename) else {
        return Err(AppError::BadRequest("Unsupported file type".to_string()));
    };

    let sheet = parse_spreadsheet(kind, &data)?;
    let preview = assemble_preview(sheet.headers, sheet.rows)?;

    check_subscription(&state, user.user_id, preview.total_rows).await?;

    tracing::info!(
        user_id = user.user_id,
        total_rows = preview.total_rows,
        valid = preview.valid_rows.len(),
        invalid = preview.invalid_rows.len(),
        "Import preview generated"
    );

    Ok(Json(DataResponse { data: preview }))
}

// ── Commit ───────────────────────────────────────────────────────────

/// Request body for import commit: the full normalized row set as echoed
/// by preview, plus the row indices the user chose to import.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRequest {
    pub rows: Vec<NormalizedRow>,
    pub selected_rows: Vec<usize>,
}

/// POST /api/v1/reptiles/import/commit
///
/// Create records for the selected rows, auto-creating missing taxonomy
/// entries and collecting per-row errors without aborting the batch.
pub async fn commit_import(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<CommitRequest>,
) -> AppResult<Json<DataResponse<CommitOutcome>>> {
    check_rate_limit(&state, user.user_id).await?;

    if body.rows.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "No data found".to_string(),
        )));
    }
    if body.rows.len() > MAX_IMPORT_ROWS {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Import exceeds the maximum limit of {MAX_IMPORT_ROWS} rows"
        ))));
    }
    if body.selected_rows.is_empty() {
        return Err(AppError::BadRequest(
            "No rows selected for import".to_string(),
        ));
    }

    check_subscription(&state, user.user_id, body.selected_rows.len()).await?;

    let outcome = commit_rows(&state.pool, user.user_id, &body.rows, &body.selected_rows).await?;

    // Log the attempt so subsequent rate-limit checks see it. The records
    // are already committed, so a logging failure must not fail the call.
    let log = CreateImportLog {
        user_id: user.user_id,
        batch_id: Uuid::new_v4(),
        total_rows: body.selected_rows.len() as i32,
        imported: outcome.reptiles.len() as i32,
        failed: outcome.errors.len() as i32,
    };
    if let Err(e) = ImportLogRepo::create(&state.pool, &log).await {
        tracing::warn!(user_id = user.user_id, error = %e, "Failed to log import attempt");
    }

    Ok(Json(DataResponse { data: outcome }))
}

// ── Private helpers ──────────────────────────────────────────────────

/// Reject with 429 when the user has exhausted the trailing-hour window.
async fn check_rate_limit(state: &AppState, user_id: DbId) -> Result<(), AppError> {
    let cutoff = Utc::now() - Duration::minutes(RATE_LIMIT_WINDOW_MINUTES);
    let recent = ImportLogRepo::count_since(&state.pool, user_id, cutoff).await?;

    if !import_allowed(recent) {
        return Err(AppError::Core(CoreError::RateLimited(format!(
            "Rate limit exceeded: a maximum of {MAX_IMPORTS_PER_WINDOW} imports per hour is allowed"
        ))));
    }
    Ok(())
}

/// Reject with 403 when importing `incoming_rows` would push the user past
/// their subscription allowance.
async fn check_subscription(
    state: &AppState,
    user_id: DbId,
    incoming_rows: usize,
) -> Result<(), AppError> {
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Unknown user".to_string())))?;

    let Some(limit) = user.reptile_limit else {
        return Ok(()); // unlimited plan
    };

    let current = ReptileRepo::count_for_user(&state.pool, user_id).await?;
    if current + incoming_rows as i64 > i64::from(limit) {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Importing {incoming_rows} reptiles would exceed your subscription limit of {limit}"
        ))));
    }
    Ok(())
}
