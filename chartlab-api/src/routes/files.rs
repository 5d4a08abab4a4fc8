/// File upload and inspection endpoints
///
/// # Endpoints
///
/// - `POST /v1/files/upload` - multipart upload, returns a preview
/// - `POST /v1/files/columns` - column list and row count for an upload
///
/// Uploaded files are parsed fresh on every request that touches them;
/// nothing tabular is cached server-side.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Multipart, State},
    Json,
};
use chartlab_shared::table::load_table;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// How many rows the upload response previews
const PREVIEW_ROWS: usize = 8;

/// Upload response
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Generated stored filename; reference it in later requests
    pub file: String,

    /// Column names in source order
    pub columns: Vec<String>,

    /// First rows as objects keyed by column name (missing cells as "")
    pub preview: Vec<serde_json::Value>,
}

/// Columns query request
#[derive(Debug, Deserialize, Validate)]
pub struct ColumnsRequest {
    /// Stored filename returned by the upload endpoint
    #[validate(length(min = 1, message = "file is required"))]
    pub file: String,
}

/// Columns query response
#[derive(Debug, Serialize)]
pub struct ColumnsResponse {
    /// Column names in source order
    pub columns: Vec<String>,

    /// Total data row count
    pub rows: usize,
}

/// Accepts a multipart upload (field name `file`) and returns a preview
///
/// # Errors
///
/// - `400 Bad Request`: no file field, empty filename, unsupported
///   extension, or unparseable content (with the cause text)
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let mut uploaded: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field
            .file_name()
            .map(ToString::to_string)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ApiError::BadRequest("empty filename".to_string()))?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {}", e)))?;

        uploaded = Some((original_name, bytes.to_vec()));
    }

    let (original_name, bytes) =
        uploaded.ok_or_else(|| ApiError::BadRequest("no file provided".to_string()))?;

    let stored_name = state.files.store_upload(&original_name, &bytes)?;

    // Quick read back for preview columns and first few rows
    let table = load_table(&state.files.upload_path(&stored_name))?;

    tracing::info!(
        "Upload {} stored as {} ({} rows)",
        original_name,
        stored_name,
        table.row_count()
    );

    Ok(Json(UploadResponse {
        file: stored_name,
        columns: table.columns().to_vec(),
        preview: table.preview(PREVIEW_ROWS),
    }))
}

/// Returns the column list and row count for a stored upload
///
/// # Errors
///
/// - `404 Not Found`: no upload with that stored name
/// - `400 Bad Request`: the file no longer parses
pub async fn columns(
    State(state): State<AppState>,
    Json(req): Json<ColumnsRequest>,
) -> ApiResult<Json<ColumnsResponse>> {
    req.validate().map_err(ApiError::from_validation)?;

    if !state.files.upload_exists(&req.file) {
        return Err(ApiError::NotFound("file not found".to_string()));
    }

    let table = load_table(&state.files.upload_path(&req.file))?;

    Ok(Json(ColumnsResponse {
        columns: table.columns().to_vec(),
        rows: table.row_count(),
    }))
}
