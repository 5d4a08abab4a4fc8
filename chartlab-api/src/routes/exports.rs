/// Chart image export endpoint
///
/// # Endpoint
///
/// ```text
/// POST /v1/exports
/// Content-Type: application/json
///
/// { "name": "my-chart.png", "data_url": "data:image/png;base64,iVBOR..." }
/// ```
///
/// # Response
///
/// ```json
/// { "url": "/exports/my-chart.png" }
/// ```
///
/// The returned path is served read-only by the static `/exports` route.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

/// Save export request
#[derive(Debug, Deserialize)]
pub struct SaveExportRequest {
    /// Desired filename; generated when omitted, sanitized either way
    pub name: Option<String>,

    /// Data-URI-style payload: `<media-type prefix>,<base64 payload>`
    #[serde(rename = "data_url", alias = "dataURL")]
    pub data_url: String,
}

/// Save export response
#[derive(Debug, Serialize)]
pub struct SaveExportResponse {
    /// Retrieval path for the stored image
    pub url: String,
}

/// Decodes and stores an exported chart image
///
/// # Errors
///
/// - `400 Bad Request`: missing comma separator or invalid base64
pub async fn save_export(
    State(state): State<AppState>,
    Json(req): Json<SaveExportRequest>,
) -> ApiResult<Json<SaveExportResponse>> {
    if req.data_url.is_empty() {
        return Err(ApiError::BadRequest("dataURL required".to_string()));
    }

    let url = state.files.save_export(req.name, &req.data_url)?;

    Ok(Json(SaveExportResponse { url }))
}
