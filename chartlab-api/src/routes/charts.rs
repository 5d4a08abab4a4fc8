/// Chart generation endpoint
///
/// # Endpoint
///
/// ```text
/// POST /v1/charts/generate
/// Content-Type: application/json
///
/// {
///   "file": "20240115120000_sales.csv",
///   "xcol": "month",
///   "ycol": "revenue",
///   "filters": { "region": { "type": "text", "text": "north" } }
/// }
/// ```
///
/// # Response
///
/// ```json
/// { "x": ["Jan", "Feb"], "y": [1200.5, 980.0], "rows": 2 }
/// ```
///
/// The table is rebuilt from the stored file on every call, filtered, and
/// projected into the two requested columns.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Json};
use chartlab_shared::table::{apply_filters, extract_series, load_table, FilterSpec};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Chart generation request
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateRequest {
    /// Stored filename returned by the upload endpoint
    #[validate(length(min = 1, message = "file is required"))]
    pub file: String,

    /// Column to render on the x axis
    #[validate(length(min = 1, message = "xcol is required"))]
    pub xcol: String,

    /// Column to render on the y axis
    #[validate(length(min = 1, message = "ycol is required"))]
    pub ycol: String,

    /// Per-column predicates applied before projection
    #[serde(default)]
    pub filters: FilterSpec,
}

/// Chart generation response
#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    /// X values, stringified
    pub x: Vec<String>,

    /// Y values, native scalar types preserved (numbers stay numbers)
    pub y: Vec<serde_json::Value>,

    /// Row count after filtering
    pub rows: usize,
}

/// Generates filtered x/y arrays for client-side rendering
///
/// # Errors
///
/// - `404 Not Found`: no upload with that stored name
/// - `400 Bad Request`: parse failure, non-numeric cell under a range
///   filter, or unknown x/y column
pub async fn generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> ApiResult<Json<GenerateResponse>> {
    req.validate().map_err(ApiError::from_validation)?;

    if !state.files.upload_exists(&req.file) {
        return Err(ApiError::NotFound("file not found".to_string()));
    }

    let table = load_table(&state.files.upload_path(&req.file))?;
    let filtered = apply_filters(&table, &req.filters)?;
    let series = extract_series(&filtered, &req.xcol, &req.ycol)?;

    tracing::debug!(
        "Chart for {}: {} of {} rows after filtering",
        req.file,
        filtered.row_count(),
        table.row_count()
    );

    Ok(Json(GenerateResponse {
        rows: series.len(),
        y: series.y.iter().map(|v| v.to_json()).collect(),
        x: series.x,
    }))
}
