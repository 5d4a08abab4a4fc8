/// Project persistence endpoints
///
/// All three sit behind the JWT Bearer layer, so an unauthenticated
/// request never reaches these handlers.
///
/// # Endpoints
///
/// - `POST /v1/projects` - save the current file + chart configuration
/// - `GET  /v1/projects` - list the caller's projects, newest first
/// - `GET  /v1/projects/:id` - load one project with its configuration
///
/// Loading deliberately answers with ONE opaque 404 message whether the
/// project is missing or belongs to someone else (see the
/// `From<ProjectAccess>` mapping in the error module).

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chartlab_shared::{
    auth::middleware::AuthContext,
    models::project::{NewProject, Project, ProjectSummary},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Save project request
#[derive(Debug, Deserialize, Validate)]
pub struct SaveProjectRequest {
    /// Display name
    #[serde(default = "default_project_name")]
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: String,

    /// Stored filename returned by the upload endpoint
    #[validate(length(min = 1, message = "file is required"))]
    pub file: String,

    /// Opaque chart configuration (axis selections, filters, chart type)
    #[serde(default)]
    pub config: serde_json::Value,
}

fn default_project_name() -> String {
    "Untitled".to_string()
}

/// Save project response
#[derive(Debug, Serialize)]
pub struct SaveProjectResponse {
    /// Identifier of the new project
    pub project_id: i64,
}

/// Project list response
#[derive(Debug, Serialize)]
pub struct ListProjectsResponse {
    /// Caller's projects, newest first
    pub projects: Vec<ProjectSummary>,
}

/// Full project response
#[derive(Debug, Serialize)]
pub struct LoadProjectResponse {
    pub id: i64,
    pub name: String,
    pub file: String,
    /// Deserialized chart configuration, exactly as saved
    pub config: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Saves a new project for the authenticated owner
///
/// # Errors
///
/// - `404 Not Found`: the referenced file was never uploaded
/// - `422 Unprocessable Entity`: validation failed
pub async fn save_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<SaveProjectRequest>,
) -> ApiResult<Json<SaveProjectResponse>> {
    req.validate().map_err(ApiError::from_validation)?;

    // The file reference must point at an existing upload
    if !state.files.upload_exists(&req.file) {
        return Err(ApiError::NotFound("file not found".to_string()));
    }

    let project = Project::create(
        &state.db,
        NewProject {
            owner_id: auth.user_id,
            name: req.name,
            file_name: req.file,
            config: req.config,
        },
    )
    .await?;

    tracing::info!(
        "User {} saved project {} ({})",
        auth.username,
        project.id,
        project.name
    );

    Ok(Json(SaveProjectResponse {
        project_id: project.id,
    }))
}

/// Lists the caller's projects, newest first
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ListProjectsResponse>> {
    let projects = Project::list_by_owner(&state.db, auth.user_id).await?;

    Ok(Json(ListProjectsResponse { projects }))
}

/// Loads one project with its deserialized configuration
///
/// # Errors
///
/// - `404 Not Found`: missing project OR someone else's project; the
///   response does not distinguish the two
pub async fn load_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<LoadProjectResponse>> {
    let project = Project::load_for_owner(&state.db, auth.user_id, id)
        .await
        .map_err(|e| {
            // The distinction is logged server-side only
            tracing::debug!("Project {} load refused for user {}: {}", id, auth.user_id, e);
            ApiError::from(e)
        })?;

    let config = project
        .config()
        .map_err(|e| ApiError::InternalError(format!("stored config is corrupt: {}", e)))?;

    Ok(Json(LoadProjectResponse {
        id: project.id,
        name: project.name,
        file: project.file_name,
        config,
        created_at: project.created_at,
    }))
}
