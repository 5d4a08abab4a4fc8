/// Project model and database operations
///
/// A project is a named, owner-scoped bookmark: it references a previously
/// uploaded file and carries an opaque chart-configuration blob (axis
/// selections, filters, chart type). Projects are created on save and read
/// on list/load; they are never mutated or deleted.
///
/// The one invariant that matters here is ownership: a project is only
/// visible to and loadable by its owner. [`Project::load_for_owner`]
/// distinguishes "does not exist" from "belongs to someone else"
/// internally so the caller can log the difference, but the HTTP boundary
/// must collapse both into one opaque response (see the api crate's error
/// mapping) so probing for other users' project IDs learns nothing.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     owner_id INTEGER NOT NULL REFERENCES users (id),
///     name TEXT NOT NULL,
///     file_name TEXT NOT NULL,
///     config_json TEXT NOT NULL,
///     created_at TEXT NOT NULL
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Why a project load was refused
#[derive(Debug, thiserror::Error)]
pub enum ProjectAccess {
    /// No project with the requested ID exists
    #[error("project not found")]
    NotFound,

    /// The project exists but belongs to a different owner
    #[error("project belongs to a different owner")]
    Denied,

    /// Underlying database failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Full project record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID
    pub id: i64,

    /// Owning user
    pub owner_id: i64,

    /// Display name
    pub name: String,

    /// Stored name of the uploaded file this project charts
    pub file_name: String,

    /// Serialized chart configuration (opaque JSON)
    pub config_json: String,

    /// When the project was saved
    pub created_at: DateTime<Utc>,
}

/// Project summary returned by listings (no config blob)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectSummary {
    /// Unique project ID
    pub id: i64,

    /// Display name
    pub name: String,

    /// Stored name of the referenced upload
    #[serde(rename = "file")]
    pub file_name: String,

    /// When the project was saved
    pub created_at: DateTime<Utc>,
}

/// Input for saving a new project
#[derive(Debug, Clone)]
pub struct NewProject {
    pub owner_id: i64,
    pub name: String,
    pub file_name: String,
    /// Opaque chart configuration; round-trips through storage unchanged
    pub config: serde_json::Value,
}

impl Project {
    /// Persists a new project and returns the stored record
    ///
    /// The caller is responsible for checking that `file_name` refers to an
    /// existing upload; the store itself only records the reference.
    pub async fn create(pool: &SqlitePool, data: NewProject) -> Result<Self, sqlx::Error> {
        let config_json = data.config.to_string();

        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (owner_id, name, file_name, config_json, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id, owner_id, name, file_name, config_json, created_at
            "#,
        )
        .bind(data.owner_id)
        .bind(data.name)
        .bind(data.file_name)
        .bind(config_json)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(project)
    }

    /// Lists an owner's projects, newest first
    pub async fn list_by_owner(
        pool: &SqlitePool,
        owner_id: i64,
    ) -> Result<Vec<ProjectSummary>, sqlx::Error> {
        sqlx::query_as::<_, ProjectSummary>(
            r#"
            SELECT id, name, file_name, created_at
            FROM projects
            WHERE owner_id = ?1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await
    }

    /// Loads a project on behalf of an owner
    ///
    /// The ownership check is unconditional: a project that exists but
    /// belongs to someone else yields [`ProjectAccess::Denied`], never the
    /// record itself.
    pub async fn load_for_owner(
        pool: &SqlitePool,
        owner_id: i64,
        id: i64,
    ) -> Result<Self, ProjectAccess> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, owner_id, name, file_name, config_json, created_at
            FROM projects
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(ProjectAccess::NotFound)?;

        if project.owner_id != owner_id {
            return Err(ProjectAccess::Denied);
        }

        Ok(project)
    }

    /// Deserializes the stored chart configuration
    pub fn config(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.config_json)
    }
}
