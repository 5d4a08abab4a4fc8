/// User model and database operations
///
/// A user owns zero or more saved chart projects. Accounts are created at
/// registration, read back at login, and never mutated afterwards.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     username TEXT NOT NULL UNIQUE,
///     password_hash TEXT NOT NULL,
///     created_at TEXT NOT NULL
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use chartlab_shared::models::user::{CreateUser, User};
/// # use sqlx::SqlitePool;
/// # async fn example(pool: SqlitePool) -> Result<(), sqlx::Error> {
/// let user = User::create(
///     &pool,
///     CreateUser {
///         username: "ada".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///     },
/// )
/// .await?;
///
/// let found = User::find_by_username(&pool, "ada").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// User account record
///
/// Passwords are stored as Argon2id PHC strings, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: i64,

    /// Unique handle chosen at registration
    pub username: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Unique handle
    pub username: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the username already exists (unique constraint)
    /// or the database is unavailable.
    pub async fn create(pool: &SqlitePool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, created_at)
            VALUES (?1, ?2, ?3)
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(data.username)
        .bind(data.password_hash)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID, returning `None` if no such user exists
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Finds a user by username, returning `None` if no such user exists
    pub async fn find_by_username(
        pool: &SqlitePool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM users
            WHERE username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, DatabaseConfig};

    async fn test_pool() -> (tempfile::TempDir, SqlitePool) {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            url: format!("sqlite://{}", dir.path().join("users.db").display()),
            // A single connection keeps reads queued behind the insert's
            // async statement finalization; with more, `fetch_one` on
            // `INSERT .. RETURNING` can return before sqlx commits (sqlx
            // SQLite driver quirk) and a read on another connection races.
            max_connections: 1,
            ..Default::default()
        };
        let pool = create_pool(config).await.unwrap();
        run_migrations(&pool).await.unwrap();
        (dir, pool)
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let (_dir, pool) = test_pool().await;

        let user = User::create(
            &pool,
            CreateUser {
                username: "ada".to_string(),
                password_hash: "$argon2id$stub".to_string(),
            },
        )
        .await
        .unwrap();

        assert!(user.id > 0);

        let by_name = User::find_by_username(&pool, "ada").await.unwrap().unwrap();
        assert_eq!(by_name.id, user.id);

        let by_id = User::find_by_id(&pool, user.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "ada");
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let (_dir, pool) = test_pool().await;

        let data = CreateUser {
            username: "grace".to_string(),
            password_hash: "h".to_string(),
        };
        User::create(&pool, data.clone()).await.unwrap();
        assert!(User::create(&pool, data).await.is_err());
    }

    #[tokio::test]
    async fn test_find_missing_user_is_none() {
        let (_dir, pool) = test_pool().await;
        assert!(User::find_by_username(&pool, "nobody").await.unwrap().is_none());
        assert!(User::find_by_id(&pool, 9999).await.unwrap().is_none());
    }
}
