/// Database connection pool management
///
/// This module provides the SQLite connection pool used by the API server.
/// The database file is created on first connect so a fresh checkout can
/// start without manual bootstrapping.
///
/// # Example
///
/// ```no_run
/// use chartlab_shared::db::pool::{create_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: "sqlite://chartlab.db".to_string(),
///         max_connections: 5,
///         connect_timeout_seconds: 30,
///     };
///
///     let pool = create_pool(config).await?;
///
///     let row: (i64,) = sqlx::query_as("SELECT 1")
///         .fetch_one(&pool)
///         .await?;
///     assert_eq!(row.0, 1);
///     Ok(())
/// }
/// ```

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Configuration for the database connection pool
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// SQLite connection URL (e.g., "sqlite://chartlab.db")
    pub url: String,

    /// Maximum number of connections in the pool
    ///
    /// SQLite serializes writes internally, so a small pool is enough.
    pub max_connections: u32,

    /// Timeout for acquiring a connection from the pool (seconds)
    pub connect_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://chartlab.db".to_string(),
            max_connections: 5,
            connect_timeout_seconds: 30,
        }
    }
}

/// Creates a connection pool for the configured SQLite database
///
/// The database file is created if it does not exist yet, and foreign key
/// enforcement is switched on for every connection (SQLite leaves it off
/// by default, which would silently break the project → user ownership
/// constraint).
///
/// # Errors
///
/// Returns an error if the URL cannot be parsed or the database file
/// cannot be created or opened.
pub async fn create_pool(config: DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    debug!("Connecting to database at {}", config.url);

    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .connect_with(options)
        .await?;

    info!(
        "Database pool ready ({} max connections)",
        config.max_connections
    );

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_pool_creates_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let config = DatabaseConfig {
            url: format!("sqlite://{}", db_path.display()),
            ..Default::default()
        };

        let pool = create_pool(config).await.unwrap();
        let row: (i64,) = sqlx::query_as("SELECT 41 + 1")
            .fetch_one(&pool)
            .await
            .unwrap();

        assert_eq!(row.0, 42);
        assert!(db_path.exists());
    }
}
