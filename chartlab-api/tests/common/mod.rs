/// Common test utilities for integration tests
///
/// Builds a fully wired router against a throwaway sqlite database and
/// tempdir-backed storage roots, plus helpers for authenticated requests.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use chartlab_api::app::{build_router, AppState};
use chartlab_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig, StorageConfig};
use chartlab_shared::auth::jwt::{create_token, Claims, TokenType};
use chartlab_shared::db::{create_pool, run_migrations};
use chartlab_shared::models::user::{CreateUser, User};
use sqlx::SqlitePool;
use tower::ServiceExt as _;

pub const TEST_JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context containing all necessary resources
///
/// The tempdir must stay alive for the duration of the test; dropping it
/// deletes the database file and storage roots.
pub struct TestContext {
    #[allow(dead_code)]
    pub dir: tempfile::TempDir,
    pub db: SqlitePool,
    pub app: axum::Router,
    pub config: Config,
}

impl TestContext {
    /// Creates a new test context with a fresh database and storage roots
    pub async fn new() -> anyhow::Result<Self> {
        let dir = tempfile::tempdir()?;

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url: format!("sqlite://{}", dir.path().join("test.db").display()),
                max_connections: 5,
            },
            jwt: JwtConfig {
                secret: TEST_JWT_SECRET.to_string(),
            },
            storage: StorageConfig {
                upload_dir: dir.path().join("uploads"),
                export_dir: dir.path().join("exports"),
            },
        };

        let db = create_pool(chartlab_shared::db::DatabaseConfig {
            url: config.database.url.clone(),
            max_connections: config.database.max_connections,
            ..Default::default()
        })
        .await?;
        run_migrations(&db).await?;

        let state = AppState::new(db.clone(), config.clone());
        state.files.ensure_dirs()?;
        let app = build_router(state);

        Ok(TestContext {
            dir,
            db,
            app,
            config,
        })
    }

    /// Creates a user directly in the database and returns it with a
    /// valid access token
    pub async fn make_user(&self, username: &str) -> anyhow::Result<(User, String)> {
        let user = User::create(
            &self.db,
            CreateUser {
                username: username.to_string(),
                password_hash: chartlab_shared::auth::password::hash_password("password123")?,
            },
        )
        .await?;

        let claims = Claims::new(user.id, user.username.clone(), TokenType::Access);
        let token = create_token(&claims, &self.config.jwt.secret)?;

        Ok((user, token))
    }

    /// Sends a JSON POST, optionally authenticated
    pub async fn post_json(
        &self,
        uri: &str,
        token: Option<&str>,
        body: serde_json::Value,
    ) -> Response {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        self.app
            .clone()
            .oneshot(builder.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap()
    }

    /// Sends a GET, optionally authenticated
    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        self.app
            .clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    /// Uploads file bytes through the multipart endpoint and returns the
    /// stored filename from the response
    pub async fn upload(&self, filename: &str, content: &[u8]) -> serde_json::Value {
        let boundary = "test-boundary-7MA4YWxkTrZu0gW";
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
                filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

        let request = Request::builder()
            .method("POST")
            .uri("/v1/files/upload")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        read_json(response).await
    }
}

/// Reads a response body as JSON, panicking with the body text on failure
pub async fn read_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| panic!("not JSON: {}", String::from_utf8_lossy(&bytes)))
}

/// Asserts a status, rendering the body on mismatch for debuggability
pub async fn assert_status(response: Response, expected: StatusCode) -> serde_json::Value {
    let status = response.status();
    let body = read_json(response).await;
    assert_eq!(status, expected, "unexpected status, body: {}", body);
    body
}
