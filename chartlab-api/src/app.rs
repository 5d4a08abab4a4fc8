/// Application state and router builder
///
/// This module defines the shared application state and builds the Axum
/// router with all routes and middleware.

use crate::{config::Config, error::ApiError, storage::FileStore};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use chartlab_shared::auth::middleware::authenticate;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor; uses Arc
/// internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Upload/export file stores
    pub files: FileStore,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: SqlitePool, config: Config) -> Self {
        let files = FileStore::new(&config.storage);
        Self {
            db,
            config: Arc::new(config),
            files,
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router
///
/// ```text
/// /
/// ├── /health                       # Health check (public)
/// ├── /uploads/*  /exports/*        # Static retrieval of stored files
/// └── /v1/                          # API v1
///     ├── /auth/    register | login | refresh      (public)
///     ├── /files/   upload | columns                (public)
///     ├── /charts/  generate                        (public)
///     ├── /projects POST / GET / GET :id            (JWT required)
///     └── /exports  POST                            (public)
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    // File upload and inspection (public, like the charts they feed)
    let file_routes = Router::new()
        .route("/upload", post(routes::files::upload))
        .route("/columns", post(routes::files::columns));

    // Chart generation
    let chart_routes = Router::new().route("/generate", post(routes::charts::generate));

    // Project persistence (requires an authenticated owner)
    let project_routes = Router::new()
        .route("/", post(routes::projects::save_project))
        .route("/", get(routes::projects::list_projects))
        .route("/:id", get(routes::projects::load_project))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    // Chart image exports
    let export_routes = Router::new().route("/", post(routes::exports::save_export));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/files", file_routes)
        .nest("/charts", chart_routes)
        .nest("/projects", project_routes)
        .nest("/exports", export_routes);

    // Static retrieval of previously stored uploads and exports
    let static_routes = Router::new()
        .nest_service("/uploads", ServeDir::new(state.files.upload_root()))
        .nest_service("/exports", ServeDir::new(state.files.export_root()));

    let cors = cors_layer(&state);

    Router::new()
        .merge(health_routes)
        .merge(static_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// JWT Bearer middleware for the project routes
///
/// Validates the Authorization header and stores an
/// [`chartlab_shared::auth::middleware::AuthContext`] in the request
/// extensions for handlers to extract.
async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_context = authenticate(req.headers(), state.jwt_secret())?;
    req.extensions_mut().insert(auth_context);
    Ok(next.run(req).await)
}

fn cors_layer(state: &AppState) -> CorsLayer {
    if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    }
}
