/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Register new user
/// - `POST /v1/auth/login` - Login and get tokens
/// - `POST /v1/auth/refresh` - Refresh access token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Json};
use chartlab_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Unique handle
    #[validate(length(min = 1, max = 80, message = "Username must be 1-80 characters"))]
    pub username: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Unique handle
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response for both registration and login
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// User ID
    pub user_id: i64,

    /// Username
    pub username: String,

    /// Access token (24h)
    pub access_token: String,

    /// Refresh token (30d)
    pub refresh_token: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// Refresh token
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token (24h)
    pub access_token: String,
}

fn issue_tokens(user: &User, secret: &str) -> ApiResult<TokenResponse> {
    let access = jwt::Claims::new(user.id, user.username.clone(), jwt::TokenType::Access);
    let refresh = jwt::Claims::new(user.id, user.username.clone(), jwt::TokenType::Refresh);

    Ok(TokenResponse {
        user_id: user.id,
        username: user.username.clone(),
        access_token: jwt::create_token(&access, secret)?,
        refresh_token: jwt::create_token(&refresh, secret)?,
    })
}

/// Register a new user
///
/// # Errors
///
/// - `409 Conflict`: username already taken
/// - `422 Unprocessable Entity`: validation failed
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<TokenResponse>> {
    req.validate().map_err(ApiError::from_validation)?;

    if User::find_by_username(&state.db, &req.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("username exists".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            password_hash,
        },
    )
    .await?;

    tracing::info!("Registered user {} (id {})", user.username, user.id);

    Ok(Json(issue_tokens(&user, state.jwt_secret())?))
}

/// Login with username and password
///
/// # Errors
///
/// - `401 Unauthorized`: unknown username or wrong password (same message
///   for both, so usernames cannot be probed)
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    req.validate().map_err(ApiError::from_validation)?;

    let user = User::find_by_username(&state.db, &req.username)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("invalid credentials".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized("invalid credentials".to_string()));
    }

    Ok(Json(issue_tokens(&user, state.jwt_secret())?))
}

/// Exchange a refresh token for a new access token
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let access_token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;

    Ok(Json(RefreshResponse { access_token }))
}
