/// Authentication middleware for Axum
///
/// Validates `Authorization: Bearer <token>` headers and inserts an
/// [`AuthContext`] into the request extensions on success. Handlers behind
/// the layer extract it with Axum's `Extension` extractor:
///
/// ```
/// use axum::Extension;
/// use chartlab_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("user {} ({})", auth.user_id, auth.username)
/// }
/// ```
///
/// The api crate wires this up per route group via
/// `axum::middleware::from_fn_with_state`.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use super::jwt::{validate_access_token, JwtError};

/// Authentication context added to request extensions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: i64,

    /// Username carried in the token
    pub username: String,
}

/// Error type for authentication middleware
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header on a protected route
    #[error("Missing credentials")]
    MissingCredentials,

    /// Authorization header is not a Bearer token
    #[error("Invalid authorization format: {0}")]
    InvalidFormat(String),

    /// Token validation failed
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials").into_response()
            }
            AuthError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AuthError::InvalidToken(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
        }
    }
}

/// Extracts and validates the Bearer token from a set of request headers
///
/// Returns the auth context to attach to the request.
///
/// # Errors
///
/// - `MissingCredentials` if no Authorization header is present
/// - `InvalidFormat` if the header is not `Bearer <token>`
/// - `InvalidToken` if the token fails signature, expiry, or type checks
pub fn authenticate(headers: &axum::http::HeaderMap, secret: &str) -> Result<AuthContext, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = validate_access_token(token, secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        _ => AuthError::InvalidToken(format!("Invalid token: {}", e)),
    })?;

    Ok(AuthContext {
        user_id: claims.sub,
        username: claims.username,
    })
}
