//! Request authentication
//!
//! Turns an `Authorization: Bearer <token>` header into an
//! [`AuthenticatedIdentity`]. The API router runs [`authenticate`] in a
//! middleware layer and inserts the identity into request extensions, where
//! handlers pick it up with `Extension<AuthenticatedIdentity>`.

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{validate_access_token, JwtError};

/// The user a request acts on behalf of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedIdentity {
    /// Stable user identifier
    pub user_id: Uuid,
}

impl AuthenticatedIdentity {
    /// Wraps a user ID that has already been authenticated
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}

/// Error type for authentication
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header
    #[error("Missing credentials")]
    MissingCredentials,

    /// Header present but not a Bearer credential
    #[error("{0}")]
    InvalidFormat(String),

    /// Token rejected
    #[error("{0}")]
    InvalidToken(String),
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
            JwtError::InvalidIssuer => AuthError::InvalidToken("Invalid token issuer".to_string()),
            other => AuthError::InvalidToken(format!("Invalid token: {}", other)),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::MissingCredentials | AuthError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            AuthError::InvalidFormat(_) => StatusCode::BAD_REQUEST,
        };
        (status, self.to_string()).into_response()
    }
}

/// Resolves the identity behind a request's bearer token
///
/// # Errors
///
/// - [`AuthError::MissingCredentials`] without an Authorization header
/// - [`AuthError::InvalidFormat`] for a non-Bearer scheme
/// - [`AuthError::InvalidToken`] if the token fails validation or is not an
///   access token
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthenticatedIdentity, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingCredentials)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    let claims = validate_access_token(token.trim(), secret)?;

    Ok(AuthenticatedIdentity::new(claims.sub))
}
