//! Authenticated caller context
//!
//! The API's JWT layer turns an `Authorization: Bearer <token>` header into an
//! [`AuthContext`] and stores it in the request extensions; role guards and
//! handlers read it back from there.

use serde::{Deserialize, Serialize};

use super::jwt::{validate_access_token, Claims, JwtError};
use crate::models::user::UserRole;

/// Authentication context added to request extensions
///
/// Handlers extract it with Axum's `Extension` extractor:
///
/// ```ignore
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User {} ({})", auth.user_id, auth.role)
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: i64,

    /// Email carried by the token
    pub email: String,

    /// Role carried by the token
    pub role: UserRole,
}

impl AuthContext {
    /// Creates auth context from validated access-token claims
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }

    /// Whether the caller's role is in `allowed`
    pub fn has_any_role(&self, allowed: &[UserRole]) -> bool {
        allowed.contains(&self.role)
    }
}

/// Error type for bearer authentication
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("Missing authorization header")]
    MissingCredentials,

    /// Authorization header is not a bearer credential
    #[error("Expected Bearer token")]
    InvalidFormat,

    /// Token validation failed
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

/// Authenticates the value of an `Authorization` header
///
/// # Errors
///
/// - `MissingCredentials` if the header is absent or empty
/// - `InvalidFormat` if it isn't `Bearer <token>`
/// - `InvalidToken` if the token fails validation or isn't an access token
pub fn authenticate_bearer(header: Option<&str>, secret: &str) -> Result<AuthContext, AuthError> {
    let header = header
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(AuthError::MissingCredentials)?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::InvalidFormat)?;

    let claims = validate_access_token(token, secret)?;

    Ok(AuthContext::from_claims(claims))
}
