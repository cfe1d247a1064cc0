//! Authentication endpoints
//!
//! - `POST /auth/login` - Exchange email and password for tokens
//! - `POST /auth/refresh` - Exchange a refresh token for a new access token
//!
//! Self-registration lives with the user routes (`POST /users/register`).

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::Json,
};
use axum::extract::State;
use planboard_shared::{
    auth::{jwt, password},
    models::user::User,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Authenticated user
    pub user: User,

    /// Access token
    pub access_token: String,

    /// Refresh token
    pub refresh_token: String,
}

/// Refresh token request
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token
    pub access_token: String,
}

/// Authenticates a user and returns JWT tokens
///
/// ```text
/// POST /auth/login
/// { "email": "lead@example.com", "password": "correct horse" }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown email or wrong password (same message for both)
/// - `422 Unprocessable Entity`: Malformed email or empty password
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    let user = match User::find_by_email(&state.db, &req.email).await? {
        Some(user) => user,
        None => {
            password::verify_dummy(&req.password);
            warn!(email = %req.email, "Login attempt for unknown email");
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }
    };

    if !password::verify_password(&req.password, &user.password_hash)? {
        warn!(user_id = user.id, "Login attempt with wrong password");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let access_token = state.issue_token(&user, jwt::TokenType::Access)?;
    let refresh_token = state.issue_token(&user, jwt::TokenType::Refresh)?;

    info!(user_id = user.id, role = %user.role, "User logged in");

    Ok(Json(LoginResponse {
        user,
        access_token,
        refresh_token,
    }))
}

/// Exchanges a refresh token for a new access token
///
/// The user is reloaded so the new token carries the current role; a deleted
/// user can no longer refresh.
///
/// # Errors
///
/// - `401 Unauthorized`: Invalid, expired or non-refresh token, or user gone
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let claims = jwt::validate_refresh_token(&req.refresh_token, state.jwt_secret())?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("User no longer exists".to_string()))?;

    let access_token = state.issue_token(&user, jwt::TokenType::Access)?;

    Ok(Json(RefreshResponse { access_token }))
}
