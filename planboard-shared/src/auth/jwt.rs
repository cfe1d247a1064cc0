//! JWT token generation and validation
//!
//! Tokens are signed with HS256 and carry the user's identity and role, so
//! route guards can authorize a request without a database round trip.
//!
//! # Security
//!
//! - **Algorithm**: HS256 (HMAC with SHA-256)
//! - **Expiration**: 24 hours for access tokens, 30 days for refresh tokens
//!   by default, overridable per call
//! - **Validation**: signature, expiration, not-before and issuer checks
//! - **Secret Management**: secrets should be at least 32 bytes
//!
//! # Example
//!
//! ```
//! use planboard_shared::auth::jwt::{create_token, validate_access_token, Claims, TokenType};
//! use planboard_shared::models::user::UserRole;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let secret = "an-example-secret-that-is-32-bytes!";
//! let claims = Claims::new(42, "lead@example.com", UserRole::TeamLead, TokenType::Access);
//! let token = create_token(&claims, secret)?;
//!
//! let validated = validate_access_token(&token, secret)?;
//! assert_eq!(validated.sub, 42);
//! assert_eq!(validated.role, UserRole::TeamLead);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::{User, UserRole};

/// Issuer stamped on and required from every token
pub const ISSUER: &str = "planboard";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Issuer claim doesn't match
    #[error("Invalid token issuer")]
    InvalidIssuer,

    /// Token is valid but of the wrong type
    #[error("Expected {expected} token, got {actual} token")]
    WrongTokenType { expected: TokenType, actual: TokenType },
}

/// Token type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Access token, accepted by route guards
    Access,

    /// Refresh token, exchanged for a new access token
    Refresh,
}

impl TokenType {
    /// Gets default expiration duration for token type
    pub fn default_expiration(&self) -> Duration {
        match self {
            TokenType::Access => Duration::hours(24),
            TokenType::Refresh => Duration::days(30),
        }
    }

    /// Gets token type as string
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT claims structure
///
/// # Standard Claims
///
/// - `sub`: Subject (user ID)
/// - `iss`: Issuer (always "planboard")
/// - `iat` / `nbf` / `exp`: Unix timestamps
/// - `jti`: Unique token ID
///
/// # Custom Claims
///
/// - `email`: User email at issue time
/// - `role`: User role at issue time, checked by route guards
/// - `token_type`: Access or refresh token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: i64,

    /// Issuer - Always "planboard"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Token ID
    pub jti: Uuid,

    /// Email (custom claim)
    pub email: String,

    /// Role (custom claim)
    pub role: UserRole,

    /// Token type (custom claim)
    pub token_type: TokenType,
}

impl Claims {
    /// Creates new claims with the default expiration for `token_type`
    pub fn new(user_id: i64, email: &str, role: UserRole, token_type: TokenType) -> Self {
        Self::with_expiration(user_id, email, role, token_type, token_type.default_expiration())
    }

    /// Creates claims with custom expiration
    pub fn with_expiration(
        user_id: i64,
        email: &str,
        role: UserRole,
        token_type: TokenType,
        expires_in: Duration,
    ) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
            jti: Uuid::new_v4(),
            email: email.to_string(),
            role,
            token_type,
        }
    }

    /// Creates claims for `user` with a custom expiration
    pub fn for_user(user: &User, token_type: TokenType, expires_in: Duration) -> Self {
        Self::with_expiration(user.id, &user.email, user.role, token_type, expires_in)
    }

    /// Checks if token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Creates a JWT token from claims
///
/// # Errors
///
/// Returns `JwtError::CreateError` if token creation fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT token and extracts claims
///
/// Verifies signature, expiration, not-before and issuer.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

fn validate_token_of_type(token: &str, secret: &str, expected: TokenType) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != expected {
        return Err(JwtError::WrongTokenType {
            expected,
            actual: claims.token_type,
        });
    }

    Ok(claims)
}

/// Validates token and checks it's an access token
pub fn validate_access_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    validate_token_of_type(token, secret, TokenType::Access)
}

/// Validates token and checks it's a refresh token
pub fn validate_refresh_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    validate_token_of_type(token, secret, TokenType::Refresh)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_claims_new_sets_defaults() {
        let claims = Claims::new(1, "a@example.com", UserRole::Admin, TokenType::Access);

        assert_eq!(claims.sub, 1);
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.email, "a@example.com");
        assert_eq!(claims.role, UserRole::Admin);
        assert_eq!(claims.exp - claims.iat, Duration::hours(24).num_seconds());
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_refresh_default_expiration() {
        let claims = Claims::new(1, "a@example.com", UserRole::Member, TokenType::Refresh);
        assert_eq!(claims.exp - claims.iat, Duration::days(30).num_seconds());
    }

    #[test]
    fn test_each_token_gets_a_unique_id() {
        let first = Claims::new(1, "a@example.com", UserRole::Member, TokenType::Access);
        let second = Claims::new(1, "a@example.com", UserRole::Member, TokenType::Access);
        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn test_create_and_validate() {
        let claims = Claims::new(5, "pm@example.com", UserRole::ProjectManager, TokenType::Access);
        let token = create_token(&claims, SECRET).unwrap();

        let validated = validate_token(&token, SECRET).unwrap();
        assert_eq!(validated.sub, 5);
        assert_eq!(validated.email, "pm@example.com");
        assert_eq!(validated.role, UserRole::ProjectManager);
        assert_eq!(validated.jti, claims.jti);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let claims = Claims::new(5, "pm@example.com", UserRole::ProjectManager, TokenType::Access);
        let token = create_token(&claims, SECRET).unwrap();

        let result = validate_token(&token, "another-secret-key-at-least-32-bytes");
        assert!(matches!(result, Err(JwtError::ValidationError(_))));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let claims = Claims::with_expiration(
            5,
            "pm@example.com",
            UserRole::ProjectManager,
            TokenType::Access,
            Duration::seconds(-120),
        );
        let token = create_token(&claims, SECRET).unwrap();

        assert!(matches!(validate_token(&token, SECRET), Err(JwtError::Expired)));
    }

    #[test]
    fn test_foreign_issuer_is_rejected() {
        let mut claims = Claims::new(5, "pm@example.com", UserRole::Admin, TokenType::Access);
        claims.iss = "someone-else".to_string();
        let token = create_token(&claims, SECRET).unwrap();

        assert!(matches!(validate_token(&token, SECRET), Err(JwtError::InvalidIssuer)));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(validate_token("not.a.token", SECRET).is_err());
        assert!(validate_token("", SECRET).is_err());
    }

    #[test]
    fn test_token_type_is_enforced() {
        let access = create_token(
            &Claims::new(1, "a@example.com", UserRole::Member, TokenType::Access),
            SECRET,
        )
        .unwrap();
        let refresh = create_token(
            &Claims::new(1, "a@example.com", UserRole::Member, TokenType::Refresh),
            SECRET,
        )
        .unwrap();

        assert!(validate_access_token(&access, SECRET).is_ok());
        assert!(validate_refresh_token(&refresh, SECRET).is_ok());
        assert!(matches!(
            validate_access_token(&refresh, SECRET),
            Err(JwtError::WrongTokenType {
                expected: TokenType::Access,
                actual: TokenType::Refresh
            })
        ));
        assert!(validate_refresh_token(&access, SECRET).is_err());
    }
}
