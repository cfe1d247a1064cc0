//! Authentication and authorization utilities
//!
//! # Modules
//!
//! - [`password`]: Argon2id password hashing and verification
//! - [`jwt`]: JWT token generation and validation
//! - [`context`]: Bearer authentication into an [`context::AuthContext`]
//! - [`authorization`]: Per-route role allow-lists
//!
//! # Example
//!
//! ```
//! use planboard_shared::auth::authorization::{require_any_role, PROJECT_MANAGERS};
//! use planboard_shared::auth::context::authenticate_bearer;
//! use planboard_shared::auth::jwt::{create_token, Claims, TokenType};
//! use planboard_shared::models::user::UserRole;
//!
//! let secret = "an-example-secret-that-is-32-bytes!";
//! let claims = Claims::new(1, "pm@example.com", UserRole::ProjectManager, TokenType::Access);
//! let header = format!("Bearer {}", create_token(&claims, secret).unwrap());
//!
//! let auth = authenticate_bearer(Some(&header), secret).unwrap();
//! assert!(require_any_role(&auth, PROJECT_MANAGERS).is_ok());
//! ```

pub mod authorization;
pub mod context;
pub mod jwt;
pub mod password;
