//! Role-based authorization
//!
//! Every guarded route declares a static allow-list of roles. The caller's
//! role comes from the access token (see [`AuthContext`]); a caller whose
//! role is not on the list is refused.
//!
//! # Allow-lists
//!
//! | List               | Roles                                 |
//! |--------------------|---------------------------------------|
//! | [`ADMIN_ONLY`]       | admin                                 |
//! | [`PROJECT_MANAGERS`] | admin, project_manager                |
//! | [`TASK_MANAGERS`]    | admin, project_manager, team_lead     |
//! | [`ANY_ROLE`]         | every role                            |

use super::context::AuthContext;
use crate::models::user::UserRole;

/// User administration and project deletion
pub const ADMIN_ONLY: &[UserRole] = &[UserRole::Admin];

/// Project creation and browsing
pub const PROJECT_MANAGERS: &[UserRole] = &[UserRole::Admin, UserRole::ProjectManager];

/// Task management
pub const TASK_MANAGERS: &[UserRole] = &[UserRole::Admin, UserRole::ProjectManager, UserRole::TeamLead];

/// Any authenticated user
pub const ANY_ROLE: &[UserRole] = &UserRole::ALL;

/// Error type for authorization checks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    /// Caller's role is not on the allow-list
    #[error("Insufficient permissions: role {actual} is not one of [{}]", format_roles(.allowed))]
    InsufficientRole {
        allowed: Vec<UserRole>,
        actual: UserRole,
    },
}

fn format_roles(roles: &[UserRole]) -> String {
    roles
        .iter()
        .map(UserRole::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Checks the caller's role against an allow-list
///
/// # Errors
///
/// Returns `AuthzError::InsufficientRole` if the role is not allowed
pub fn require_any_role(auth: &AuthContext, allowed: &[UserRole]) -> Result<(), AuthzError> {
    if !auth.has_any_role(allowed) {
        return Err(AuthzError::InsufficientRole {
            allowed: allowed.to_vec(),
            actual: auth.role,
        });
    }

    Ok(())
}
