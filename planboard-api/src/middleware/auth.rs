//! Authentication and role guards
//!
//! Guarded routes are wrapped twice. The outer [`jwt_auth_layer`] turns the
//! bearer token into an [`AuthContext`] request extension and rejects the
//! request with 401 when that fails. The inner guard built by
//! [`require_roles`] checks the caller's role against the route's allow-list
//! and rejects with 403. Both run before the request body is read.
//!
//! ```ignore
//! let projects = post(create_project)
//!     .route_layer(middleware::from_fn(require_roles(PROJECT_MANAGERS)));
//! ```

use crate::{app::AppState, error::ApiError};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use planboard_shared::auth::authorization::require_any_role;
use planboard_shared::auth::context::{authenticate_bearer, AuthContext};
use planboard_shared::models::user::UserRole;
use std::future::Future;
use std::pin::Pin;
use tracing::{debug, warn};

/// Future returned by the role guard
pub type GuardFuture = Pin<Box<dyn Future<Output = Result<Response, ApiError>> + Send>>;

/// Validates the bearer token and stores the caller in request extensions
pub async fn jwt_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let auth = authenticate_bearer(auth_header, state.jwt_secret()).map_err(|err| {
        debug!(path = %req.uri().path(), error = %err, "Rejected bearer authentication");
        err
    })?;

    req.extensions_mut().insert(auth);

    Ok(next.run(req).await)
}

/// Builds a guard that admits only callers whose role is in `allowed`
///
/// Must run inside [`jwt_auth_layer`]; a request without an [`AuthContext`]
/// is treated as unauthenticated.
pub fn require_roles(
    allowed: &'static [UserRole],
) -> impl Fn(Request, Next) -> GuardFuture + Clone + Send + Sync + 'static {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let auth = req
                .extensions()
                .get::<AuthContext>()
                .cloned()
                .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

            if let Err(err) = require_any_role(&auth, allowed) {
                warn!(
                    user_id = auth.user_id,
                    role = %auth.role,
                    path = %req.uri().path(),
                    "Role not allowed on route"
                );
                return Err(err.into());
            }

            Ok(next.run(req).await)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, middleware, routing::get, Extension, Router};
    use planboard_shared::auth::authorization::{ADMIN_ONLY, TASK_MANAGERS};
    use tower::ServiceExt;

    fn with_caller(router: Router, role: Option<UserRole>) -> Router {
        match role {
            Some(role) => router.layer(Extension(AuthContext {
                user_id: 7,
                email: "caller@example.com".to_string(),
                role,
            })),
            None => router,
        }
    }

    async fn status(allowed: &'static [UserRole], role: Option<UserRole>) -> StatusCode {
        let router = Router::new().route(
            "/guarded",
            get(|| async { "ok" }).route_layer(middleware::from_fn(require_roles(allowed))),
        );

        with_caller(router, role)
            .oneshot(Request::builder().uri("/guarded").body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_allowed_role_passes() {
        assert_eq!(status(ADMIN_ONLY, Some(UserRole::Admin)).await, StatusCode::OK);
        assert_eq!(status(TASK_MANAGERS, Some(UserRole::TeamLead)).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_disallowed_role_is_forbidden() {
        assert_eq!(
            status(ADMIN_ONLY, Some(UserRole::ProjectManager)).await,
            StatusCode::FORBIDDEN
        );
        assert_eq!(status(TASK_MANAGERS, Some(UserRole::Member)).await, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_missing_context_is_unauthorized() {
        assert_eq!(status(ADMIN_ONLY, None).await, StatusCode::UNAUTHORIZED);
    }
}
