//! Application state and router builder
//!
//! # Example
//!
//! ```no_run
//! use planboard_api::{app::{build_router, AppState}, config::Config};
//! use sqlx::PgPool;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! let pool = PgPool::connect(&config.database.url).await?;
//! let app = build_router(AppState::new(pool, config));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

use crate::{
    config::Config,
    middleware::{
        auth::{jwt_auth_layer, require_roles},
        security::SecurityHeadersLayer,
    },
    routes,
};
use axum::{
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post},
    Router,
};
use planboard_shared::auth::{
    authorization::{ADMIN_ONLY, ANY_ROLE, PROJECT_MANAGERS, TASK_MANAGERS},
    jwt::{self, Claims, JwtError, TokenType},
};
use planboard_shared::models::user::User;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into every handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Signs a token for `user` with the configured lifetime
    pub fn issue_token(&self, user: &User, token_type: TokenType) -> Result<String, JwtError> {
        let ttl = match token_type {
            TokenType::Access => self.config.jwt.access_ttl_seconds,
            TokenType::Refresh => self.config.jwt.refresh_ttl_seconds,
        };

        let claims = Claims::for_user(user, token_type, chrono::Duration::seconds(ttl));
        jwt::create_token(&claims, self.jwt_secret())
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET    /health                 public
/// ├── POST   /auth/login             public
/// ├── POST   /auth/refresh           public
/// ├── POST   /users/register         public
/// ├── POST   /users/create           admin
/// ├── GET    /users                  admin
/// ├── GET    /users/my-tasks         any role
/// ├── GET    /users/:id              admin
/// ├── PATCH  /users/:id              admin
/// ├── DELETE /users/:id              admin
/// ├── POST   /projects               admin, project_manager
/// ├── GET    /projects               admin, project_manager
/// ├── GET    /projects/:id           admin, project_manager
/// ├── DELETE /projects/:id           admin
/// └── *      /tasks, /tasks/:id      admin, project_manager, team_lead
/// ```
///
/// Guarded routes authenticate first (401) and check the role second (403).
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/refresh", post(routes::auth::refresh))
        .route("/users/register", post(routes::users::register));

    let user_routes = Router::new()
        .route(
            "/users/create",
            post(routes::users::create_user).route_layer(from_fn(require_roles(ADMIN_ONLY))),
        )
        .route(
            "/users",
            get(routes::users::list_users).route_layer(from_fn(require_roles(ADMIN_ONLY))),
        )
        .route(
            "/users/my-tasks",
            get(routes::users::my_tasks).route_layer(from_fn(require_roles(ANY_ROLE))),
        )
        .route(
            "/users/:id",
            get(routes::users::get_user)
                .patch(routes::users::update_user)
                .delete(routes::users::delete_user)
                .route_layer(from_fn(require_roles(ADMIN_ONLY))),
        );

    let project_routes = Router::new()
        .route(
            "/projects",
            post(routes::projects::create_project)
                .get(routes::projects::list_projects)
                .route_layer(from_fn(require_roles(PROJECT_MANAGERS))),
        )
        .route(
            "/projects/:id",
            get(routes::projects::get_project)
                .route_layer(from_fn(require_roles(PROJECT_MANAGERS)))
                .merge(
                    delete(routes::projects::delete_project)
                        .route_layer(from_fn(require_roles(ADMIN_ONLY))),
                ),
        );

    let task_routes = Router::new()
        .route(
            "/tasks",
            post(routes::tasks::create_task)
                .get(routes::tasks::list_tasks)
                .route_layer(from_fn(require_roles(TASK_MANAGERS))),
        )
        .route(
            "/tasks/:id",
            get(routes::tasks::get_task)
                .delete(routes::tasks::delete_task)
                .route_layer(from_fn(require_roles(TASK_MANAGERS))),
        );

    let protected_routes = Router::new()
        .merge(user_routes)
        .merge(project_routes)
        .merge(task_routes)
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_layer));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .layer(SecurityHeadersLayer::new(state.config.is_production()))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600))
}
