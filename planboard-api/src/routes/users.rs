//! User endpoints
//!
//! - `POST /users/create` - Admin creates a user with any role
//! - `POST /users/register` - Public self-registration as `member`
//! - `GET /users` - List users
//! - `GET /users/my-tasks` - Work relevant to the caller
//! - `GET /users/:id`, `PATCH /users/:id`, `DELETE /users/:id`
//!
//! Role checks happen in the router; handlers here only see callers that
//! passed them.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path},
};
use axum::{extract::State, http::StatusCode, Extension};
use planboard_shared::{
    auth::{context::AuthContext, password},
    models::{
        project::{Project, ProjectDetails},
        task::{Task, TaskDetails},
        user::{CreateUser, UpdateUser, User, UserRole},
    },
};
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

/// Admin user creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,

    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Defaults to `member`
    #[serde(default)]
    pub role: Option<UserRole>,
}

/// Self-registration request; the role is always `member`
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,

    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Partial user update; absent fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: Option<String>,

    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    pub email: Option<String>,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,

    pub role: Option<UserRole>,
}

/// `GET /users/my-tasks` body, shaped by the caller's role
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum MyTasksResponse {
    /// Projects led by a team lead
    Projects(Vec<ProjectDetails>),

    /// Tasks assigned to a member
    Tasks(Vec<TaskDetails>),

    /// Any other role
    Message { message: String },
}

async fn insert_user(
    state: &AppState,
    name: String,
    email: String,
    plain_password: &str,
    role: UserRole,
) -> ApiResult<User> {
    let password_hash = password::hash_password(plain_password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            name,
            email,
            password_hash,
            role,
        },
    )
    .await?;

    info!(user_id = user.id, role = %user.role, "User created");
    Ok(user)
}

/// Creates a user with an explicit role
///
/// # Errors
///
/// - `409 Conflict`: Email already exists
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    req.validate()?;

    let role = req.role.unwrap_or_default();
    let user = insert_user(&state, req.name, req.email, &req.password, role).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Registers a new `member` account
///
/// # Errors
///
/// - `409 Conflict`: Email already exists
/// - `422 Unprocessable Entity`: Validation failed
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    req.validate()?;

    let user = insert_user(&state, req.name, req.email, &req.password, UserRole::Member).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(User::list(&state.db).await?))
}

/// Returns the caller's projects (team lead) or tasks (member)
///
/// # Errors
///
/// - `404 Not Found`: A team lead leads no project, or a member has no task
pub async fn my_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<MyTasksResponse>> {
    match auth.role {
        UserRole::TeamLead => {
            let projects = Project::list_by_team_lead(&state.db, auth.user_id).await?;
            if projects.is_empty() {
                return Err(ApiError::NotFound(format!(
                    "No projects found for team lead with ID {}",
                    auth.user_id
                )));
            }

            let details = ProjectDetails::load_all(&state.db, projects).await?;
            Ok(Json(MyTasksResponse::Projects(details)))
        }
        UserRole::Member => {
            let tasks = Task::list_by_assignee(&state.db, auth.user_id).await?;
            if tasks.is_empty() {
                return Err(ApiError::NotFound(format!(
                    "No tasks found for member with ID {}",
                    auth.user_id
                )));
            }

            let details = TaskDetails::load_all(&state.db, tasks).await?;
            Ok(Json(MyTasksResponse::Tasks(details)))
        }
        UserRole::Admin | UserRole::ProjectManager => Ok(Json(MyTasksResponse::Message {
            message: "No tasks or projects found for this user".to_string(),
        })),
    }
}

fn user_not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("User with ID {} not found", id))
}

pub async fn get_user(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Json<User>> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| user_not_found(id))?;

    Ok(Json(user))
}

/// Applies a partial update; a new password is re-hashed
///
/// # Errors
///
/// - `404 Not Found`: No such user
/// - `409 Conflict`: New email already taken
/// - `422 Unprocessable Entity`: Validation failed
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<User>> {
    req.validate()?;

    let password_hash = req
        .password
        .as_deref()
        .map(password::hash_password)
        .transpose()?;

    let changes = UpdateUser {
        name: req.name,
        email: req.email,
        password_hash,
        role: req.role,
    };
    let changed_fields = !changes.is_empty();

    let user = User::update(&state.db, id, changes)
        .await?
        .ok_or_else(|| user_not_found(id))?;

    if changed_fields {
        info!(user_id = user.id, role = %user.role, "User updated");
    }

    Ok(Json(user))
}

/// Deletes a user and their project memberships
///
/// # Errors
///
/// - `404 Not Found`: No such user
/// - `409 Conflict`: The user still leads a project or has assigned tasks
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if !User::delete(&state.db, id).await? {
        return Err(user_not_found(id));
    }

    info!(user_id = id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
