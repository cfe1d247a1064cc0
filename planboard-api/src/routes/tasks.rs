//! Task endpoints
//!
//! - `POST /tasks` - Create a task in a named project for one of its members
//! - `GET /tasks` - List tasks with project and assignee
//! - `GET /tasks/:id` - Fetch one task
//! - `DELETE /tasks/:id` - Delete a task

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path},
};
use axum::{extract::State, http::StatusCode};
use planboard_shared::{
    models::{
        project::Project,
        task::{CreateTask, Task, TaskDetails},
        user::User,
    },
    rules::{self, RuleError},
};
use serde::Deserialize;
use tracing::{info, warn};
use validator::Validate;

/// Task creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(length(min = 1, message = "Project name is required"))]
    pub project_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub assigned_to_email: String,
}

/// Creates a task
///
/// The project is looked up by exact name (oldest wins on duplicates) and the
/// assignee must be one of its members.
///
/// # Errors
///
/// - `404 Not Found`: Project or assignee not found
/// - `400 Bad Request`: Assignee is not a member of the project
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_task(
    State(state): State<AppState>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskDetails>)> {
    req.validate()?;

    let project = Project::find_by_name(&state.db, &req.project_name)
        .await?
        .ok_or_else(|| RuleError::ProjectNotFound(req.project_name.clone()))?;

    let assignee = User::find_by_email(&state.db, &req.assigned_to_email)
        .await?
        .ok_or_else(|| RuleError::AssigneeNotFound(req.assigned_to_email.clone()))?;

    let members = Project::members(&state.db, project.id).await?;
    rules::require_project_member(&project.name, &members, &assignee).map_err(|err| {
        warn!(project_id = project.id, assignee_id = assignee.id, "Task assignee is not a project member");
        err
    })?;

    let task = Task::create(
        &state.db,
        CreateTask {
            title: req.title,
            description: req.description,
            project_id: project.id,
            assigned_to_id: assignee.id,
        },
    )
    .await?;

    info!(
        task_id = task.id,
        project_id = project.id,
        assignee_id = assignee.id,
        "Task created"
    );

    Ok((StatusCode::CREATED, Json(TaskDetails::new(task, &project, assignee))))
}

pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<TaskDetails>>> {
    let tasks = Task::list(&state.db).await?;
    Ok(Json(TaskDetails::load_all(&state.db, tasks).await?))
}

fn task_not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("Task with ID {} not found", id))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<TaskDetails>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| task_not_found(id))?;

    Ok(Json(TaskDetails::load(&state.db, task).await?))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if !Task::delete(&state.db, id).await? {
        return Err(task_not_found(id));
    }

    info!(task_id = id, "Task deleted");
    Ok(StatusCode::NO_CONTENT)
}
