//! Project endpoints
//!
//! - `POST /projects` - Create a project with a team lead and members
//! - `GET /projects` - List projects with their relations
//! - `GET /projects/:id` - Fetch one project
//! - `DELETE /projects/:id` - Delete a project with its tasks and memberships

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::{Json, Path},
};
use axum::{extract::State, http::StatusCode};
use planboard_shared::{
    models::{
        project::{CreateProject, Project, ProjectDetails},
        user::User,
    },
    rules,
};
use serde::Deserialize;
use tracing::{info, warn};
use validator::Validate;

/// Project creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(email(message = "Invalid email format"))]
    pub team_lead_email: String,

    /// May be empty; repeated emails count once
    #[serde(default)]
    #[validate(custom(function = "validate_emails"))]
    pub member_emails: Vec<String>,
}

fn validate_emails(emails: &[String]) -> Result<(), validator::ValidationError> {
    use validator::ValidateEmail;

    if emails.iter().all(|email| email.validate_email()) {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("email");
        err.message = Some("Every member email must be a valid email address".into());
        Err(err)
    }
}

/// Creates a project
///
/// 1. The team lead must exist and hold `project_manager` or `team_lead`.
/// 2. Every member email must belong to an existing user.
/// 3. The project and its member links are written in one transaction.
///
/// # Errors
///
/// - `404 Not Found`: Team lead or some members not found
/// - `400 Bad Request`: Team lead's role can't lead projects
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_project(
    State(state): State<AppState>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<ProjectDetails>)> {
    req.validate()?;

    let team_lead = User::find_by_email(&state.db, &req.team_lead_email).await?;
    let team_lead = rules::require_team_lead(&req.team_lead_email, team_lead).map_err(|err| {
        warn!(team_lead_email = %req.team_lead_email, error = %err, "Project team lead rejected");
        err
    })?;

    let member_emails = rules::dedup_emails(&req.member_emails);
    let members = if member_emails.is_empty() {
        Vec::new()
    } else {
        let found = User::find_by_emails(&state.db, &member_emails).await?;
        rules::require_all_members(&member_emails, found).map_err(|err| {
            warn!(error = %err, "Project members rejected");
            err
        })?
    };

    let project = Project::create(
        &state.db,
        CreateProject {
            name: req.name,
            description: req.description,
            team_lead_id: team_lead.id,
            member_ids: members.iter().map(|member| member.id).collect(),
        },
    )
    .await?;

    info!(
        project_id = project.id,
        team_lead_id = team_lead.id,
        members = members.len(),
        "Project created"
    );

    let details = ProjectDetails::load(&state.db, project).await?;
    Ok((StatusCode::CREATED, Json(details)))
}

pub async fn list_projects(State(state): State<AppState>) -> ApiResult<Json<Vec<ProjectDetails>>> {
    let projects = Project::list(&state.db).await?;
    Ok(Json(ProjectDetails::load_all(&state.db, projects).await?))
}

fn project_not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("Project with ID {} not found", id))
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ProjectDetails>> {
    let project = Project::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| project_not_found(id))?;

    Ok(Json(ProjectDetails::load(&state.db, project).await?))
}

/// Deletes a project; its tasks and member links go with it
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if !Project::delete(&state.db, id).await? {
        return Err(project_not_found(id));
    }

    info!(project_id = id, "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}
