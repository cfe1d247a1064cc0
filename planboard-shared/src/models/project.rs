//! Project model and database operations
//!
//! A project has exactly one team lead and any number of members. Members are
//! linked through the `project_members` join table; tasks point back at their
//! project.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE projects (
//!     id BIGSERIAL PRIMARY KEY,
//!     name VARCHAR(255) NOT NULL,
//!     description TEXT NOT NULL,
//!     team_lead_id BIGINT NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//!
//! CREATE TABLE project_members (
//!     project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
//!     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
//!     PRIMARY KEY (project_id, user_id)
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::task::Task;
use super::user::User;

/// Project row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID
    pub id: i64,

    /// Project name (not unique)
    pub name: String,

    pub description: String,

    /// User heading the project
    pub team_lead_id: i64,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new project
///
/// Member IDs are linked in the same transaction as the project insert.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub name: String,

    pub description: String,

    pub team_lead_id: i64,

    pub member_ids: Vec<i64>,
}

/// Compact project view embedded in task responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: i64,

    pub name: String,

    pub description: String,
}

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id,
            name: project.name.clone(),
            description: project.description.clone(),
        }
    }
}

/// Project with its team lead, members and tasks loaded
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetails {
    pub id: i64,

    pub name: String,

    pub description: String,

    pub team_lead: User,

    pub members: Vec<User>,

    pub tasks: Vec<Task>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl ProjectDetails {
    /// Loads the relations of `project`
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error::RowNotFound` if the team lead row is gone, which
    /// the foreign key prevents outside of concurrent deletes.
    pub async fn load(pool: &PgPool, project: Project) -> Result<Self, sqlx::Error> {
        let team_lead = User::find_by_id(pool, project.team_lead_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        let members = Project::members(pool, project.id).await?;
        let tasks = Task::list_by_project(pool, project.id).await?;

        Ok(Self {
            id: project.id,
            name: project.name,
            description: project.description,
            team_lead,
            members,
            tasks,
            created_at: project.created_at,
            updated_at: project.updated_at,
        })
    }

    /// Loads the relations of every project in order
    pub async fn load_all(pool: &PgPool, projects: Vec<Project>) -> Result<Vec<Self>, sqlx::Error> {
        let mut details = Vec::with_capacity(projects.len());
        for project in projects {
            details.push(Self::load(pool, project).await?);
        }
        Ok(details)
    }
}

impl Project {
    /// Creates a project and links its members in one transaction
    ///
    /// # Errors
    ///
    /// Returns an error if the team lead or a member doesn't exist (foreign
    /// key violation) or the database connection fails. Nothing is written
    /// on error.
    pub async fn create(pool: &PgPool, data: CreateProject) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, description, team_lead_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, team_lead_id, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.team_lead_id)
        .fetch_one(&mut *tx)
        .await?;

        if !data.member_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO project_members (project_id, user_id)
                SELECT $1, member_id FROM UNNEST($2::BIGINT[]) AS member_id
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(project.id)
            .bind(&data.member_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(project)
    }

    /// Finds a project by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, team_lead_id, created_at, updated_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Finds a project by exact name
    ///
    /// Names are not unique; the oldest project with the name wins.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, team_lead_id, created_at, updated_at
            FROM projects
            WHERE name = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Lists all projects, oldest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, team_lead_id, created_at, updated_at
            FROM projects
            ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Lists the projects headed by a team lead
    pub async fn list_by_team_lead(pool: &PgPool, team_lead_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, name, description, team_lead_id, created_at, updated_at
            FROM projects
            WHERE team_lead_id = $1
            ORDER BY id
            "#,
        )
        .bind(team_lead_id)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Lists the members of a project
    pub async fn members(pool: &PgPool, project_id: i64) -> Result<Vec<User>, sqlx::Error> {
        let members = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.name, u.email, u.password_hash, u.role, u.created_at, u.updated_at
            FROM users u
            INNER JOIN project_members pm ON pm.user_id = u.id
            WHERE pm.project_id = $1
            ORDER BY u.id
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(members)
    }

    /// Deletes a project by ID
    ///
    /// Membership links and tasks are removed with the project.
    ///
    /// # Returns
    ///
    /// True if project was deleted, false if it didn't exist
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
