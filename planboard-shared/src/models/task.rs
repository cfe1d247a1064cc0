//! Task model and database operations
//!
//! A task belongs to one project and is assigned to one user. Membership of
//! the assignee is checked when the task is created (see [`crate::rules`]) and
//! is not re-validated afterwards.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE tasks (
//!     id BIGSERIAL PRIMARY KEY,
//!     title VARCHAR(255) NOT NULL,
//!     description TEXT NOT NULL,
//!     project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
//!     assigned_to_id BIGINT NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::project::{Project, ProjectSummary};
use super::user::User;

/// Task row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: i64,

    pub title: String,

    pub description: String,

    /// Parent project
    pub project_id: i64,

    /// Assignee
    pub assigned_to_id: i64,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub title: String,

    pub description: String,

    pub project_id: i64,

    pub assigned_to_id: i64,
}

/// Task with its project and assignee loaded
#[derive(Debug, Clone, Serialize)]
pub struct TaskDetails {
    pub id: i64,

    pub title: String,

    pub description: String,

    pub project: ProjectSummary,

    pub assigned_to: User,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl TaskDetails {
    /// Builds the view from already loaded relations
    pub fn new(task: Task, project: &Project, assigned_to: User) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            project: ProjectSummary::from(project),
            assigned_to,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }

    /// Loads the project and assignee of `task`
    pub async fn load(pool: &PgPool, task: Task) -> Result<Self, sqlx::Error> {
        let project = Project::find_by_id(pool, task.project_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        let assigned_to = User::find_by_id(pool, task.assigned_to_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        Ok(Self::new(task, &project, assigned_to))
    }

    /// Loads the relations of every task in order
    pub async fn load_all(pool: &PgPool, tasks: Vec<Task>) -> Result<Vec<Self>, sqlx::Error> {
        let mut details = Vec::with_capacity(tasks.len());
        for task in tasks {
            details.push(Self::load(pool, task).await?);
        }
        Ok(details)
    }
}

impl Task {
    /// Creates a new task
    ///
    /// # Errors
    ///
    /// Returns an error if the project or assignee doesn't exist (foreign key
    /// violation) or the database connection fails.
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, project_id, assigned_to_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, project_id, assigned_to_id, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.project_id)
        .bind(data.assigned_to_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, project_id, assigned_to_id, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks, oldest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, project_id, assigned_to_id, created_at, updated_at
            FROM tasks
            ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists the tasks of a project
    pub async fn list_by_project(pool: &PgPool, project_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, project_id, assigned_to_id, created_at, updated_at
            FROM tasks
            WHERE project_id = $1
            ORDER BY id
            "#,
        )
        .bind(project_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists the tasks assigned to a user
    pub async fn list_by_assignee(pool: &PgPool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, project_id, assigned_to_id, created_at, updated_at
            FROM tasks
            WHERE assigned_to_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Deletes a task by ID
    ///
    /// # Returns
    ///
    /// True if task was deleted, false if it didn't exist
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
