//! API route handlers, one module per resource
//!
//! - `health`: Liveness and database status
//! - `auth`: Login and token refresh
//! - `users`: User administration, self-registration and `my-tasks`
//! - `projects`: Project creation, browsing and deletion
//! - `tasks`: Task creation, browsing and deletion

pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;
pub mod users;
