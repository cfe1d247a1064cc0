//! Database models for Planboard
//!
//! This module contains the database models and their CRUD operations.
//!
//! # Models
//!
//! - `user`: User accounts, roles and credentials
//! - `project`: Projects, their team lead and member links
//! - `task`: Tasks assigned to project members
//!
//! Read views (`ProjectDetails`, `TaskDetails`) load relations with explicit
//! queries so handlers can return nested JSON.

pub mod project;
pub mod task;
pub mod user;
