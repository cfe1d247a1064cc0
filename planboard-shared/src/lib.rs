//! # Planboard Shared Library
//!
//! Domain types and business logic shared by the Planboard API server.
//!
//! ## Module Organization
//!
//! - `models`: Users, projects and tasks with their database queries
//! - `rules`: Cross-entity checks applied when projects and tasks are created
//! - `auth`: Password hashing, JWTs and role allow-lists
//! - `db`: Connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod rules;

/// Current version of the Planboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
