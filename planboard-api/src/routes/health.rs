//! Health check endpoint
//!
//! ```text
//! GET /health
//! ```
//!
//! ```json
//! {
//!   "status": "healthy",
//!   "version": "0.1.0",
//!   "database": "connected",
//!   "pool": { "active_connections": 1, "idle_connections": 1, "total_connections": 2 }
//! }
//! ```
//!
//! The endpoint always answers 200; a failing database only flips `status` to
//! `degraded`.

use crate::app::AppState;
use axum::{extract::State, Json};
use planboard_shared::db::pool::{get_pool_stats, health_check as ping_database, PoolStats};
use serde::Serialize;
use tracing::warn;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `healthy` or `degraded`
    pub status: &'static str,

    /// Application version
    pub version: &'static str,

    /// `connected` or `disconnected`
    pub database: &'static str,

    /// Connection pool usage
    pub pool: PoolStats,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (status, database) = match ping_database(&state.db).await {
        Ok(()) => ("healthy", "connected"),
        Err(err) => {
            warn!(error = %err, "Database health check failed");
            ("degraded", "disconnected")
        }
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        database,
        pool: get_pool_stats(&state.db),
    })
}
