//! Startup seeding of the first admin account
//!
//! Every user-management route requires an admin, so a fresh database needs
//! one admin created out of band. When `BOOTSTRAP_ADMIN_EMAIL` and
//! `BOOTSTRAP_ADMIN_PASSWORD` are set, startup creates that account unless a
//! user with the email already exists. An existing account is left untouched.

use crate::config::BootstrapAdmin;
use anyhow::Context;
use planboard_shared::auth::password;
use planboard_shared::models::user::{CreateUser, User, UserRole};
use sqlx::PgPool;
use tracing::{info, warn};

/// Outcome of [`ensure_admin`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// The admin account was created
    Created,

    /// A user with the email already exists
    AlreadyExists,
}

/// Creates the bootstrap admin if no user has its email
pub async fn ensure_admin(pool: &PgPool, admin: &BootstrapAdmin) -> anyhow::Result<BootstrapOutcome> {
    if let Some(existing) = User::find_by_email(pool, &admin.email)
        .await
        .context("Failed to look up bootstrap admin")?
    {
        if existing.role != UserRole::Admin {
            warn!(
                user_id = existing.id,
                role = %existing.role,
                "Bootstrap admin email belongs to a non-admin user"
            );
        }
        return Ok(BootstrapOutcome::AlreadyExists);
    }

    let password_hash =
        password::hash_password(&admin.password).context("Failed to hash bootstrap admin password")?;

    let user = User::create(
        pool,
        CreateUser {
            name: "Administrator".to_string(),
            email: admin.email.clone(),
            password_hash,
            role: UserRole::Admin,
        },
    )
    .await
    .context("Failed to create bootstrap admin")?;

    info!(user_id = user.id, "Bootstrap admin created");
    Ok(BootstrapOutcome::Created)
}
