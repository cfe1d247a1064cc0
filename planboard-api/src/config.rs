//! Configuration management for the API server
//!
//! Configuration is read from environment variables once at startup; a `.env`
//! file in the working directory is loaded first when present.
//!
//! # Environment Variables
//!
//! | Variable                    | Default       |
//! |-----------------------------|---------------|
//! | `API_HOST`                  | `0.0.0.0`     |
//! | `API_PORT`                  | `8080`        |
//! | `CORS_ORIGINS`              | `*`           |
//! | `APP_ENV`                   | `development` |
//! | `DATABASE_URL`              | required      |
//! | `DATABASE_MAX_CONNECTIONS`  | `10`          |
//! | `DATABASE_MIN_CONNECTIONS`  | `2`           |
//! | `DATABASE_RUN_MIGRATIONS`   | `true`        |
//! | `JWT_SECRET`                | required, at least 32 characters |
//! | `JWT_ACCESS_TTL_SECONDS`    | `86400`       |
//! | `JWT_REFRESH_TTL_SECONDS`   | `2592000`     |
//! | `BOOTSTRAP_ADMIN_EMAIL`     | unset         |
//! | `BOOTSTRAP_ADMIN_PASSWORD`  | unset         |
//!
//! # Example
//!
//! ```no_run
//! use planboard_api::config::Config;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! println!("Server will listen on {}", config.bind_address());
//! # Ok(())
//! # }
//! ```

use anyhow::Context;
use std::env;
use std::str::FromStr;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// Admin account created at startup when no user has its email
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins; `*` allows any
    pub cors_origins: Vec<String>,

    /// `APP_ENV` value
    pub environment: String,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,

    /// Minimum number of idle connections
    pub min_connections: u32,

    /// Apply pending migrations at startup
    pub run_migrations: bool,
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HS256 signing secret
    ///
    /// Must be at least 32 characters. Generate with `openssl rand -hex 32`.
    pub secret: String,

    /// Access token lifetime
    pub access_ttl_seconds: i64,

    /// Refresh token lifetime
    pub refresh_ttl_seconds: i64,
}

#[derive(Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

const MIN_SECRET_LEN: usize = 32;

/// Same floor the HTTP write paths enforce
const MIN_PASSWORD_LEN: usize = 8;

impl Config {
    /// Loads configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value can't be
    /// parsed.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let api = ApiConfig {
            host: var_or("API_HOST", "0.0.0.0"),
            port: parse_var(&lookup, "API_PORT", 8080)?,
            cors_origins: var_or("CORS_ORIGINS", "*")
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            environment: var_or("APP_ENV", "development"),
        };

        let database = DatabaseConfig {
            url: lookup("DATABASE_URL").context("DATABASE_URL environment variable is required")?,
            max_connections: parse_var(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
            min_connections: parse_var(&lookup, "DATABASE_MIN_CONNECTIONS", 2)?,
            run_migrations: parse_var(&lookup, "DATABASE_RUN_MIGRATIONS", true)?,
        };

        let secret = lookup("JWT_SECRET").context("JWT_SECRET environment variable is required")?;
        if secret.len() < MIN_SECRET_LEN {
            anyhow::bail!("JWT_SECRET must be at least {} characters long", MIN_SECRET_LEN);
        }

        let jwt = JwtConfig {
            secret,
            access_ttl_seconds: parse_var(&lookup, "JWT_ACCESS_TTL_SECONDS", 86_400)?,
            refresh_ttl_seconds: parse_var(&lookup, "JWT_REFRESH_TTL_SECONDS", 2_592_000)?,
        };
        if jwt.access_ttl_seconds <= 0 || jwt.refresh_ttl_seconds <= 0 {
            anyhow::bail!("JWT token lifetimes must be positive");
        }

        let bootstrap_admin = match (lookup("BOOTSTRAP_ADMIN_EMAIL"), lookup("BOOTSTRAP_ADMIN_PASSWORD")) {
            (Some(_), Some(password)) if password.chars().count() < MIN_PASSWORD_LEN => {
                anyhow::bail!(
                    "BOOTSTRAP_ADMIN_PASSWORD must be at least {} characters long",
                    MIN_PASSWORD_LEN
                )
            }
            (Some(email), Some(password)) => Some(BootstrapAdmin { email, password }),
            (None, None) => None,
            _ => anyhow::bail!(
                "BOOTSTRAP_ADMIN_EMAIL and BOOTSTRAP_ADMIN_PASSWORD must be set together"
            ),
        };

        Ok(Self {
            api,
            database,
            jwt,
            bootstrap_admin,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Whether `APP_ENV` is `production`
    pub fn is_production(&self) -> bool {
        self.api.environment.eq_ignore_ascii_case("production")
    }

    /// Whether CORS allows any origin
    pub fn allows_any_origin(&self) -> bool {
        self.api.cors_origins.iter().any(|origin| origin == "*")
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    fn minimal() -> Vec<(&'static str, &'static str)> {
        vec![
            ("DATABASE_URL", "postgresql://localhost/test"),
            ("JWT_SECRET", SECRET),
        ]
    }

    #[test]
    fn test_defaults() {
        let config = load(&minimal()).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.api.cors_origins, vec!["*"]);
        assert!(config.allows_any_origin());
        assert!(!config.is_production());
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.database.min_connections, 2);
        assert!(config.database.run_migrations);
        assert_eq!(config.jwt.access_ttl_seconds, 86_400);
        assert_eq!(config.jwt.refresh_ttl_seconds, 2_592_000);
        assert!(config.bootstrap_admin.is_none());
    }

    #[test]
    fn test_overrides() {
        let mut vars = minimal();
        vars.extend([
            ("API_HOST", "127.0.0.1"),
            ("API_PORT", "3000"),
            ("CORS_ORIGINS", "https://a.example, https://b.example"),
            ("APP_ENV", "Production"),
            ("DATABASE_RUN_MIGRATIONS", "false"),
            ("JWT_ACCESS_TTL_SECONDS", "60"),
            ("BOOTSTRAP_ADMIN_EMAIL", "root@example.com"),
            ("BOOTSTRAP_ADMIN_PASSWORD", "changeme123"),
        ]);
        let config = load(&vars).unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(
            config.api.cors_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert!(!config.allows_any_origin());
        assert!(config.is_production());
        assert!(!config.database.run_migrations);
        assert_eq!(config.jwt.access_ttl_seconds, 60);
        assert_eq!(
            config.bootstrap_admin.map(|admin| admin.email),
            Some("root@example.com".to_string())
        );
    }

    #[test]
    fn test_required_variables() {
        let err = load(&[("JWT_SECRET", SECRET)]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));

        let err = load(&[("DATABASE_URL", "postgresql://localhost/test")]).unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn test_short_secret_rejected() {
        let err = load(&[
            ("DATABASE_URL", "postgresql://localhost/test"),
            ("JWT_SECRET", "too-short"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("at least 32"));
    }

    #[test]
    fn test_invalid_number_rejected() {
        let mut vars = minimal();
        vars.push(("API_PORT", "eighty"));
        let err = load(&vars).unwrap_err();
        assert!(err.to_string().contains("API_PORT"));
    }

    #[test]
    fn test_bootstrap_admin_needs_both_variables() {
        let mut vars = minimal();
        vars.push(("BOOTSTRAP_ADMIN_EMAIL", "root@example.com"));
        assert!(load(&vars).is_err());
    }

    #[test]
    fn test_short_bootstrap_password_rejected() {
        let mut vars = minimal();
        vars.extend([
            ("BOOTSTRAP_ADMIN_EMAIL", "root@example.com"),
            ("BOOTSTRAP_ADMIN_PASSWORD", "short"),
        ]);
        let err = load(&vars).unwrap_err();
        assert!(err.to_string().contains("BOOTSTRAP_ADMIN_PASSWORD"));
    }

    #[test]
    fn test_bootstrap_password_is_redacted() {
        let admin = BootstrapAdmin {
            email: "root@example.com".to_string(),
            password: "hunter2-hunter2".to_string(),
        };
        let debug = format!("{:?}", admin);
        assert!(debug.contains("root@example.com"));
        assert!(!debug.contains("hunter2"));
    }
}
