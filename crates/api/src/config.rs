use std::path::PathBuf;

use axum::http::HeaderValue;
use fyparchive_core::upload::DEFAULT_MAX_FILE_SIZE;

use crate::auth::jwt::{parse_expiry, JwtConfig, DEFAULT_EXPIRY_SECS};
use crate::middleware::rate_limit::RateLimitConfig;

/// Failure to assemble a [`ServerConfig`] from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Upload storage settings.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Directory receiving stored PDFs (default: `./uploads`).
    pub dir: PathBuf,
    /// Per-file ceiling in bytes (default: 50 MiB).
    pub max_file_size: u64,
}

/// Credentials for the startup admin bootstrap. Only present when both
/// `ADMIN_EMAIL` and `ADMIN_PASSWORD` are set.
#[derive(Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for AdminBootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminBootstrap")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Server configuration loaded from environment variables.
///
/// Everything except `DATABASE_URL` and `JWT_SECRET` has a development
/// default. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Deployment environment name (default: `development`).
    pub app_env: String,
    pub database_url: String,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub jwt: JwtConfig,
    pub upload: UploadConfig,
    pub rate_limit: RateLimitConfig,
    pub admin_bootstrap: Option<AdminBootstrap>,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                  | Default                  |
    /// |--------------------------|--------------------------|
    /// | `DATABASE_URL`           | required                 |
    /// | `JWT_SECRET`             | required                 |
    /// | `HOST`                   | `0.0.0.0`                |
    /// | `PORT`                   | `5000`                   |
    /// | `APP_ENV`                | `development`            |
    /// | `CORS_ORIGINS`           | `http://localhost:3000`  |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                     |
    /// | `JWT_EXPIRE`             | `7d`                     |
    /// | `MAX_FILE_SIZE`          | `52428800`               |
    /// | `UPLOAD_DIR`             | `./uploads`              |
    /// | `RATE_LIMIT_MAX`         | `100`                    |
    /// | `RATE_LIMIT_WINDOW_SECS` | `900`                    |
    /// | `ADMIN_EMAIL`            | unset                    |
    /// | `ADMIN_PASSWORD`         | unset                    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let database_url = var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let secret = var("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let expiry_secs = match var("JWT_EXPIRE") {
            Some(raw) => parse_expiry(&raw).ok_or(ConfigError::Invalid {
                name: "JWT_EXPIRE",
                value: raw,
            })?,
            None => DEFAULT_EXPIRY_SECS,
        };

        let cors_origins: Vec<String> = var("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if let Some(bad) = cors_origins
            .iter()
            .find(|o| HeaderValue::from_str(o).is_err())
        {
            return Err(ConfigError::Invalid {
                name: "CORS_ORIGINS",
                value: bad.clone(),
            });
        }

        let admin_bootstrap = match (var("ADMIN_EMAIL"), var("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(AdminBootstrap { email, password }),
            _ => None,
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or("PORT", var("PORT"), 5000)?,
            app_env: var("APP_ENV").unwrap_or_else(|| "development".into()),
            database_url,
            cors_origins,
            request_timeout_secs: parse_or(
                "REQUEST_TIMEOUT_SECS",
                var("REQUEST_TIMEOUT_SECS"),
                30,
            )?,
            jwt: JwtConfig {
                secret,
                expiry_secs,
            },
            upload: UploadConfig {
                dir: PathBuf::from(var("UPLOAD_DIR").unwrap_or_else(|| "./uploads".into())),
                max_file_size: parse_or(
                    "MAX_FILE_SIZE",
                    var("MAX_FILE_SIZE"),
                    DEFAULT_MAX_FILE_SIZE,
                )?,
            },
            rate_limit: RateLimitConfig {
                max_requests: parse_or("RATE_LIMIT_MAX", var("RATE_LIMIT_MAX"), 100)?,
                window_secs: parse_or(
                    "RATE_LIMIT_WINDOW_SECS",
                    var("RATE_LIMIT_WINDOW_SECS"),
                    900,
                )?,
            },
            admin_bootstrap,
        })
    }

    /// Internal error detail is only exposed outside production.
    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}
