//! Startup creation of the initial admin account.
//!
//! Runs only when both `ADMIN_EMAIL` and `ADMIN_PASSWORD` are configured.
//! An existing admin with that email is never modified.

use fyparchive_core::error::CoreError;
use fyparchive_core::roles::ROLE_ADMIN;
use fyparchive_db::models::admin::{normalize_email, Admin, CreateAdmin};
use fyparchive_db::repositories::AdminRepo;
use fyparchive_db::DbPool;
use validator::ValidateEmail;

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::config::AdminBootstrap;
use crate::error::{AppError, AppResult};

/// Create the configured admin if absent.
///
/// Returns the new row, or `None` when an admin with that email already exists.
pub async fn ensure_admin(pool: &DbPool, bootstrap: &AdminBootstrap) -> AppResult<Option<Admin>> {
    let email = normalize_email(&bootstrap.email);
    if !email.validate_email() {
        return Err(CoreError::Validation("ADMIN_EMAIL is not a valid email address".into()).into());
    }
    validate_password_strength(&bootstrap.password, MIN_PASSWORD_LENGTH)
        .map_err(CoreError::Validation)?;

    if AdminRepo::find_by_email(pool, &email).await?.is_some() {
        tracing::info!(email = %email, "Bootstrap admin already exists");
        return Ok(None);
    }

    let password_hash = hash_password(&bootstrap.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let input = CreateAdmin {
        email,
        password_hash,
        role: ROLE_ADMIN.to_string(),
    };

    match AdminRepo::create(pool, &input).await {
        Ok(admin) => {
            tracing::info!(admin_id = admin.id, email = %admin.email, "Bootstrap admin created");
            Ok(Some(admin))
        }
        // Another instance won the race.
        Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23505") => {
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
