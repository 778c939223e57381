//! Admin account model and DTOs.

use fyparchive_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full admin row from the `admins` table.
///
/// Contains the password hash -- deliberately not `Serialize`.
/// Use [`AdminInfo`] for external-facing output.
#[derive(Clone, FromRow)]
pub struct Admin {
    pub id: DbId,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl std::fmt::Debug for Admin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Admin")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("role", &self.role)
            .field("last_login_at", &self.last_login_at)
            .finish()
    }
}

/// Safe admin representation for API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminInfo {
    pub id: DbId,
    pub email: String,
    pub role: String,
    pub last_login: Option<Timestamp>,
}

impl From<&Admin> for AdminInfo {
    fn from(admin: &Admin) -> Self {
        Self {
            id: admin.id,
            email: admin.email.clone(),
            role: admin.role.clone(),
            last_login: admin.last_login_at,
        }
    }
}

/// DTO for inserting an admin. Only ever carries a hash, never plaintext.
#[derive(Clone)]
pub struct CreateAdmin {
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

/// Lower-case and trim an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
