//! Repository for the `admins` table.

use fyparchive_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::admin::{normalize_email, Admin, CreateAdmin};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, password_hash, role, last_login_at, created_at, updated_at";

/// Provides account queries for admins.
///
/// Emails are normalized with [`normalize_email`] on every write and lookup.
pub struct AdminRepo;

impl AdminRepo {
    /// Insert a new admin, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateAdmin) -> Result<Admin, sqlx::Error> {
        let query = format!(
            "INSERT INTO admins (email, password_hash, role)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Admin>(&query)
            .bind(normalize_email(&input.email))
            .bind(&input.password_hash)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    /// Find an admin by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Admin>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM admins WHERE id = $1");
        sqlx::query_as::<_, Admin>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an admin by email (case-insensitive through normalization).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Admin>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM admins WHERE email = $1");
        sqlx::query_as::<_, Admin>(&query)
            .bind(normalize_email(email))
            .fetch_optional(pool)
            .await
    }

    /// Stamp `last_login_at` with the current time, returning it.
    pub async fn record_successful_login(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Timestamp>, sqlx::Error> {
        sqlx::query_scalar::<_, Timestamp>(
            "UPDATE admins SET last_login_at = NOW() WHERE id = $1 RETURNING last_login_at",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
