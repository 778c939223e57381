//! Project comment model and DTO.

use fyparchive_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the append-only `project_comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: DbId,
    #[serde(skip_serializing)]
    pub project_id: DbId,
    pub staff_name: String,
    pub staff_email: String,
    #[serde(rename = "comment")]
    pub body: String,
    pub created_at: Timestamp,
}

/// DTO for appending a comment. Values must already be sanitized.
#[derive(Debug, Clone)]
pub struct CreateComment {
    pub staff_name: String,
    pub staff_email: String,
    pub body: String,
}
