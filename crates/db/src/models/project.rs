//! Project entity model and DTOs.

use fyparchive_core::project::ProjectStatus;
use fyparchive_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A project row from the `projects` table.
///
/// `file_path` is internal storage detail and is never serialized.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: DbId,
    pub project_id: String,
    pub title: String,
    pub author: String,
    pub department: String,
    pub year: i32,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub supervisor: String,
    #[serde(skip_serializing)]
    pub file_path: String,
    pub file_name: String,
    pub file_size: i64,
    #[sqlx(try_from = "String")]
    pub status: ProjectStatus,
    pub views: i64,
    pub downloads: i64,
    pub ratings: Vec<i32>,
    pub uploaded_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new project. Status always starts as `pending`.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub project_id: String,
    pub title: String,
    pub author: String,
    pub department: String,
    pub year: i32,
    pub abstract_text: String,
    pub supervisor: String,
    pub file_path: String,
    pub file_name: String,
    pub file_size: i64,
}

/// DTO for an admin edit. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub abstract_text: Option<String>,
    pub supervisor: Option<String>,
}

/// Filters for the public search. Every filter is optional and the result is
/// always restricted to approved projects.
#[derive(Debug, Clone, Default)]
pub struct ProjectSearch {
    /// Free text matched against title, author, and abstract.
    pub query: Option<String>,
    pub year: Option<i32>,
    /// Exact department name.
    pub department: Option<String>,
    /// Case-insensitive substring of the author name.
    pub author: Option<String>,
}

/// Aggregate counters across all projects.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    pub total: i64,
    pub approved: i64,
    pub pending: i64,
    pub rejected: i64,
    pub total_views: i64,
    pub total_downloads: i64,
}

/// Compact row for the most-downloaded leaderboard.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProject {
    pub id: DbId,
    pub project_id: String,
    pub title: String,
    pub author: String,
    pub downloads: i64,
    pub views: i64,
}
