//! Repository for the `project_comments` table.

use fyparchive_core::lookup::ProjectLookup;
use fyparchive_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::{Comment, CreateComment};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, staff_name, staff_email, body, created_at";

/// Provides append and listing operations for project comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Append a comment to the project resolved by either identifier, any
    /// status, in a single statement.
    ///
    /// Returns `None` if the id does not resolve to a project.
    pub async fn create_for_lookup(
        pool: &PgPool,
        lookup: &ProjectLookup,
        input: &CreateComment,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "INSERT INTO project_comments (project_id, staff_name, staff_email, body)
             SELECT id, $3, $4, $5 FROM projects
             WHERE (id = $1 OR project_id = $2)
             LIMIT 1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(lookup.primary_key())
            .bind(lookup.project_code())
            .bind(&input.staff_name)
            .bind(&input.staff_email)
            .bind(&input.body)
            .fetch_optional(pool)
            .await
    }

    /// All comments on a project, oldest first.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_comments
             WHERE project_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }
}
