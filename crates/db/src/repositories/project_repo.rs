//! Repository for the `projects` table.

use fyparchive_core::lookup::ProjectLookup;
use fyparchive_core::pagination::PageRequest;
use fyparchive_core::project::ProjectStatus;
use fyparchive_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{
    CreateProject, Project, ProjectSearch, ProjectStats, TopProject, UpdateProject,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, title, author, department, year, abstract_text, \
                       supervisor, file_path, file_name, file_size, status, views, downloads, \
                       ratings, uploaded_at, created_at, updated_at";

/// Dual-identifier predicate. Bind `lookup.primary_key()` as `$1` and
/// `lookup.project_code()` as `$2`.
const LOOKUP_PREDICATE: &str = "(id = $1 OR project_id = $2)";

/// Public search predicate over `$1` (text query), `$2` (year),
/// `$3` (department), `$4` (ILIKE author pattern).
const SEARCH_PREDICATE: &str = "status = 'approved'
    AND ($1::text IS NULL OR search_vector @@ websearch_to_tsquery('english', $1))
    AND ($2::int IS NULL OR year = $2)
    AND ($3::text IS NULL OR department = $3)
    AND ($4::text IS NULL OR author ILIKE $4)";

/// Build a case-insensitive substring pattern, escaping LIKE metacharacters
/// so user input is matched literally.
pub(crate) fn contains_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Provides lifecycle, engagement, and reporting queries for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project in `pending` status, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects
                (project_id, title, author, department, year, abstract_text, supervisor,
                 file_path, file_name, file_size, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'pending')
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.project_id)
            .bind(&input.title)
            .bind(&input.author)
            .bind(&input.department)
            .bind(input.year)
            .bind(&input.abstract_text)
            .bind(&input.supervisor)
            .bind(&input.file_path)
            .bind(&input.file_name)
            .bind(input.file_size)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its primary key, regardless of status.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Resolve a project by either identifier, regardless of status.
    pub async fn find_by_lookup(
        pool: &PgPool,
        lookup: &ProjectLookup,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE {LOOKUP_PREDICATE} LIMIT 1");
        sqlx::query_as::<_, Project>(&query)
            .bind(lookup.primary_key())
            .bind(lookup.project_code())
            .fetch_optional(pool)
            .await
    }

    /// Resolve an approved project by either identifier.
    pub async fn find_approved(
        pool: &PgPool,
        lookup: &ProjectLookup,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE {LOOKUP_PREDICATE} AND status = 'approved'
             LIMIT 1"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(lookup.primary_key())
            .bind(lookup.project_code())
            .fetch_optional(pool)
            .await
    }

    /// Resolve an approved project and count the view in the same statement.
    ///
    /// Returns the row with the incremented `views`, or `None` when the id
    /// does not resolve to an approved project (nothing is incremented then).
    pub async fn find_approved_and_record_view(
        pool: &PgPool,
        lookup: &ProjectLookup,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET views = views + 1
             WHERE {LOOKUP_PREDICATE} AND status = 'approved'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(lookup.primary_key())
            .bind(lookup.project_code())
            .fetch_optional(pool)
            .await
    }

    /// Atomically increment `downloads` on an approved project.
    ///
    /// Returns the new counter, or `None` if the project is gone or no longer
    /// approved.
    pub async fn record_download(pool: &PgPool, id: DbId) -> Result<Option<i64>, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "UPDATE projects SET downloads = downloads + 1
             WHERE id = $1 AND status = 'approved'
             RETURNING downloads",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// One page of projects in `status`, newest upload first, plus the total.
    pub async fn list_by_status(
        pool: &PgPool,
        status: ProjectStatus,
        page: PageRequest,
    ) -> Result<(Vec<Project>, i64), sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE status = $1
             ORDER BY uploaded_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        let items = sqlx::query_as::<_, Project>(&query)
            .bind(status.as_str())
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(pool)
            .await?;

        Ok((items, total))
    }

    /// Search approved projects, newest upload first, plus the total match count.
    pub async fn search(
        pool: &PgPool,
        search: &ProjectSearch,
        page: PageRequest,
    ) -> Result<(Vec<Project>, i64), sqlx::Error> {
        let author_pattern = search.author.as_deref().map(contains_pattern);

        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE {SEARCH_PREDICATE}
             ORDER BY uploaded_at DESC, id DESC
             LIMIT $5 OFFSET $6"
        );
        let items = sqlx::query_as::<_, Project>(&query)
            .bind(&search.query)
            .bind(search.year)
            .bind(&search.department)
            .bind(&author_pattern)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM projects WHERE {SEARCH_PREDICATE}");
        let total = sqlx::query_scalar::<_, i64>(&count_query)
            .bind(&search.query)
            .bind(search.year)
            .bind(&search.department)
            .bind(&author_pattern)
            .fetch_one(pool)
            .await?;

        Ok((items, total))
    }

    /// Move a project from `from` to `to` only if it is currently in `from`.
    ///
    /// Returns `None` when the id does not exist or the status has already
    /// moved on; callers use [`ProjectRepo::find_by_id`] to tell those apart.
    pub async fn transition_status(
        pool: &PgPool,
        id: DbId,
        from: ProjectStatus,
        to: ProjectStatus,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET status = $3
             WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(from.as_str())
            .bind(to.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Apply an admin edit. Only non-`None` fields are written.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_details(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                title = COALESCE($2, title),
                abstract_text = COALESCE($3, abstract_text),
                supervisor = COALESCE($4, supervisor)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.abstract_text)
            .bind(&input.supervisor)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a project, returning the removed row so the caller
    /// can clean up its file. Comments cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("DELETE FROM projects WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Append a rating to a project resolved by either identifier, any status.
    ///
    /// Returns the full rating sequence after the append, or `None` if the id
    /// does not resolve. The caller must validate the range first; the schema
    /// CHECK rejects anything outside 1..=5 regardless.
    pub async fn add_rating(
        pool: &PgPool,
        lookup: &ProjectLookup,
        rating: i32,
    ) -> Result<Option<Vec<i32>>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET ratings = array_append(ratings, $3)
             WHERE {LOOKUP_PREDICATE}
             RETURNING ratings"
        );
        sqlx::query_scalar::<_, Vec<i32>>(&query)
            .bind(lookup.primary_key())
            .bind(lookup.project_code())
            .bind(rating)
            .fetch_optional(pool)
            .await
    }

    /// Counts by status and engagement totals across every project.
    pub async fn stats(pool: &PgPool) -> Result<ProjectStats, sqlx::Error> {
        sqlx::query_as::<_, ProjectStats>(
            "SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'approved') AS approved,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                COUNT(*) FILTER (WHERE status = 'rejected') AS rejected,
                COALESCE(SUM(views), 0)::BIGINT AS total_views,
                COALESCE(SUM(downloads), 0)::BIGINT AS total_downloads
             FROM projects",
        )
        .fetch_one(pool)
        .await
    }

    /// The `limit` most-downloaded approved projects.
    pub async fn top_downloaded(pool: &PgPool, limit: i64) -> Result<Vec<TopProject>, sqlx::Error> {
        sqlx::query_as::<_, TopProject>(
            "SELECT id, project_id, title, author, downloads, views
             FROM projects
             WHERE status = 'approved'
             ORDER BY downloads DESC, id ASC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
