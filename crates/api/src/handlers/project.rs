//! Public handlers for browsing and engaging with approved projects.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use fyparchive_core::error::CoreError;
use fyparchive_core::lookup::ProjectLookup;
use fyparchive_core::pagination::{PageRequest, Pagination};
use fyparchive_core::project::ProjectStatus;
use fyparchive_core::rating::{parse_rating, RatingSummary};
use fyparchive_core::sanitize::sanitize_optional;
use fyparchive_core::upload::PDF_CONTENT_TYPE;
use fyparchive_core::validation::into_core_error;
use fyparchive_db::models::comment::{Comment, CreateComment};
use fyparchive_db::models::project::{Project, ProjectSearch};
use fyparchive_db::repositories::{CommentRepo, ProjectRepo};
use serde::{Deserialize, Serialize};
use tokio_util::io::ReaderStream;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppQuery};
use crate::response::ApiResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// `?page=` for list endpoints. Kept as a string so junk falls back to page 1.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
}

/// Query parameters for `GET /projects/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub year: Option<String>,
    pub department: Option<String>,
    pub author: Option<String>,
    pub page: Option<String>,
}

impl SearchParams {
    fn into_search(self) -> Result<(ProjectSearch, PageRequest), CoreError> {
        let page = PageRequest::from_query(self.page.as_deref());
        let year = non_blank(self.year)
            .map(|y| {
                y.parse::<i32>()
                    .map_err(|_| CoreError::Validation("Year must be a whole number".into()))
            })
            .transpose()?;
        let search = ProjectSearch {
            query: non_blank(self.query),
            year,
            department: non_blank(self.department),
            author: non_blank(self.author),
        };
        Ok((search, page))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// One page of projects plus its pagination block.
#[derive(Debug, Serialize)]
pub struct ProjectPage {
    pub projects: Vec<Project>,
    pub pagination: Pagination,
}

impl ProjectPage {
    pub fn new(projects: Vec<Project>, total: i64, page: PageRequest) -> Self {
        Self {
            projects,
            pagination: Pagination::new(total, page),
        }
    }
}

/// A single project with its rating summary and comment thread.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    #[serde(flatten)]
    pub rating: RatingSummary,
    pub comments: Vec<Comment>,
}

/// Body for `POST /projects/{id}/comments`.
///
/// The short names (`name`, `email`, `text`) are accepted as aliases.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    #[serde(default, alias = "name")]
    #[validate(
        required(message = "Staff name is required"),
        length(max = 100, message = "Staff name must be at most 100 characters")
    )]
    pub staff_name: Option<String>,

    #[serde(default, alias = "email")]
    #[validate(
        required(message = "Valid email is required"),
        email(message = "Valid email is required")
    )]
    pub staff_email: Option<String>,

    #[serde(default, alias = "text")]
    #[validate(
        required(message = "Comment is required"),
        length(max = 2000, message = "Comment must be at most 2000 characters")
    )]
    pub comment: Option<String>,
}

const COMMENT_FIELD_ORDER: &[&str] = &["staff_name", "staff_email", "comment"];

impl CommentRequest {
    /// Sanitize, then validate into a repository DTO.
    ///
    /// Length bounds apply to the sanitized text, which is what gets stored.
    fn into_create(self) -> Result<CreateComment, CoreError> {
        let cleaned = Self {
            staff_name: sanitize_optional(self.staff_name.as_deref()),
            staff_email: non_blank(self.staff_email),
            comment: sanitize_optional(self.comment.as_deref()),
        };
        cleaned
            .validate()
            .map_err(|e| into_core_error(&e, COMMENT_FIELD_ORDER))?;

        let required = |value: Option<String>, message: &str| {
            value.ok_or_else(|| CoreError::Validation(message.to_string()))
        };
        Ok(CreateComment {
            staff_name: required(cleaned.staff_name, "Staff name is required")?,
            staff_email: required(cleaned.staff_email, "Valid email is required")?.to_lowercase(),
            body: required(cleaned.comment, "Comment is required")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/projects/approved
///
/// Newest approved projects, 12 per page.
pub async fn list_approved(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<PageParams>,
) -> AppResult<ApiResponse<ProjectPage>> {
    let page = PageRequest::from_query(params.page.as_deref());
    let (projects, total) =
        ProjectRepo::list_by_status(&state.pool, ProjectStatus::Approved, page).await?;

    Ok(ApiResponse::ok(
        "Projects retrieved successfully",
        ProjectPage::new(projects, total, page),
    ))
}

/// GET /api/projects/search
///
/// Free-text and field filters over approved projects, 12 per page.
pub async fn search(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<SearchParams>,
) -> AppResult<ApiResponse<ProjectPage>> {
    let (search, page) = params.into_search()?;
    let (projects, total) = ProjectRepo::search(&state.pool, &search, page).await?;

    tracing::debug!(
        query = ?search.query,
        year = ?search.year,
        department = ?search.department,
        total,
        "Project search"
    );

    Ok(ApiResponse::ok(
        "Search results retrieved",
        ProjectPage::new(projects, total, page),
    ))
}

/// GET /api/projects/{id}
///
/// Fetch an approved project by either identifier. Counts one view.
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ProjectDetail>> {
    let lookup = ProjectLookup::parse(&id);
    let project = ProjectRepo::find_approved_and_record_view(&state.pool, &lookup)
        .await?
        .ok_or_else(|| CoreError::project_not_found(lookup.to_string()))?;

    let comments = CommentRepo::list_for_project(&state.pool, project.id).await?;
    let rating = RatingSummary::from_ratings(&project.ratings);

    Ok(ApiResponse::ok(
        "Project retrieved successfully",
        ProjectDetail {
            project,
            rating,
            comments,
        },
    ))
}

/// POST /api/projects/{id}/download
///
/// Stream the stored PDF of an approved project. Counts one download.
pub async fn download(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let lookup = ProjectLookup::parse(&id);
    let project = ProjectRepo::find_approved(&state.pool, &lookup)
        .await?
        .ok_or_else(|| CoreError::project_not_found(lookup.to_string()))?;

    let (file, file_size) = state
        .uploads
        .open(&project.file_path)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to open stored file: {e}")))?
        .ok_or_else(|| CoreError::FileNotFound(project.file_path.clone()))?;

    let downloads = ProjectRepo::record_download(&state.pool, project.id)
        .await?
        .ok_or_else(|| CoreError::project_not_found(lookup.to_string()))?;

    tracing::info!(project_id = project.id, downloads, "Project downloaded");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, PDF_CONTENT_TYPE)
        .header(header::CONTENT_LENGTH, file_size.to_string())
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", project.file_name),
        )
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|e| AppError::InternalError(format!("Failed to build download response: {e}")))
}

/// POST /api/projects/{id}/comments
///
/// Append a staff comment to a project in any status.
pub async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(input): AppJson<CommentRequest>,
) -> AppResult<ApiResponse<Comment>> {
    let create = input.into_create()?;
    let lookup = ProjectLookup::parse(&id);

    let comment = CommentRepo::create_for_lookup(&state.pool, &lookup, &create)
        .await?
        .ok_or_else(|| CoreError::project_not_found(lookup.to_string()))?;

    tracing::info!(
        project_id = comment.project_id,
        comment_id = comment.id,
        "Comment added"
    );

    Ok(ApiResponse::created("Comment added successfully", comment))
}

/// POST /api/projects/{id}/ratings
///
/// Append a 1-5 rating to a project in any status. The body is taken as raw
/// JSON so that floats and strings can be rejected explicitly.
pub async fn add_rating(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(body): AppJson<serde_json::Value>,
) -> AppResult<ApiResponse<RatingSummary>> {
    let rating = parse_rating(body.get("rating"))?;
    let lookup = ProjectLookup::parse(&id);

    let ratings = ProjectRepo::add_rating(&state.pool, &lookup, rating)
        .await?
        .ok_or_else(|| CoreError::project_not_found(lookup.to_string()))?;

    Ok(ApiResponse::created(
        "Rating added successfully",
        RatingSummary::from_ratings(&ratings),
    ))
}
