//! Handlers for the admin moderation endpoints.
//!
//! Every handler takes [`AuthAdmin`], so a missing or invalid bearer token is
//! rejected before any query runs. Projects are addressed by primary key.

use axum::extract::{Path, State};
use fyparchive_core::error::CoreError;
use fyparchive_core::lookup::ProjectLookup;
use fyparchive_core::pagination::PageRequest;
use fyparchive_core::project::ProjectStatus;
use fyparchive_core::types::DbId;
use fyparchive_core::validation::ProjectEditFields;
use fyparchive_db::models::project::{Project, ProjectStats, TopProject, UpdateProject};
use fyparchive_db::repositories::ProjectRepo;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::extract::{AppJson, AppQuery};
use crate::handlers::project::{PageParams, ProjectPage};
use crate::middleware::auth::AuthAdmin;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Number of entries in the stats leaderboard.
const TOP_PROJECTS_LIMIT: i64 = 5;

/// Body for `PATCH /admin/{id}`. Absent or blank fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct EditProjectRequest {
    pub title: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub supervisor: Option<String>,
}

/// Aggregate counters plus the download leaderboard.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: ProjectStats,
    pub top_projects: Vec<TopProject>,
}

/// Admin routes only accept the numeric primary key.
fn parse_admin_id(raw: &str) -> Result<DbId, CoreError> {
    ProjectLookup::parse(raw)
        .primary_key()
        .ok_or_else(|| CoreError::project_not_found(raw))
}

/// Move a pending project to `target`, distinguishing a missing project
/// (404) from one that has already left `pending` (409).
async fn transition(state: &AppState, id: DbId, target: ProjectStatus) -> AppResult<Project> {
    if let Some(project) =
        ProjectRepo::transition_status(&state.pool, id, ProjectStatus::Pending, target).await?
    {
        return Ok(project);
    }

    let current = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::project_not_found(id.to_string()))?;
    current.status.check_transition(target)?;

    Err(CoreError::Conflict(format!("Project {id} changed status concurrently")).into())
}

/// GET /api/admin/pending
pub async fn list_pending(
    admin: AuthAdmin,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<PageParams>,
) -> AppResult<ApiResponse<ProjectPage>> {
    let page = PageRequest::from_query(params.page.as_deref());
    let (projects, total) =
        ProjectRepo::list_by_status(&state.pool, ProjectStatus::Pending, page).await?;

    tracing::debug!(admin_id = admin.admin_id, total, "Listed pending projects");

    Ok(ApiResponse::ok(
        "Pending projects retrieved",
        ProjectPage::new(projects, total, page),
    ))
}

/// PATCH /api/admin/{id}/approve
pub async fn approve(
    admin: AuthAdmin,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<ApiResponse<Project>> {
    let id = parse_admin_id(&raw_id)?;
    let project = transition(&state, id, ProjectStatus::Approved).await?;

    tracing::info!(
        admin_id = admin.admin_id,
        admin_email = %admin.email,
        role = %admin.role,
        project_id = id,
        "Project approved"
    );

    Ok(ApiResponse::ok("Project approved successfully", project))
}

/// PATCH /api/admin/{id}/reject
///
/// Rejected projects lose their stored file.
pub async fn reject(
    admin: AuthAdmin,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<ApiResponse<Project>> {
    let id = parse_admin_id(&raw_id)?;
    let project = transition(&state, id, ProjectStatus::Rejected).await?;

    state.uploads.remove_best_effort(&project.file_path).await;
    tracing::info!(
        admin_id = admin.admin_id,
        admin_email = %admin.email,
        role = %admin.role,
        project_id = id,
        "Project rejected"
    );

    Ok(ApiResponse::ok("Project rejected", project))
}

/// PATCH /api/admin/{id}
///
/// Edit title, abstract, or supervisor. Values are revalidated and sanitized.
pub async fn edit(
    admin: AuthAdmin,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    AppJson(input): AppJson<EditProjectRequest>,
) -> AppResult<ApiResponse<Project>> {
    let id = parse_admin_id(&raw_id)?;
    let changes =
        ProjectEditFields::new(input.title, input.abstract_text, input.supervisor).into_changes()?;

    let updated = if changes.is_empty() {
        ProjectRepo::find_by_id(&state.pool, id).await?
    } else {
        let update = UpdateProject {
            title: changes.title,
            abstract_text: changes.abstract_text,
            supervisor: changes.supervisor,
        };
        ProjectRepo::update_details(&state.pool, id, &update).await?
    };
    let project = updated.ok_or_else(|| CoreError::project_not_found(id.to_string()))?;

    tracing::info!(
        admin_id = admin.admin_id,
        admin_email = %admin.email,
        role = %admin.role,
        project_id = id,
        "Project edited"
    );

    Ok(ApiResponse::ok("Project updated successfully", project))
}

/// DELETE /api/admin/{id}
///
/// Permanently removes the project, its comments, and its stored file.
pub async fn delete(
    admin: AuthAdmin,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    let id = parse_admin_id(&raw_id)?;
    let project = ProjectRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::project_not_found(id.to_string()))?;

    state.uploads.remove_best_effort(&project.file_path).await;
    tracing::info!(
        admin_id = admin.admin_id,
        admin_email = %admin.email,
        role = %admin.role,
        project_id = id,
        "Project deleted"
    );

    Ok(ApiResponse::message("Project deleted successfully"))
}

/// GET /api/admin/stats
pub async fn stats(
    _admin: AuthAdmin,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<StatsResponse>> {
    let stats = ProjectRepo::stats(&state.pool).await?;
    let top_projects = ProjectRepo::top_downloaded(&state.pool, TOP_PROJECTS_LIMIT).await?;

    Ok(ApiResponse::ok(
        "Stats retrieved successfully",
        StatsResponse {
            stats,
            top_projects,
        },
    ))
}
