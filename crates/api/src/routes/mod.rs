pub mod admin;
pub mod health;
pub mod project;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::Router;

use crate::middleware::rate_limit::rate_limit;
use crate::state::AppState;

/// Ceiling for JSON request bodies.
pub const JSON_BODY_LIMIT: usize = 10 * 1024 * 1024;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects/upload                   upload (POST, multipart)
/// /projects/approved                 approved list (GET)
/// /projects/search                   search approved (GET)
/// /projects/{id}                     fetch approved, counts a view (GET)
/// /projects/{id}/download            stream PDF, counts a download (POST)
/// /projects/{id}/comments            append comment (POST)
/// /projects/{id}/ratings             append rating (POST)
///
/// /admin/login                       issue token (POST)
/// /admin/pending                     pending list (GET, auth)
/// /admin/stats                       counters (GET, auth)
/// /admin/{id}/approve                approve (PATCH, auth)
/// /admin/{id}/reject                 reject (PATCH, auth)
/// /admin/{id}                        edit (PATCH), delete (DELETE), auth
/// ```
///
/// Every route here is behind the per-IP rate limiter.
pub fn api_routes(state: &AppState) -> Router<AppState> {
    let max_upload_bytes = usize::try_from(state.config.upload.max_file_size).unwrap_or(usize::MAX);

    Router::new()
        .nest("/projects", project::router(max_upload_bytes))
        .nest("/admin", admin::router())
        .layer(DefaultBodyLimit::max(JSON_BODY_LIMIT))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
}
