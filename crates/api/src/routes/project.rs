//! Route definitions for the public `/projects` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{project, upload};
use crate::state::AppState;

/// Room for the text fields and multipart framing around the PDF itself.
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

/// Routes mounted at `/projects`.
///
/// ```text
/// POST /upload            -> upload_project
/// GET  /approved          -> list_approved
/// GET  /search            -> search
/// GET  /{id}              -> get_project
/// POST /{id}/download     -> download
/// POST /{id}/comments     -> add_comment
/// POST /{id}/ratings      -> add_rating
/// ```
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/upload",
            post(upload::upload_project).layer(DefaultBodyLimit::max(
                max_upload_bytes.saturating_add(MULTIPART_OVERHEAD),
            )),
        )
        .route("/approved", get(project::list_approved))
        .route("/search", get(project::search))
        .route("/{id}", get(project::get_project))
        .route("/{id}/download", post(project::download))
        .route("/{id}/comments", post(project::add_comment))
        .route("/{id}/ratings", post(project::add_rating))
}
