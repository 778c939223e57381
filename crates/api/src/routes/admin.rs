//! Route definitions for the `/admin` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{admin, auth};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// POST   /login           -> login (public)
/// GET    /pending         -> list_pending
/// GET    /stats           -> stats
/// PATCH  /{id}/approve    -> approve
/// PATCH  /{id}/reject     -> reject
/// PATCH  /{id}            -> edit
/// DELETE /{id}            -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/pending", get(admin::list_pending))
        .route("/stats", get(admin::stats))
        .route("/{id}/approve", patch(admin::approve))
        .route("/{id}/reject", patch(admin::reject))
        .route("/{id}", patch(admin::edit).delete(admin::delete))
}
