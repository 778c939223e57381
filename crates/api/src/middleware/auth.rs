//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use fyparchive_core::error::CoreError;
use fyparchive_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated admin extracted from a JWT Bearer token in the `Authorization` header.
///
/// Add it as a parameter to any handler that requires an admin:
///
/// ```ignore
/// async fn my_handler(admin: AuthAdmin) -> AppResult<ApiResponse<()>> {
///     tracing::info!(admin_id = admin.admin_id, "handling request");
///     Ok(ApiResponse::message("done"))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthAdmin {
    /// The admin's internal database id (from `claims.sub`).
    pub admin_id: DbId,
    pub email: String,
    pub role: String,
}

impl FromRequestParts<AppState> for AuthAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "No authorization token provided".into(),
                ))
            })?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Invalid Authorization format. Expected: Bearer <token>".into(),
                ))
            })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthAdmin {
            admin_id: claims.sub,
            email: claims.email,
            role: claims.role,
        })
    }
}
