//! Handler for `POST /api/admin/login`.

use axum::extract::State;
use fyparchive_core::error::CoreError;
use fyparchive_core::validation::into_core_error;
use fyparchive_db::models::admin::AdminInfo;
use fyparchive_db::repositories::AdminRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Request body for `POST /admin/login`. Not `Debug`: it holds a password.
#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(
        required(message = "Valid email is required"),
        email(message = "Valid email is required")
    )]
    pub email: Option<String>,

    #[serde(default)]
    #[validate(
        required(message = "Password is required"),
        length(min = 1, message = "Password is required")
    )]
    pub password: Option<String>,
}

/// Successful login payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub admin: AdminInfo,
}

/// POST /api/admin/login
///
/// Authenticate with email + password. Unknown email and wrong password are
/// reported identically, and `last_login_at` only moves on success.
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    input
        .validate()
        .map_err(|e| into_core_error(&e, &["email", "password"]))?;
    let (Some(email), Some(password)) = (input.email, input.password) else {
        return Err(CoreError::Validation("Email and password are required".into()).into());
    };

    let admin = AdminRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or(CoreError::InvalidCredentials)?;

    let password_valid = verify_password(&password, &admin.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        tracing::warn!(admin_id = admin.id, "Failed admin login");
        return Err(CoreError::InvalidCredentials.into());
    }

    let last_login = AdminRepo::record_successful_login(&state.pool, admin.id).await?;

    let token = generate_access_token(admin.id, &admin.email, &admin.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let mut info = AdminInfo::from(&admin);
    info.last_login = last_login.or(info.last_login);

    tracing::info!(admin_id = admin.id, "Admin logged in");

    Ok(ApiResponse::ok(
        "Login successful",
        LoginResponse {
            token,
            expires_in: state.config.jwt.expiry_secs,
            admin: info,
        },
    ))
}
