use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::{issue_token, CurrentAdmin};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
}

/// The single shared-password login gate. The expected password is injected
/// via configuration and compared in one place.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if !state.config.auth.password_matches(&payload.password) {
        return Err(AppError::Unauthorized);
    }

    let access_token = issue_token(&state.config.auth)?;
    Ok(Json(LoginResponse { access_token }))
}

#[derive(Debug, Serialize)]
pub struct AdminInfo {
    pub subject: String,
}

pub async fn me(Extension(current_admin): Extension<CurrentAdmin>) -> Result<Json<AdminInfo>> {
    Ok(Json(AdminInfo {
        subject: current_admin.subject,
    }))
}
