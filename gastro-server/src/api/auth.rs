//! Token login for API clients

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::User;
use validator::Validate;

use super::ApiResult;
use crate::auth::CurrentUser;
use crate::auth::session::create_token;
use crate::db::users;
use crate::state::AppState;
use crate::util::{validate_payload, verify_password};

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    validate_payload(&req)?;
    let username = req.username.trim();
    let row = users::find_by_username(&state.pool, username)
        .await?
        .ok_or_else(AppError::invalid_credentials)?;

    if !verify_password(&req.password, &row.password_hash) {
        tracing::warn!(username = %username, "API login failed");
        return Err(AppError::invalid_credentials());
    }
    if !row.is_active {
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    let user = User::from(row);
    let token = create_token(&CurrentUser::from(&user), state.jwt_secret()).map_err(|e| {
        tracing::error!(error = %e, "JWT creation failed");
        AppError::new(ErrorCode::InternalError)
    })?;

    tracing::info!(user_id = user.id, "API login");
    Ok(Json(LoginResponse { token, user }))
}
