//! Client profiles (staff)

use axum::Json;
use axum::extract::{Path, State};
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{ActiveClient, Client, ClientCreate, ClientUpdate};

use super::ApiResult;
use crate::db::clients;
use crate::db::dashboard::{ACTIVE_CLIENT_DAYS, days_before};
use crate::state::AppState;
use crate::util::today;

pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Client>> {
    Ok(Json(clients::list(&state.pool).await?))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Client> {
    Ok(Json(clients::get(&state.pool, id).await?))
}

/// POST /api/clients; `user_id` names the owning account
pub async fn create(
    State(state): State<AppState>,
    Json(data): Json<ClientCreate>,
) -> ApiResult<Client> {
    let user_id = data.user_id.ok_or_else(|| {
        AppError::with_message(ErrorCode::RequiredField, "user_id is required")
            .with_detail("field", "user_id")
    })?;
    let id = clients::create(&state.pool, user_id, &data).await?;
    tracing::info!(client_id = id, user_id, "Client created");
    Ok(Json(clients::get(&state.pool, id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(data): Json<ClientUpdate>,
) -> ApiResult<Client> {
    Ok(Json(clients::update(&state.pool, id, &data).await?))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse> {
    clients::delete(&state.pool, id).await?;
    tracing::info!(client_id = id, "Client deleted");
    Ok(Json(ApiResponse::ok()))
}

/// GET /api/clients/active: clients with orders in the last 30 days
pub async fn active(State(state): State<AppState>) -> ApiResult<Vec<ActiveClient>> {
    let since = days_before(today(), ACTIVE_CLIENT_DAYS);
    Ok(Json(clients::active_since(&state.pool, since).await?))
}
