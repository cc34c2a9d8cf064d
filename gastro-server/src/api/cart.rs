//! Cart endpoints; every operation is scoped to the caller's own items

use axum::Json;
use axum::extract::{Extension, Path, State};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::error::ApiResponse;
use shared::models::{CartItem, CartItemCreate, CartItemUpdate, CartSummary, Weekday};

use super::ApiResult;
use crate::auth::CurrentUser;
use crate::db::cart;
use crate::state::AppState;

#[derive(Serialize)]
pub struct TotalResponse {
    pub total: Decimal,
}

#[derive(Serialize)]
pub struct ClearResponse {
    pub removed: u64,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Vec<CartItem>> {
    Ok(Json(cart::list_for_user(&state.pool, user.user_id).await?))
}

/// POST /api/cart. Quantity defaults to 1, weekday to Monday.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(data): Json<CartItemCreate>,
) -> ApiResult<CartItem> {
    let item = cart::add(
        &state.pool,
        user.user_id,
        data.dish_id,
        data.quantity.unwrap_or(1),
        data.weekday.unwrap_or(Weekday::Lun),
    )
    .await?;
    Ok(Json(item))
}

pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<CartItem> {
    Ok(Json(cart::get(&state.pool, id, Some(user.user_id)).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(data): Json<CartItemUpdate>,
) -> ApiResult<CartItem> {
    Ok(Json(cart::update(&state.pool, id, Some(user.user_id), &data).await?))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse> {
    cart::remove(&state.pool, id, Some(user.user_id)).await?;
    Ok(Json(ApiResponse::ok()))
}

/// GET /api/cart/summary
pub async fn summary(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<CartSummary> {
    let items = cart::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(CartSummary::from_items(&items)))
}

/// GET /api/cart/total
pub async fn total(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<TotalResponse> {
    let total = cart::total(&state.pool, user.user_id).await?;
    Ok(Json(TotalResponse { total }))
}

/// DELETE /api/cart/clear
pub async fn clear(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<ClearResponse> {
    let removed = cart::clear(&state.pool, user.user_id).await?;
    Ok(Json(ClearResponse { removed }))
}
