//! Inventory lots and stock movements

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use serde::Deserialize;
use shared::error::ApiResponse;
use shared::models::{
    Freshness, InventoryCreate, InventoryMovement, InventoryUpdate, InventoryView, MovementCreate,
};

use crate::api::ApiResult;
use crate::auth::CurrentUser;
use crate::db::{inventory, movements};
use crate::state::AppState;
use crate::util::today;

#[derive(Debug, Default, Deserialize)]
pub struct LotQuery {
    /// fresco | advertencia | critico | vencido
    pub freshness: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MovementQuery {
    pub lot_id: Option<i64>,
}

// ── Lots ──

pub async fn list_lots(
    State(state): State<AppState>,
    Query(query): Query<LotQuery>,
) -> ApiResult<Vec<InventoryView>> {
    let freshness = query
        .freshness
        .as_deref()
        .filter(|f| !f.trim().is_empty())
        .map(Freshness::parse_filter)
        .transpose()?;
    let today = today();
    let lots = inventory::list(&state.pool, freshness, today).await?;
    Ok(Json(
        lots.into_iter()
            .map(|lot| InventoryView::new(lot, today))
            .collect(),
    ))
}

pub async fn get_lot(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<InventoryView> {
    let lot = inventory::get(&state.pool, id).await?;
    Ok(Json(InventoryView::new(lot, today())))
}

pub async fn create_lot(
    State(state): State<AppState>,
    Json(data): Json<InventoryCreate>,
) -> ApiResult<InventoryView> {
    let lot = inventory::create(&state.pool, &data).await?;
    Ok(Json(InventoryView::new(lot, today())))
}

pub async fn update_lot(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(data): Json<InventoryUpdate>,
) -> ApiResult<InventoryView> {
    let lot = inventory::update(&state.pool, id, &data).await?;
    Ok(Json(InventoryView::new(lot, today())))
}

pub async fn delete_lot(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse> {
    inventory::delete(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok()))
}

// ── Movements ──

pub async fn list_movements(
    State(state): State<AppState>,
    Query(query): Query<MovementQuery>,
) -> ApiResult<Vec<InventoryMovement>> {
    Ok(Json(movements::list(&state.pool, query.lot_id).await?))
}

pub async fn get_movement(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<InventoryMovement> {
    Ok(Json(movements::get(&state.pool, id).await?))
}

/// The staff member recording the movement is stored as responsible
pub async fn record_movement(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(data): Json<MovementCreate>,
) -> ApiResult<InventoryMovement> {
    let movement = movements::record(&state.pool, &data, Some(user.user_id)).await?;
    Ok(Json(movement))
}
