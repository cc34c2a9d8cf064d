//! Cart items, receipts and order history exports

use axum::Json;
use axum::extract::{Path, Query, State};
use shared::models::{
    CartItem, CartItemUpdate, OrderHistoryEntry, Receipt, ReceiptDetail, ReceiptFilter,
    ShippingRow, WeekdayPivot,
};

use crate::api::ApiResult;
use crate::db::order_history::{self, HistoryFilter};
use crate::db::{cart, receipts};
use crate::state::AppState;

// ── Cart items ──

pub async fn list_cart_items(State(state): State<AppState>) -> ApiResult<Vec<CartItem>> {
    Ok(Json(cart::list_all(&state.pool).await?))
}

pub async fn get_cart_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<CartItem> {
    Ok(Json(cart::get(&state.pool, id, None).await?))
}

/// A new weekday must be one the dish is offered on
pub async fn update_cart_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(data): Json<CartItemUpdate>,
) -> ApiResult<CartItem> {
    Ok(Json(cart::update(&state.pool, id, None, &data).await?))
}

// ── Receipts ──

/// GET /api/admin/receipts?paid=&status=&search=
pub async fn list_receipts(
    State(state): State<AppState>,
    Query(filter): Query<ReceiptFilter>,
) -> ApiResult<Vec<Receipt>> {
    Ok(Json(receipts::list(&state.pool, None, &filter).await?))
}

pub async fn get_receipt(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<ReceiptDetail> {
    Ok(Json(receipts::detail(&state.pool, id, None).await?))
}

// ── Order history ──

pub async fn list_history(
    State(state): State<AppState>,
    Query(filter): Query<HistoryFilter>,
) -> ApiResult<Vec<OrderHistoryEntry>> {
    Ok(Json(order_history::list(&state.pool, &filter).await?))
}

/// Quantities per weekday and dish
pub async fn export_pivot(
    State(state): State<AppState>,
    Query(filter): Query<HistoryFilter>,
) -> ApiResult<WeekdayPivot> {
    let entries = order_history::list(&state.pool, &filter).await?;
    Ok(Json(WeekdayPivot::build(&entries)))
}

/// Delivery sheet: who, where, what and which day
pub async fn export_shipping(
    State(state): State<AppState>,
    Query(filter): Query<HistoryFilter>,
) -> ApiResult<Vec<ShippingRow>> {
    let rows = order_history::shipping_sources(&state.pool, &filter)
        .await?
        .into_iter()
        .map(ShippingRow::from)
        .collect();
    Ok(Json(rows))
}
