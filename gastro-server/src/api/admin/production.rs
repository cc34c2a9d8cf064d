//! Production batches with derived metrics

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use shared::error::ApiResponse;
use shared::models::{
    ProductionCreate, ProductionDashboard, ProductionExportRow, ProductionStatus, ProductionUpdate,
    ProductionView,
};

use crate::api::ApiResult;
use crate::db::{dashboard, production};
use crate::state::AppState;
use crate::util::today;

#[derive(Debug, Default, Deserialize)]
pub struct ProductionQuery {
    pub status: Option<ProductionStatus>,
}

/// GET /api/admin/production?status=EN_PROCESO
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ProductionQuery>,
) -> ApiResult<Vec<ProductionView>> {
    let rows = production::list(&state.pool, query.status).await?;
    Ok(Json(rows.into_iter().map(ProductionView::from).collect()))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<ProductionView> {
    Ok(Json(production::get(&state.pool, id).await?.into()))
}

pub async fn create(
    State(state): State<AppState>,
    Json(data): Json<ProductionCreate>,
) -> ApiResult<ProductionView> {
    Ok(Json(production::create(&state.pool, &data).await?.into()))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(data): Json<ProductionUpdate>,
) -> ApiResult<ProductionView> {
    Ok(Json(production::update(&state.pool, id, &data).await?.into()))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse> {
    production::delete(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok()))
}

/// Spreadsheet rows for the (optionally filtered) batch list
pub async fn export(
    State(state): State<AppState>,
    Query(query): Query<ProductionQuery>,
) -> ApiResult<Vec<ProductionExportRow>> {
    let rows = production::list(&state.pool, query.status).await?;
    Ok(Json(rows.iter().map(ProductionExportRow::from).collect()))
}

pub async fn dashboard(State(state): State<AppState>) -> ApiResult<ProductionDashboard> {
    Ok(Json(dashboard::production_overview(&state.pool, today()).await?))
}
