//! Dish catalogue for authenticated users

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use shared::models::{BestSeller, Dish, DishGroup, DishStatus};

use super::ApiResult;
use crate::db::dishes;
use crate::state::AppState;

pub const BEST_SELLERS_LIMIT: i64 = 10;

#[derive(Debug, Default, Deserialize)]
pub struct DishQuery {
    pub group: Option<DishGroup>,
    pub status: Option<DishStatus>,
}

/// GET /api/dishes?group=&status=
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<DishQuery>,
) -> ApiResult<Vec<Dish>> {
    let rows = dishes::list(&state.pool, query.group, query.status).await?;
    Ok(Json(rows))
}

/// GET /api/dishes/{id}
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Dish> {
    Ok(Json(dishes::require(&state.pool, id).await?))
}

/// GET /api/dishes/best-sellers
pub async fn best_sellers(State(state): State<AppState>) -> ApiResult<Vec<BestSeller>> {
    let rows = dishes::best_sellers(&state.pool, BEST_SELLERS_LIMIT).await?;
    Ok(Json(rows))
}
