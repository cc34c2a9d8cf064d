//! Sales dashboard (staff)

use axum::Json;
use axum::extract::State;
use shared::models::{DashboardStats, MonthlySales};

use super::ApiResult;
use crate::db::dashboard;
use crate::state::AppState;
use crate::util::today;

/// GET /api/dashboard/stats
pub async fn stats(State(state): State<AppState>) -> ApiResult<DashboardStats> {
    Ok(Json(dashboard::stats(&state.pool, today()).await?))
}

/// GET /api/dashboard/monthly-sales
pub async fn monthly_sales(State(state): State<AppState>) -> ApiResult<Vec<MonthlySales>> {
    Ok(Json(dashboard::monthly_sales(&state.pool, today()).await?))
}
