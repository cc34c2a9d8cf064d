//! Dishes, weekday availability and companies

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use shared::error::ApiResponse;
use shared::models::{
    AvailabilityInput, Company, CompanyCreate, CompanyUpdate, Dish, DishAvailability, DishCreate,
    DishUpdate,
};

use crate::api::ApiResult;
use crate::api::dishes::DishQuery;
use crate::db::{availability, companies, dishes};
use crate::state::AppState;

// ── Dishes ──

pub async fn list_dishes(
    State(state): State<AppState>,
    Query(query): Query<DishQuery>,
) -> ApiResult<Vec<Dish>> {
    Ok(Json(dishes::list(&state.pool, query.group, query.status).await?))
}

pub async fn get_dish(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Dish> {
    Ok(Json(dishes::require(&state.pool, id).await?))
}

pub async fn create_dish(
    State(state): State<AppState>,
    Json(data): Json<DishCreate>,
) -> ApiResult<Dish> {
    let dish = dishes::create(&state.pool, &data).await?;
    state.group_cache.invalidate().await;
    tracing::info!(dish_id = dish.id, code = %dish.code, "Dish created");
    Ok(Json(dish))
}

pub async fn update_dish(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(data): Json<DishUpdate>,
) -> ApiResult<Dish> {
    let dish = dishes::update(&state.pool, id, &data).await?;
    state.group_cache.invalidate().await;
    tracing::info!(dish_id = id, "Dish updated");
    Ok(Json(dish))
}

pub async fn delete_dish(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse> {
    dishes::delete(&state.pool, id).await?;
    state.group_cache.invalidate().await;
    tracing::info!(dish_id = id, "Dish deleted");
    Ok(Json(ApiResponse::ok()))
}

// ── Availability ──

#[derive(Debug, Default, Deserialize)]
pub struct AvailabilityQuery {
    pub dish_id: Option<i64>,
}

pub async fn list_availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> ApiResult<Vec<DishAvailability>> {
    Ok(Json(availability::list(&state.pool, query.dish_id).await?))
}

pub async fn get_availability(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<DishAvailability> {
    Ok(Json(availability::get(&state.pool, id).await?))
}

pub async fn create_availability(
    State(state): State<AppState>,
    Json(input): Json<AvailabilityInput>,
) -> ApiResult<DishAvailability> {
    Ok(Json(availability::create(&state.pool, &input).await?))
}

pub async fn update_availability(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<AvailabilityInput>,
) -> ApiResult<DishAvailability> {
    Ok(Json(availability::update(&state.pool, id, &input).await?))
}

pub async fn delete_availability(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse> {
    availability::delete(&state.pool, id).await?;
    Ok(Json(ApiResponse::ok()))
}

// ── Companies ──

pub async fn list_companies(State(state): State<AppState>) -> ApiResult<Vec<Company>> {
    Ok(Json(companies::list(&state.pool).await?))
}

pub async fn get_company(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Company> {
    Ok(Json(companies::get(&state.pool, id).await?))
}

pub async fn create_company(
    State(state): State<AppState>,
    Json(data): Json<CompanyCreate>,
) -> ApiResult<Company> {
    let company = companies::create(&state.pool, &data).await?;
    tracing::info!(company_id = company.id, code = %company.code, "Company created");
    Ok(Json(company))
}

pub async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(data): Json<CompanyUpdate>,
) -> ApiResult<Company> {
    Ok(Json(companies::update(&state.pool, id, &data).await?))
}

pub async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse> {
    companies::delete(&state.pool, id).await?;
    tracing::info!(company_id = id, "Company deleted");
    Ok(Json(ApiResponse::ok()))
}
