//! Back office (staff only, JSON)
//!
//! Mounted under `/api/admin` inside the staff router, so every handler here
//! can assume an authenticated staff [`CurrentUser`](crate::auth::CurrentUser).

mod catalog;
mod inventory;
mod orders;
mod production;

use axum::extract::State;
use axum::{Json, Router};
use axum::routing::get;
use shared::models::AdminCounters;

use super::ApiResult;
use crate::db::dashboard;
use crate::state::AppState;
use crate::util::today;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/counters", get(counters))
        // Catalogue
        .route(
            "/api/admin/dishes",
            get(catalog::list_dishes).post(catalog::create_dish),
        )
        .route(
            "/api/admin/dishes/{id}",
            get(catalog::get_dish)
                .put(catalog::update_dish)
                .delete(catalog::delete_dish),
        )
        .route(
            "/api/admin/availability",
            get(catalog::list_availability).post(catalog::create_availability),
        )
        .route(
            "/api/admin/availability/{id}",
            get(catalog::get_availability)
                .put(catalog::update_availability)
                .delete(catalog::delete_availability),
        )
        .route(
            "/api/admin/companies",
            get(catalog::list_companies).post(catalog::create_company),
        )
        .route(
            "/api/admin/companies/{id}",
            get(catalog::get_company)
                .put(catalog::update_company)
                .delete(catalog::delete_company),
        )
        // Orders
        .route("/api/admin/cart-items", get(orders::list_cart_items))
        .route(
            "/api/admin/cart-items/{id}",
            get(orders::get_cart_item).put(orders::update_cart_item),
        )
        .route("/api/admin/receipts", get(orders::list_receipts))
        .route("/api/admin/receipts/{id}", get(orders::get_receipt))
        .route("/api/admin/order-history", get(orders::list_history))
        .route("/api/admin/order-history/pivot", get(orders::export_pivot))
        .route("/api/admin/order-history/shipping", get(orders::export_shipping))
        // Production
        .route(
            "/api/admin/production",
            get(production::list).post(production::create),
        )
        .route("/api/admin/production/export", get(production::export))
        .route("/api/admin/production/dashboard", get(production::dashboard))
        .route(
            "/api/admin/production/{id}",
            get(production::get)
                .put(production::update)
                .delete(production::remove),
        )
        // Inventory
        .route(
            "/api/admin/inventory",
            get(inventory::list_lots).post(inventory::create_lot),
        )
        .route(
            "/api/admin/inventory/{id}",
            get(inventory::get_lot)
                .put(inventory::update_lot)
                .delete(inventory::delete_lot),
        )
        .route(
            "/api/admin/movements",
            get(inventory::list_movements).post(inventory::record_movement),
        )
        .route("/api/admin/movements/{id}", get(inventory::get_movement))
}

/// GET /api/admin/counters
async fn counters(State(state): State<AppState>) -> ApiResult<AdminCounters> {
    Ok(Json(dashboard::admin_counters(&state.pool, today()).await?))
}
