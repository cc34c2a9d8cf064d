//! JSON API routes
//!
//! Every route except `/health` and `/api/auth/login` requires a bearer token
//! or session cookie; client and dashboard routes additionally require staff.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod clients;
pub mod dashboard;
pub mod dishes;
pub mod health;
pub mod receipts;

use axum::routing::{delete, get, post};
use axum::{Json, Router, middleware};
use shared::error::AppError;

use crate::auth::rate_limit::login_rate_limit;
use crate::auth::{require_staff, require_user};
use crate::state::AppState;

pub type ApiResult<T> = Result<Json<T>, AppError>;

pub fn router(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/api/auth/login",
            post(auth::login).layer(middleware::from_fn_with_state(
                state.clone(),
                login_rate_limit,
            )),
        );

    let user = Router::new()
        .route("/api/dishes", get(dishes::list))
        .route("/api/dishes/best-sellers", get(dishes::best_sellers))
        .route("/api/dishes/{id}", get(dishes::get))
        .route("/api/cart", get(cart::list).post(cart::create))
        .route("/api/cart/summary", get(cart::summary))
        .route("/api/cart/total", get(cart::total))
        .route("/api/cart/clear", delete(cart::clear))
        .route(
            "/api/cart/{id}",
            get(cart::get).put(cart::update).delete(cart::remove),
        )
        .route("/api/receipts", get(receipts::list))
        .route("/api/receipts/stats", get(receipts::stats))
        .route("/api/receipts/{id}", get(receipts::get));

    // Layers run bottom-up: require_user must wrap require_staff
    let staff = Router::new()
        .route("/api/clients", get(clients::list).post(clients::create))
        .route("/api/clients/active", get(clients::active))
        .route(
            "/api/clients/{id}",
            get(clients::get).put(clients::update).delete(clients::remove),
        )
        .route("/api/dashboard/stats", get(dashboard::stats))
        .route("/api/dashboard/monthly-sales", get(dashboard::monthly_sales))
        .merge(admin::router())
        .layer(middleware::from_fn(require_staff));

    let authenticated = user
        .merge(staff)
        .layer(middleware::from_fn_with_state(state, require_user));

    public.merge(authenticated)
}
