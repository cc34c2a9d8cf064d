//! gastro-server: ordering site, REST API and back office for Familia Gastro
//!
//! - Server-rendered ordering pages (tera) with cookie sessions
//! - JSON API for dishes, cart, receipts and the staff back office
//! - Checkout into receipts and hosted card payment through Paycomet
//! - Production batches, inventory lots and stock movements

pub mod api;
pub mod auth;
pub mod cache;
pub mod checkout;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod paycomet;
pub mod setup;
pub mod state;
pub mod util;
pub mod web;

use axum::Router;
use tower_cookies::CookieManagerLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Full application router: pages, JSON API and static assets
pub fn build_router(state: AppState) -> Router {
    let static_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

    Router::new()
        .merge(web::router(state.clone()))
        .merge(api::router(state.clone()))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
