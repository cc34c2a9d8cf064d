//! Server-rendered pages
//!
//! Handlers build a `tera::Context`, render a template from `templates/` and
//! report outcomes of form posts through flash cookies.

pub mod auth;
pub mod flash;
pub mod order;
pub mod payment;
pub mod profile;

use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Router, middleware};
use shared::error::{AppError, ErrorCode};
use tower_cookies::Cookies;

use crate::auth::rate_limit::{login_rate_limit, signup_rate_limit};
use crate::auth::session::{CurrentUser, require_login_page, session_user};
use crate::state::AppState;
use flash::take_flash;

pub type PageResult = Result<Response, AppError>;

/// Render `template` into an HTML response
pub fn render(state: &AppState, template: &str, ctx: &tera::Context) -> PageResult {
    let body = state.templates.render(template, ctx).map_err(|e| {
        tracing::error!(template, error = ?e, "Template rendering failed");
        AppError::new(ErrorCode::TemplateError)
    })?;
    Ok(Html(body).into_response())
}

/// Context every page starts from: the logged-in user and a pending flash message
pub fn base_context(cookies: &Cookies, user: Option<&CurrentUser>) -> tera::Context {
    let mut ctx = tera::Context::new();
    if let Some(user) = user {
        ctx.insert("user", user);
    }
    if let Some(flash) = take_flash(cookies) {
        ctx.insert("flash", &flash);
    }
    ctx
}

async fn home(State(state): State<AppState>, cookies: Cookies) -> PageResult {
    let user = session_user(&cookies, state.jwt_secret());
    let ctx = base_context(&cookies, user.as_ref());
    render(&state, "index.html.tera", &ctx)
}

pub fn router(state: AppState) -> Router<AppState> {
    let login_limit = middleware::from_fn_with_state(state.clone(), login_rate_limit);
    let signup_limit = middleware::from_fn_with_state(state.clone(), signup_rate_limit);

    let public = Router::new()
        .route("/", get(home))
        .route(
            "/signup",
            get(auth::signup_page).merge(post(auth::signup).layer(signup_limit)),
        )
        .route(
            "/signin",
            get(auth::signin_page).merge(post(auth::signin).layer(login_limit)),
        )
        .route("/logout", get(auth::logout));

    let private = Router::new()
        .route("/info", get(profile::info_page).post(profile::save_info))
        .route("/main", get(order::main_page).post(order::add_to_cart))
        .route("/remove-item/{id}", post(order::remove_item))
        .route("/process-payment", post(order::process_payment))
        .route("/payment", get(payment::payment_page))
        .route("/payment/pay", post(payment::pay))
        .route("/payment/success", get(payment::payment_success))
        .route("/payment/failure", get(payment::payment_failure))
        .layer(middleware::from_fn_with_state(state, require_login_page));

    public.merge(private)
}
