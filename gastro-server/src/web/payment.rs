//! Payment pages
//!
//! The receipt created by checkout is remembered in a cookie until the
//! gateway reports success. Every lookup is restricted to the session user.

use axum::extract::{Extension, State};
use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};
use shared::models::Receipt;
use tower_cookies::{Cookie, Cookies};

use super::flash::{FlashData, redirect_with};
use super::{PageResult, base_context, render};
use crate::auth::CurrentUser;
use crate::db::receipts;
use crate::error::ServiceError;
use crate::paycomet;
use crate::state::AppState;

const RECEIPT_COOKIE: &str = "gastro_receipt";

pub fn remember_receipt(cookies: &Cookies, receipt_id: i64) {
    let mut cookie = Cookie::new(RECEIPT_COOKIE, receipt_id.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookies.add(cookie);
}

fn pending_receipt_id(cookies: &Cookies) -> Option<i64> {
    cookies.get(RECEIPT_COOKIE)?.value().parse().ok()
}

fn forget_receipt(cookies: &Cookies) {
    let mut cookie = Cookie::from(RECEIPT_COOKIE);
    cookie.set_path("/");
    cookies.remove(cookie);
}

fn no_receipt(cookies: &Cookies) -> PageResult {
    let message = AppError::new(ErrorCode::NoPendingReceipt).message;
    Ok(redirect_with(cookies, "/main", FlashData::error(message)).into_response())
}

async fn pending_receipt(
    state: &AppState,
    cookies: &Cookies,
    user: &CurrentUser,
) -> Result<Option<Receipt>, AppError> {
    let Some(id) = pending_receipt_id(cookies) else {
        return Ok(None);
    };
    match receipts::get(&state.pool, id, Some(user.user_id)).await {
        Ok(receipt) => Ok(Some(receipt)),
        Err(ServiceError::App(e)) if e.code == ErrorCode::ReceiptNotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// GET /payment
pub async fn payment_page(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    cookies: Cookies,
) -> PageResult {
    let Some(receipt) = pending_receipt(&state, &cookies, &user).await? else {
        return no_receipt(&cookies);
    };
    let items = receipts::items(&state.pool, receipt.id).await?;
    let subtotals: Vec<_> = items.iter().map(|i| i.subtotal()).collect();

    let mut ctx = base_context(&cookies, Some(&user));
    ctx.insert("receipt", &receipt);
    ctx.insert("items", &items);
    ctx.insert("subtotals", &subtotals);
    render(&state, "payment.html.tera", &ctx)
}

/// POST /payment/pay
pub async fn pay(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    cookies: Cookies,
) -> PageResult {
    let Some(receipt) = pending_receipt(&state, &cookies, &user).await? else {
        return no_receipt(&cookies);
    };
    let form = paycomet::payment_form(&state.pool, &state.config, &receipt).await?;

    let mut ctx = base_context(&cookies, Some(&user));
    ctx.insert("form", &form);
    render(&state, "payment_form.html.tera", &ctx)
}

async fn payment_result(
    state: &AppState,
    cookies: &Cookies,
    user: &CurrentUser,
    succeeded: bool,
) -> PageResult {
    if let Some(id) = pending_receipt_id(cookies) {
        if succeeded {
            paycomet::payment_succeeded(&state.pool, id, user.user_id).await?;
            forget_receipt(cookies);
        } else {
            paycomet::payment_failed(&state.pool, id, user.user_id).await?;
        }
    }

    let flash = if succeeded {
        FlashData::success("Pago realizado con éxito.")
    } else {
        FlashData::error(AppError::new(ErrorCode::PaymentFailed).message)
    };
    let mut ctx = base_context(cookies, Some(user));
    ctx.insert("succeeded", &succeeded);
    ctx.insert("flash", &flash);
    render(state, "payment_result.html.tera", &ctx)
}

/// GET /payment/success
pub async fn payment_success(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    cookies: Cookies,
) -> PageResult {
    payment_result(&state, &cookies, &user, true).await
}

/// GET /payment/failure
pub async fn payment_failure(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    cookies: Cookies,
) -> PageResult {
    payment_result(&state, &cookies, &user, false).await
}
