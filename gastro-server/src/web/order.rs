//! Ordering page (`/main`), cart removal and checkout

use axum::extract::{Extension, Form, Path, Query, State};
use axum::response::{IntoResponse, Redirect};
use serde::{Deserialize, Serialize};
use shared::error::ErrorCode;
use shared::models::{CartSummary, DishGroup, Weekday, WeekdayOption};
use tower_cookies::Cookies;

use super::flash::{FlashData, redirect_with};
use super::payment::remember_receipt;
use super::{PageResult, base_context, render};
use crate::auth::CurrentUser;
use crate::checkout;
use crate::db::{cart, dishes};
use crate::error::ServiceError;
use crate::state::AppState;
use crate::util::today;

/// `?dia=LUN&grupo=CARNE`; unknown values fall back to Monday and all groups
#[derive(Debug, Default, Deserialize)]
pub struct MainQuery {
    pub dia: Option<String>,
    pub grupo: Option<String>,
}

impl MainQuery {
    fn weekday(&self) -> Weekday {
        self.dia
            .as_deref()
            .and_then(|d| d.parse().ok())
            .unwrap_or_default()
    }

    fn group(&self) -> Option<DishGroup> {
        self.grupo.as_deref().and_then(DishGroup::from_code)
    }
}

#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub dish_id: i64,
    pub quantity: Option<i32>,
    /// Defaults to the day being browsed
    pub weekday: Option<Weekday>,
}

#[derive(Serialize)]
struct GroupOption {
    code: &'static str,
    name: &'static str,
}

/// URL back to the page for `weekday` and `group`
fn main_url(weekday: Weekday, group: Option<DishGroup>) -> String {
    // Group codes only contain letters and spaces
    let grupo = group.map(|g| g.code().replace(' ', "+")).unwrap_or_default();
    format!("/main?dia={}&grupo={grupo}", weekday.code())
}

/// GET /main
pub async fn main_page(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    cookies: Cookies,
    Query(query): Query<MainQuery>,
) -> PageResult {
    let weekday = query.weekday();
    let group = query.group();

    let available = dishes::available_on(&state.pool, weekday, group).await?;
    let items = cart::list_for_user(&state.pool, user.user_id).await?;
    let summary = CartSummary::from_items(&items);
    let groups: Vec<GroupOption> = state
        .group_cache
        .get_or_load(&state.pool)
        .await?
        .into_iter()
        .map(|g| GroupOption {
            code: g.code(),
            name: g.display_name(),
        })
        .collect();
    let weekdays: Vec<WeekdayOption> = Weekday::ALL.into_iter().map(WeekdayOption::from).collect();

    let mut ctx = base_context(&cookies, Some(&user));
    ctx.insert("weekdays", &weekdays);
    ctx.insert("current_day", weekday.code());
    ctx.insert("current_day_name", weekday.display_name());
    ctx.insert("current_group", group.map(|g| g.code()).unwrap_or_default());
    ctx.insert("groups", &groups);
    ctx.insert("available", &available);
    ctx.insert("cart", &summary);
    render(&state, "main.html.tera", &ctx)
}

/// POST /main
pub async fn add_to_cart(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    cookies: Cookies,
    Query(query): Query<MainQuery>,
    Form(form): Form<AddToCartForm>,
) -> PageResult {
    let weekday = query.weekday();
    let back = main_url(weekday, query.group());
    let quantity = form.quantity.unwrap_or(1);
    let day = form.weekday.unwrap_or(weekday);

    match cart::add(&state.pool, user.user_id, form.dish_id, quantity, day).await {
        Ok(item) => {
            let flash = FlashData::success(format!("{} añadido al carrito.", item.dish_name));
            Ok(redirect_with(&cookies, &back, flash).into_response())
        }
        Err(ServiceError::App(err)) if err.is_user_facing() => {
            Ok(redirect_with(&cookies, &back, FlashData::error(err.message)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /remove-item/{id}
pub async fn remove_item(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    cookies: Cookies,
    Path(item_id): Path<i64>,
) -> PageResult {
    match cart::remove(&state.pool, item_id, Some(user.user_id)).await {
        Ok(()) => Ok(Redirect::to("/main").into_response()),
        Err(ServiceError::App(err)) if err.code == ErrorCode::CartItemNotFound => {
            Ok(redirect_with(&cookies, "/main", FlashData::error(err.message)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// POST /process-payment
pub async fn process_payment(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    cookies: Cookies,
) -> PageResult {
    match checkout::checkout(&state.pool, user.user_id, today()).await {
        Ok(receipt) => {
            remember_receipt(&cookies, receipt.id);
            Ok(Redirect::to("/payment").into_response())
        }
        Err(ServiceError::App(err)) if err.code == ErrorCode::CartEmpty => {
            Ok(redirect_with(&cookies, "/main", FlashData::warning(err.message)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults() {
        let query = MainQuery::default();
        assert_eq!(query.weekday(), Weekday::Lun);
        assert_eq!(query.group(), None);

        let query = MainQuery {
            dia: Some("dom".into()),
            grupo: Some("".into()),
        };
        assert_eq!(query.weekday(), Weekday::Lun);
        assert_eq!(query.group(), None);
    }

    #[test]
    fn test_query_parses_day_and_group() {
        let query = MainQuery {
            dia: Some("vie".into()),
            grupo: Some("PLATO DE CUCHARA".into()),
        };
        assert_eq!(query.weekday(), Weekday::Vie);
        assert_eq!(query.group(), Some(DishGroup::PlatoDeCuchara));
    }

    #[test]
    fn test_main_url_keeps_filters() {
        assert_eq!(main_url(Weekday::Mar, None), "/main?dia=MAR&grupo=");
        assert_eq!(
            main_url(Weekday::Jue, Some(DishGroup::ArrocesYPastas)),
            "/main?dia=JUE&grupo=ARROCES+Y+PASTAS"
        );
    }
}
