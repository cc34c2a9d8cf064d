//! Receipt endpoints. Customers see their own receipts, staff see all.

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use shared::models::{Receipt, ReceiptDetail, ReceiptFilter, ReceiptStats};

use super::ApiResult;
use crate::auth::CurrentUser;
use crate::db::receipts;
use crate::state::AppState;

/// Owner restriction for non-staff callers
fn scope(user: &CurrentUser) -> Option<i64> {
    (!user.is_staff).then_some(user.user_id)
}

/// GET /api/receipts?paid=&status=&search=
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(filter): Query<ReceiptFilter>,
) -> ApiResult<Vec<Receipt>> {
    Ok(Json(receipts::list(&state.pool, scope(&user), &filter).await?))
}

/// GET /api/receipts/{id} with its lines
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<ReceiptDetail> {
    Ok(Json(receipts::detail(&state.pool, id, scope(&user)).await?))
}

/// GET /api/receipts/stats
pub async fn stats(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<ReceiptStats> {
    Ok(Json(receipts::stats(&state.pool, scope(&user)).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_sees_everything() {
        let mut user = CurrentUser {
            user_id: 7,
            username: "ana".into(),
            is_staff: false,
        };
        assert_eq!(scope(&user), Some(7));
        user.is_staff = true;
        assert_eq!(scope(&user), None);
    }
}
