//! Order history (one row per checked-out cart line)

use chrono::NaiveDate;
use serde::Deserialize;
use shared::models::{OrderHistoryEntry, ShippingSource, Weekday};
use sqlx::PgPool;

use crate::error::ServiceResult;

/// Back-office filters, all optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryFilter {
    pub weekday: Option<Weekday>,
    pub dish_id: Option<i64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

pub async fn list(pool: &PgPool, filter: &HistoryFilter) -> ServiceResult<Vec<OrderHistoryEntry>> {
    let rows: Vec<OrderHistoryEntry> = sqlx::query_as(
        r#"
        SELECT h.id, h.user_id, u.username, h.dish_id, d.name AS dish_name,
               h.quantity, h.weekday, h.issued_on
        FROM order_history h
        JOIN users u ON u.id = h.user_id
        JOIN dishes d ON d.id = h.dish_id
        WHERE ($1::weekday IS NULL OR h.weekday = $1)
          AND ($2::BIGINT IS NULL OR h.dish_id = $2)
          AND ($3::DATE IS NULL OR h.issued_on >= $3)
          AND ($4::DATE IS NULL OR h.issued_on <= $4)
        ORDER BY h.issued_on DESC, h.id DESC
        "#,
    )
    .bind(filter.weekday)
    .bind(filter.dish_id)
    .bind(filter.from)
    .bind(filter.to)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// History rows joined with the ordering client and company for delivery sheets
pub async fn shipping_sources(
    pool: &PgPool,
    filter: &HistoryFilter,
) -> ServiceResult<Vec<ShippingSource>> {
    let rows: Vec<ShippingSource> = sqlx::query_as(
        r#"
        SELECT u.username, c.full_name AS client_name, c.phone, c.is_private,
               c.private_address, co.name AS company_name, co.address AS company_address,
               d.name AS dish_name, h.quantity, h.weekday
        FROM order_history h
        JOIN users u ON u.id = h.user_id
        JOIN dishes d ON d.id = h.dish_id
        LEFT JOIN clients c ON c.user_id = h.user_id
        LEFT JOIN companies co ON co.id = c.company_id
        WHERE ($1::weekday IS NULL OR h.weekday = $1)
          AND ($2::BIGINT IS NULL OR h.dish_id = $2)
          AND ($3::DATE IS NULL OR h.issued_on >= $3)
          AND ($4::DATE IS NULL OR h.issued_on <= $4)
        ORDER BY h.weekday, COALESCE(c.full_name, u.username), d.name
        "#,
    )
    .bind(filter.weekday)
    .bind(filter.dish_id)
    .bind(filter.from)
    .bind(filter.to)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn count(pool: &PgPool) -> ServiceResult<i64> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_history")
        .fetch_one(pool)
        .await?;
    Ok(n)
}
