//! Inventory lot database operations
//!
//! Freshness filters are translated into `expires_on` bounds so the database
//! does the filtering; derived fields are added by [`InventoryView`].
//!
//! [`InventoryView`]: shared::models::InventoryView

use chrono::{Days, NaiveDate};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    CRITICAL_EXPIRY_DAYS, CRITICAL_STOCK_THRESHOLD, Freshness, InventoryCreate, InventoryLot,
    InventoryUpdate, validate_lot,
};
use shared::util::non_blank;
use sqlx::PgPool;

use super::dishes;
use crate::error::ServiceResult;
use crate::util::{MAX_SHORT_TEXT_LEN, validate_optional_text};

pub const DEFAULT_LOCATION: &str = "Almacén principal";

const LOT_SELECT: &str = r#"
    SELECT l.id, l.dish_id, d.name AS dish_name, l.production_id, l.location,
           l.available_quantity, l.reserved_quantity, l.produced_on, l.expires_on,
           l.created_at, l.updated_at
    FROM inventory_lots l
    JOIN dishes d ON d.id = l.dish_id
"#;

/// Lots ordered by expiry, optionally restricted to one freshness bucket
pub async fn list(
    pool: &PgPool,
    freshness: Option<Freshness>,
    today: NaiveDate,
) -> ServiceResult<Vec<InventoryLot>> {
    let (from, to) = freshness.map_or((None, None), |f| f.expiry_bounds(today));
    let sql = format!(
        "{LOT_SELECT} WHERE ($1::DATE IS NULL OR l.expires_on >= $1) \
         AND ($2::DATE IS NULL OR l.expires_on <= $2) \
         ORDER BY l.expires_on, d.name"
    );
    let rows: Vec<InventoryLot> = sqlx::query_as(&sql)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn get(pool: &PgPool, id: i64) -> ServiceResult<InventoryLot> {
    let sql = format!("{LOT_SELECT} WHERE l.id = $1");
    let row: Option<InventoryLot> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    row.ok_or_else(|| AppError::new(ErrorCode::InventoryNotFound).into())
}

pub async fn create(pool: &PgPool, data: &InventoryCreate) -> ServiceResult<InventoryLot> {
    let reserved = data.reserved_quantity.unwrap_or(0);
    let location = non_blank(data.location.clone()).unwrap_or_else(|| DEFAULT_LOCATION.to_string());
    validate_lot(data.available_quantity, reserved, data.produced_on, data.expires_on)?;
    validate_optional_text(&Some(location.clone()), "location", MAX_SHORT_TEXT_LEN)?;
    dishes::require(pool, data.dish_id).await?;

    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO inventory_lots (
            dish_id, production_id, location, available_quantity,
            reserved_quantity, produced_on, expires_on
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id
        "#,
    )
    .bind(data.dish_id)
    .bind(data.production_id)
    .bind(&location)
    .bind(data.available_quantity)
    .bind(reserved)
    .bind(data.produced_on)
    .bind(data.expires_on)
    .fetch_one(pool)
    .await?;

    tracing::info!(lot_id = id, dish_id = data.dish_id, location = %location, "Inventory lot created");
    get(pool, id).await
}

pub async fn update(pool: &PgPool, id: i64, data: &InventoryUpdate) -> ServiceResult<InventoryLot> {
    let mut lot = get(pool, id).await?;
    if data.production_id.is_some() {
        lot.production_id = data.production_id;
    }
    if let Some(v) = non_blank(data.location.clone()) {
        lot.location = v;
    }
    if let Some(v) = data.available_quantity {
        lot.available_quantity = v;
    }
    if let Some(v) = data.reserved_quantity {
        lot.reserved_quantity = v;
    }
    if let Some(v) = data.produced_on {
        lot.produced_on = v;
    }
    if let Some(v) = data.expires_on {
        lot.expires_on = v;
    }
    validate_lot(
        lot.available_quantity,
        lot.reserved_quantity,
        lot.produced_on,
        lot.expires_on,
    )?;
    validate_optional_text(&Some(lot.location.clone()), "location", MAX_SHORT_TEXT_LEN)?;

    sqlx::query(
        r#"
        UPDATE inventory_lots SET
            production_id = $1, location = $2, available_quantity = $3,
            reserved_quantity = $4, produced_on = $5, expires_on = $6, updated_at = now()
        WHERE id = $7
        "#,
    )
    .bind(lot.production_id)
    .bind(&lot.location)
    .bind(lot.available_quantity)
    .bind(lot.reserved_quantity)
    .bind(lot.produced_on)
    .bind(lot.expires_on)
    .bind(id)
    .execute(pool)
    .await?;

    get(pool, id).await
}

pub async fn delete(pool: &PgPool, id: i64) -> ServiceResult<()> {
    let result = sqlx::query("DELETE FROM inventory_lots WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::new(ErrorCode::InventoryNotFound).into());
    }
    Ok(())
}

/// Lots with low stock or expiring within the critical window
pub async fn count_critical(pool: &PgPool, today: NaiveDate) -> ServiceResult<i64> {
    let horizon = today
        .checked_add_days(Days::new(CRITICAL_EXPIRY_DAYS))
        .unwrap_or(NaiveDate::MAX);
    let n: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM inventory_lots WHERE available_quantity <= $1 OR expires_on <= $2",
    )
    .bind(CRITICAL_STOCK_THRESHOLD)
    .bind(horizon)
    .fetch_one(pool)
    .await?;
    Ok(n)
}
