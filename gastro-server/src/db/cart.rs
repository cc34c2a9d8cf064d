//! Cart database operations
//!
//! Prices are never stored on cart lines: every read joins the dish and uses
//! its current price.

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{CartItem, CartItemUpdate, Weekday};
use shared::money;
use sqlx::PgPool;

use super::{availability, dishes};
use crate::error::ServiceResult;

const CART_SELECT: &str = r#"
    SELECT ci.id, ci.user_id, u.username, ci.dish_id, d.name AS dish_name,
           d.price AS unit_price, ci.quantity, ci.weekday, ci.added_at
    FROM cart_items ci
    JOIN users u ON u.id = ci.user_id
    JOIN dishes d ON d.id = ci.dish_id
"#;

fn not_found(item_id: i64) -> AppError {
    AppError::with_message(
        ErrorCode::CartItemNotFound,
        format!("Cart item {item_id} not found"),
    )
}

// ── Read ──

pub async fn list_for_user(pool: &PgPool, user_id: i64) -> ServiceResult<Vec<CartItem>> {
    let sql = format!("{CART_SELECT} WHERE ci.user_id = $1 ORDER BY ci.added_at, ci.id");
    let rows: Vec<CartItem> = sqlx::query_as(&sql).bind(user_id).fetch_all(pool).await?;
    Ok(rows)
}

/// Every user's cart lines (back office)
pub async fn list_all(pool: &PgPool) -> ServiceResult<Vec<CartItem>> {
    let sql = format!("{CART_SELECT} ORDER BY u.username, ci.weekday, d.name");
    let rows: Vec<CartItem> = sqlx::query_as(&sql).fetch_all(pool).await?;
    Ok(rows)
}

/// Cart line by id, restricted to `owner` when given
pub async fn get(pool: &PgPool, item_id: i64, owner: Option<i64>) -> ServiceResult<CartItem> {
    let sql =
        format!("{CART_SELECT} WHERE ci.id = $1 AND ($2::BIGINT IS NULL OR ci.user_id = $2)");
    let row: Option<CartItem> = sqlx::query_as(&sql)
        .bind(item_id)
        .bind(owner)
        .fetch_optional(pool)
        .await?;
    row.ok_or_else(|| not_found(item_id).into())
}

/// Sum of quantity x current dish price, 0 for an empty cart
pub async fn total(pool: &PgPool, user_id: i64) -> ServiceResult<Decimal> {
    let total: Decimal = sqlx::query_scalar(
        r#"
        SELECT COALESCE(SUM(ci.quantity * d.price), 0)
        FROM cart_items ci
        JOIN dishes d ON d.id = ci.dish_id
        WHERE ci.user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(total)
}

// ── Write ──

/// Add a dish for a weekday; an existing line for the same dish and day is
/// incremented in the same statement
pub async fn add(
    pool: &PgPool,
    user_id: i64,
    dish_id: i64,
    quantity: i32,
    weekday: Weekday,
) -> ServiceResult<CartItem> {
    money::validate_quantity(quantity)?;
    dishes::require(pool, dish_id).await?;

    // No row comes back when the merged line would exceed the maximum
    let id: Option<i64> = sqlx::query_scalar(
        r#"
        INSERT INTO cart_items (user_id, dish_id, quantity, weekday)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT ON CONSTRAINT uq_cart_line
        DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
        WHERE cart_items.quantity + EXCLUDED.quantity <= $5
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(dish_id)
    .bind(quantity)
    .bind(weekday)
    .bind(money::MAX_QUANTITY)
    .fetch_optional(pool)
    .await?;
    let id = id.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::InvalidQuantity,
            format!("cart line would exceed the maximum quantity ({})", money::MAX_QUANTITY),
        )
    })?;

    tracing::debug!(user_id, dish_id, quantity, weekday = %weekday, "Added to cart");
    get(pool, id, Some(user_id)).await
}

/// Change quantity and/or weekday. The new weekday must be one the dish is offered on.
pub async fn update(
    pool: &PgPool,
    item_id: i64,
    owner: Option<i64>,
    data: &CartItemUpdate,
) -> ServiceResult<CartItem> {
    let item = get(pool, item_id, owner).await?;
    let quantity = data.quantity.unwrap_or(item.quantity);
    let weekday = data.weekday.unwrap_or(item.weekday);

    money::validate_quantity(quantity)?;
    if weekday != item.weekday {
        availability::ensure_available(pool, item.dish_id, weekday).await?;
    }

    sqlx::query("UPDATE cart_items SET quantity = $1, weekday = $2 WHERE id = $3")
        .bind(quantity)
        .bind(weekday)
        .bind(item_id)
        .execute(pool)
        .await?;

    get(pool, item_id, owner).await
}

/// Remove a line; with `owner` set, other users' lines are reported as missing
pub async fn remove(pool: &PgPool, item_id: i64, owner: Option<i64>) -> ServiceResult<()> {
    let result =
        sqlx::query("DELETE FROM cart_items WHERE id = $1 AND ($2::BIGINT IS NULL OR user_id = $2)")
            .bind(item_id)
            .bind(owner)
            .execute(pool)
            .await?;
    if result.rows_affected() == 0 {
        return Err(not_found(item_id).into());
    }
    Ok(())
}

/// Empty the cart, returning the number of removed lines
pub async fn clear(pool: &PgPool, user_id: i64) -> ServiceResult<u64> {
    let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
