//! Weekday availability of dishes
//!
//! A dish can be offered at most once per weekday. Every write checks for a
//! duplicate first and reports `AvailabilityExists`; concurrent writes hit the
//! `uq_dish_availability` constraint, which maps to the same code.

use std::collections::HashMap;

use shared::error::{AppError, ErrorCode};
use shared::models::{AvailabilityInput, DishAvailability, Weekday};
use sqlx::PgPool;

use super::dishes;
use crate::error::ServiceResult;

const AVAILABILITY_SELECT: &str = r#"
    SELECT a.id, a.dish_id, d.name AS dish_name, a.weekday
    FROM dish_availability a
    JOIN dishes d ON d.id = a.dish_id
"#;

pub async fn list(pool: &PgPool, dish_id: Option<i64>) -> ServiceResult<Vec<DishAvailability>> {
    let sql = format!(
        "{AVAILABILITY_SELECT} WHERE ($1::BIGINT IS NULL OR a.dish_id = $1) ORDER BY a.weekday, d.name"
    );
    let rows: Vec<DishAvailability> = sqlx::query_as(&sql).bind(dish_id).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn get(pool: &PgPool, id: i64) -> ServiceResult<DishAvailability> {
    let sql = format!("{AVAILABILITY_SELECT} WHERE a.id = $1");
    let row: Option<DishAvailability> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    row.ok_or_else(|| AppError::new(ErrorCode::AvailabilityNotFound).into())
}

/// Whether `dish_id` is offered on `weekday`
pub async fn is_available(pool: &PgPool, dish_id: i64, weekday: Weekday) -> ServiceResult<bool> {
    let found: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM dish_availability WHERE dish_id = $1 AND weekday = $2)",
    )
    .bind(dish_id)
    .bind(weekday)
    .fetch_one(pool)
    .await?;
    Ok(found)
}

/// Fail with `DishUnavailableOnDay` unless the dish is offered on that day
pub async fn ensure_available(pool: &PgPool, dish_id: i64, weekday: Weekday) -> ServiceResult<()> {
    if !is_available(pool, dish_id, weekday).await? {
        return Err(AppError::with_message(
            ErrorCode::DishUnavailableOnDay,
            format!("Dish {dish_id} is not available on {}", weekday.display_name()),
        )
        .into());
    }
    Ok(())
}

/// Reject a (dish, weekday) pair already used by a row other than `exclude_id`
async fn ensure_unique(
    pool: &PgPool,
    input: &AvailabilityInput,
    exclude_id: Option<i64>,
) -> ServiceResult<()> {
    let duplicate: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM dish_availability
            WHERE dish_id = $1 AND weekday = $2
              AND ($3::BIGINT IS NULL OR id <> $3)
        )
        "#,
    )
    .bind(input.dish_id)
    .bind(input.weekday)
    .bind(exclude_id)
    .fetch_one(pool)
    .await?;

    if duplicate {
        return Err(AppError::new(ErrorCode::AvailabilityExists)
            .with_detail("dish_id", input.dish_id)
            .with_detail("weekday", input.weekday.code())
            .into());
    }
    Ok(())
}

pub async fn create(pool: &PgPool, input: &AvailabilityInput) -> ServiceResult<DishAvailability> {
    dishes::require(pool, input.dish_id).await?;
    ensure_unique(pool, input, None).await?;

    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO dish_availability (dish_id, weekday) VALUES ($1, $2) RETURNING id",
    )
    .bind(input.dish_id)
    .bind(input.weekday)
    .fetch_one(pool)
    .await?;

    get(pool, id).await
}

/// Replace dish and weekday; keeping the row's own values is allowed
pub async fn update(
    pool: &PgPool,
    id: i64,
    input: &AvailabilityInput,
) -> ServiceResult<DishAvailability> {
    get(pool, id).await?;
    dishes::require(pool, input.dish_id).await?;
    ensure_unique(pool, input, Some(id)).await?;

    sqlx::query("UPDATE dish_availability SET dish_id = $1, weekday = $2 WHERE id = $3")
        .bind(input.dish_id)
        .bind(input.weekday)
        .bind(id)
        .execute(pool)
        .await?;

    get(pool, id).await
}

pub async fn delete(pool: &PgPool, id: i64) -> ServiceResult<()> {
    let result = sqlx::query("DELETE FROM dish_availability WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::new(ErrorCode::AvailabilityNotFound).into());
    }
    Ok(())
}

pub async fn count(pool: &PgPool) -> ServiceResult<i64> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dish_availability")
        .fetch_one(pool)
        .await?;
    Ok(n)
}

pub async fn count_per_weekday(pool: &PgPool) -> ServiceResult<HashMap<Weekday, i64>> {
    let rows: Vec<(Weekday, i64)> =
        sqlx::query_as("SELECT weekday, COUNT(*) FROM dish_availability GROUP BY weekday")
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().collect())
}
