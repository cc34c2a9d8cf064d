//! Inventory movements
//!
//! Recording a movement locks the lot row, applies the signed quantity and
//! inserts the movement in one transaction.

use shared::error::{AppError, ErrorCode};
use shared::models::{InventoryMovement, MovementCreate, apply_movement};
use sqlx::PgPool;

use crate::error::ServiceResult;
use crate::util::{MAX_NOTE_LEN, validate_optional_text};

const MOVEMENT_SELECT: &str = r#"
    SELECT m.id, m.lot_id, d.name AS dish_name, m.movement_type, m.quantity, m.reason,
           m.responsible_id, u.username AS responsible_username, m.moved_at
    FROM inventory_movements m
    JOIN inventory_lots l ON l.id = m.lot_id
    JOIN dishes d ON d.id = l.dish_id
    LEFT JOIN users u ON u.id = m.responsible_id
"#;

/// Newest first, optionally for one lot
pub async fn list(pool: &PgPool, lot_id: Option<i64>) -> ServiceResult<Vec<InventoryMovement>> {
    let sql = format!(
        "{MOVEMENT_SELECT} WHERE ($1::BIGINT IS NULL OR m.lot_id = $1) ORDER BY m.moved_at DESC, m.id DESC"
    );
    let rows: Vec<InventoryMovement> = sqlx::query_as(&sql).bind(lot_id).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn get(pool: &PgPool, id: i64) -> ServiceResult<InventoryMovement> {
    let sql = format!("{MOVEMENT_SELECT} WHERE m.id = $1");
    let row: Option<InventoryMovement> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    row.ok_or_else(|| AppError::new(ErrorCode::MovementNotFound).into())
}

/// Apply a movement to its lot; a result below zero fails with `InsufficientStock`
pub async fn record(
    pool: &PgPool,
    data: &MovementCreate,
    responsible_id: Option<i64>,
) -> ServiceResult<InventoryMovement> {
    if data.quantity == 0 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "Movement quantity must not be zero",
        )
        .into());
    }
    validate_optional_text(&Some(data.reason.clone()), "reason", MAX_NOTE_LEN)?;

    let mut tx = pool.begin().await?;

    let available: Option<i32> = sqlx::query_scalar(
        "SELECT available_quantity FROM inventory_lots WHERE id = $1 FOR UPDATE",
    )
    .bind(data.lot_id)
    .fetch_optional(&mut *tx)
    .await?;
    let available = available.ok_or_else(|| AppError::new(ErrorCode::InventoryNotFound))?;
    let remaining = apply_movement(data.lot_id, available, data.quantity)?;

    sqlx::query(
        "UPDATE inventory_lots SET available_quantity = $1, updated_at = now() WHERE id = $2",
    )
    .bind(remaining)
    .bind(data.lot_id)
    .execute(&mut *tx)
    .await?;

    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO inventory_movements (lot_id, movement_type, quantity, reason, responsible_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(data.lot_id)
    .bind(data.movement_type)
    .bind(data.quantity)
    .bind(data.reason.trim())
    .bind(responsible_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        movement_id = id,
        lot_id = data.lot_id,
        movement_type = data.movement_type.display_name(),
        quantity = data.quantity,
        remaining,
        "Inventory movement recorded"
    );
    get(pool, id).await
}
