//! Production batch database operations

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{Production, ProductionCreate, ProductionStatus, ProductionUpdate};
use shared::util::non_blank;
use sqlx::PgPool;

use super::dishes;
use crate::error::ServiceResult;
use crate::util::{MAX_NOTE_LEN, validate_optional_text};

const PRODUCTION_SELECT: &str = r#"
    SELECT p.id, p.dish_id, d.name AS dish_name, d.code AS dish_code,
           p.planned_quantity, p.produced_quantity, p.planned_date,
           p.started_at, p.completed_at, p.status, p.responsible_id,
           u.username AS responsible_username, p.ingredient_cost, p.labour_cost,
           p.other_costs, p.notes, p.created_at, p.updated_at
    FROM productions p
    JOIN dishes d ON d.id = p.dish_id
    LEFT JOIN users u ON u.id = p.responsible_id
"#;

fn validate(
    planned: i32,
    produced: i32,
    costs: [Decimal; 3],
    notes: &Option<String>,
) -> Result<(), AppError> {
    if planned < 0 || produced < 0 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "Quantities must be non-negative",
        ));
    }
    if costs.iter().any(|c| c.is_sign_negative()) {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "Costs must be non-negative",
        ));
    }
    validate_optional_text(notes, "notes", MAX_NOTE_LEN)
}

/// Fill `started_at`/`completed_at` the first time a batch reaches the matching status
fn stamp_transition(
    status: ProductionStatus,
    started_at: &mut Option<DateTime<Utc>>,
    completed_at: &mut Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) {
    match status {
        ProductionStatus::EnProceso => {
            started_at.get_or_insert(now);
        }
        ProductionStatus::Completada => {
            started_at.get_or_insert(now);
            completed_at.get_or_insert(now);
        }
        ProductionStatus::Planificada | ProductionStatus::Cancelada => {}
    }
}

pub async fn list(pool: &PgPool, status: Option<ProductionStatus>) -> ServiceResult<Vec<Production>> {
    let sql = format!(
        "{PRODUCTION_SELECT} WHERE ($1::production_status IS NULL OR p.status = $1) \
         ORDER BY p.planned_date DESC, p.id DESC"
    );
    let rows: Vec<Production> = sqlx::query_as(&sql).bind(status).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn get(pool: &PgPool, id: i64) -> ServiceResult<Production> {
    let sql = format!("{PRODUCTION_SELECT} WHERE p.id = $1");
    let row: Option<Production> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    row.ok_or_else(|| AppError::new(ErrorCode::ProductionNotFound).into())
}

pub async fn create(pool: &PgPool, data: &ProductionCreate) -> ServiceResult<Production> {
    let produced = data.produced_quantity.unwrap_or(0);
    let costs = [
        data.ingredient_cost.unwrap_or_default(),
        data.labour_cost.unwrap_or_default(),
        data.other_costs.unwrap_or_default(),
    ];
    let notes = non_blank(data.notes.clone());
    validate(data.planned_quantity, produced, costs, &notes)?;
    dishes::require(pool, data.dish_id).await?;

    let status = data.status.unwrap_or_default();
    let (mut started_at, mut completed_at) = (None, None);
    stamp_transition(status, &mut started_at, &mut completed_at, Utc::now());

    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO productions (
            dish_id, planned_quantity, produced_quantity, planned_date, started_at,
            completed_at, status, responsible_id, ingredient_cost, labour_cost,
            other_costs, notes
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING id
        "#,
    )
    .bind(data.dish_id)
    .bind(data.planned_quantity)
    .bind(produced)
    .bind(data.planned_date)
    .bind(started_at)
    .bind(completed_at)
    .bind(status)
    .bind(data.responsible_id)
    .bind(costs[0])
    .bind(costs[1])
    .bind(costs[2])
    .bind(notes)
    .fetch_one(pool)
    .await?;

    tracing::info!(production_id = id, dish_id = data.dish_id, status = ?status, "Production batch created");
    get(pool, id).await
}

pub async fn update(pool: &PgPool, id: i64, data: &ProductionUpdate) -> ServiceResult<Production> {
    let mut p = get(pool, id).await?;
    let previous = p.status;

    if let Some(v) = data.planned_quantity {
        p.planned_quantity = v;
    }
    if let Some(v) = data.produced_quantity {
        p.produced_quantity = v;
    }
    if let Some(v) = data.planned_date {
        p.planned_date = v;
    }
    if let Some(v) = data.status {
        p.status = v;
    }
    if data.responsible_id.is_some() {
        p.responsible_id = data.responsible_id;
    }
    if let Some(v) = data.ingredient_cost {
        p.ingredient_cost = v;
    }
    if let Some(v) = data.labour_cost {
        p.labour_cost = v;
    }
    if let Some(v) = data.other_costs {
        p.other_costs = v;
    }
    if data.notes.is_some() {
        p.notes = non_blank(data.notes.clone());
    }
    validate(
        p.planned_quantity,
        p.produced_quantity,
        [p.ingredient_cost, p.labour_cost, p.other_costs],
        &p.notes,
    )?;
    stamp_transition(p.status, &mut p.started_at, &mut p.completed_at, Utc::now());

    sqlx::query(
        r#"
        UPDATE productions SET
            planned_quantity = $1, produced_quantity = $2, planned_date = $3,
            started_at = $4, completed_at = $5, status = $6, responsible_id = $7,
            ingredient_cost = $8, labour_cost = $9, other_costs = $10, notes = $11,
            updated_at = now()
        WHERE id = $12
        "#,
    )
    .bind(p.planned_quantity)
    .bind(p.produced_quantity)
    .bind(p.planned_date)
    .bind(p.started_at)
    .bind(p.completed_at)
    .bind(p.status)
    .bind(p.responsible_id)
    .bind(p.ingredient_cost)
    .bind(p.labour_cost)
    .bind(p.other_costs)
    .bind(&p.notes)
    .bind(id)
    .execute(pool)
    .await?;

    if previous != p.status {
        tracing::info!(production_id = id, from = ?previous, to = ?p.status, "Production status changed");
    }
    get(pool, id).await
}

pub async fn delete(pool: &PgPool, id: i64) -> ServiceResult<()> {
    let result = sqlx::query("DELETE FROM productions WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::new(ErrorCode::ProductionNotFound).into());
    }
    Ok(())
}

/// Batches that are planned or in progress
pub async fn count_active(pool: &PgPool) -> ServiceResult<i64> {
    let n: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM productions WHERE status IN ('PLANIFICADA', 'EN_PROCESO')",
    )
    .fetch_one(pool)
    .await?;
    Ok(n)
}

/// Batches with status COMPLETADA whose completion time is at or after `since`
pub async fn completed_since(pool: &PgPool, since: DateTime<Utc>) -> ServiceResult<Vec<Production>> {
    let sql = format!(
        "{PRODUCTION_SELECT} WHERE p.status = 'COMPLETADA' AND p.completed_at >= $1 \
         ORDER BY p.completed_at DESC"
    );
    let rows: Vec<Production> = sqlx::query_as(&sql).bind(since).fetch_all(pool).await?;
    Ok(rows)
}
