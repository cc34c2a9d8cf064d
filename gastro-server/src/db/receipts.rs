//! Receipt queries and payment state changes
//!
//! Payment transitions only apply to unpaid receipts of the given user, so a
//! replayed gateway redirect never flips a completed payment back.

use chrono::{DateTime, Utc};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    PAYMENT_METHOD_TERMINAL, PaymentStatus, Receipt, ReceiptDetail, ReceiptFilter, ReceiptItem,
    ReceiptStats,
};
use shared::util::non_blank;
use sqlx::PgPool;

use crate::error::ServiceResult;

const RECEIPT_SELECT: &str = r#"
    SELECT r.id, r.user_id, u.username, r.company_id, co.name AS company_name,
           r.total, r.purchased_at, r.paid, r.paid_at, r.payment_reference,
           r.payment_method, r.payment_status, r.iframe_url
    FROM receipts r
    JOIN users u ON u.id = r.user_id
    LEFT JOIN companies co ON co.id = r.company_id
"#;

/// Receipts newest first. `owner` restricts to one user; the filter narrows
/// by paid flag, status and a case-insensitive search over username,
/// company name and payment reference.
pub async fn list(
    pool: &PgPool,
    owner: Option<i64>,
    filter: &ReceiptFilter,
) -> ServiceResult<Vec<Receipt>> {
    let search = non_blank(filter.search.clone()).map(|s| format!("%{s}%"));
    let sql = format!(
        r#"{RECEIPT_SELECT}
        WHERE ($1::BIGINT IS NULL OR r.user_id = $1)
          AND ($2::BOOLEAN IS NULL OR r.paid = $2)
          AND ($3::payment_status IS NULL OR r.payment_status = $3)
          AND ($4::TEXT IS NULL
               OR u.username ILIKE $4
               OR co.name ILIKE $4
               OR r.payment_reference ILIKE $4)
        ORDER BY r.purchased_at DESC, r.id DESC"#
    );
    let rows: Vec<Receipt> = sqlx::query_as(&sql)
        .bind(owner)
        .bind(filter.paid)
        .bind(filter.status)
        .bind(search)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Receipt by id; with `owner` set, other users' receipts are reported as missing
pub async fn get(pool: &PgPool, id: i64, owner: Option<i64>) -> ServiceResult<Receipt> {
    let sql = format!("{RECEIPT_SELECT} WHERE r.id = $1 AND ($2::BIGINT IS NULL OR r.user_id = $2)");
    let row: Option<Receipt> = sqlx::query_as(&sql)
        .bind(id)
        .bind(owner)
        .fetch_optional(pool)
        .await?;
    row.ok_or_else(|| {
        AppError::with_message(ErrorCode::ReceiptNotFound, format!("Receipt {id} not found"))
            .into()
    })
}

pub async fn items(pool: &PgPool, receipt_id: i64) -> ServiceResult<Vec<ReceiptItem>> {
    let rows: Vec<ReceiptItem> = sqlx::query_as(
        r#"
        SELECT ri.id, ri.receipt_id, ri.dish_id, d.name AS dish_name, ri.quantity, ri.unit_price
        FROM receipt_items ri
        JOIN dishes d ON d.id = ri.dish_id
        WHERE ri.receipt_id = $1
        ORDER BY ri.id
        "#,
    )
    .bind(receipt_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn detail(pool: &PgPool, id: i64, owner: Option<i64>) -> ServiceResult<ReceiptDetail> {
    let receipt = get(pool, id, owner).await?;
    let items = items(pool, receipt.id).await?;
    Ok(ReceiptDetail { receipt, items })
}

/// Counters over the visible receipts (one user or everyone)
pub async fn stats(pool: &PgPool, owner: Option<i64>) -> ServiceResult<ReceiptStats> {
    let stats: ReceiptStats = sqlx::query_as(
        r#"
        SELECT COUNT(*) AS total_receipts,
               COALESCE(SUM(total), 0) AS total_sales,
               COUNT(*) FILTER (WHERE paid) AS paid_receipts,
               COUNT(*) FILTER (WHERE NOT paid) AS pending_receipts
        FROM receipts
        WHERE ($1::BIGINT IS NULL OR user_id = $1)
        "#,
    )
    .bind(owner)
    .fetch_one(pool)
    .await?;
    Ok(stats)
}

/// Receipts created at or after `since`
pub async fn count_since(pool: &PgPool, since: DateTime<Utc>) -> ServiceResult<i64> {
    let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM receipts WHERE purchased_at >= $1")
        .bind(since)
        .fetch_one(pool)
        .await?;
    Ok(n)
}

// ── Payment ──

/// Record the gateway order string before the hosted page is shown
pub async fn set_payment_reference(
    pool: &PgPool,
    id: i64,
    user_id: i64,
    reference: &str,
    iframe_url: &str,
) -> ServiceResult<()> {
    sqlx::query(
        r#"
        UPDATE receipts SET payment_reference = $1, iframe_url = $2
        WHERE id = $3 AND user_id = $4 AND NOT paid
        "#,
    )
    .bind(reference)
    .bind(iframe_url)
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Returns whether the receipt changed (false if already paid or not owned)
pub async fn mark_paid(pool: &PgPool, id: i64, user_id: i64) -> ServiceResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE receipts
        SET paid = TRUE, paid_at = now(), payment_status = $1, payment_method = $2
        WHERE id = $3 AND user_id = $4 AND NOT paid
        "#,
    )
    .bind(PaymentStatus::Completado)
    .bind(PAYMENT_METHOD_TERMINAL)
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    let changed = result.rows_affected() > 0;
    if changed {
        tracing::info!(receipt_id = id, user_id, "Receipt paid");
    }
    Ok(changed)
}

pub async fn mark_failed(pool: &PgPool, id: i64, user_id: i64) -> ServiceResult<bool> {
    let result = sqlx::query(
        "UPDATE receipts SET payment_status = $1 WHERE id = $2 AND user_id = $3 AND NOT paid",
    )
    .bind(PaymentStatus::Fallido)
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    let changed = result.rows_affected() > 0;
    if changed {
        tracing::warn!(receipt_id = id, user_id, "Receipt payment failed");
    }
    Ok(changed)
}
