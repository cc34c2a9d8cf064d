//! Checkout: turn a user's cart into a receipt
//!
//! [`plan_checkout`] is pure and decides totals and lines; [`checkout`] runs
//! it against locked cart rows and persists the result in one transaction.
//! Any error before commit rolls everything back.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::error::AppError;
use shared::models::{Receipt, Weekday};
use shared::money;
use sqlx::PgPool;

use crate::db::receipts;
use crate::error::ServiceResult;

/// One cart row with the dish price current at checkout
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct CheckoutLine {
    pub cart_item_id: i64,
    pub dish_id: i64,
    pub quantity: i32,
    pub weekday: Weekday,
    pub unit_price: Decimal,
}

impl CheckoutLine {
    pub fn subtotal(&self) -> Decimal {
        money::line_subtotal(self.quantity, self.unit_price)
    }
}

/// What a checkout will write
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutPlan {
    pub total: Decimal,
    pub lines: Vec<CheckoutLine>,
}

impl CheckoutPlan {
    pub fn cart_item_ids(&self) -> Vec<i64> {
        self.lines.iter().map(|l| l.cart_item_id).collect()
    }
}

/// Fails with `CartEmpty` when there is nothing to buy
pub fn plan_checkout(lines: Vec<CheckoutLine>) -> Result<CheckoutPlan, AppError> {
    if lines.is_empty() {
        return Err(AppError::cart_empty());
    }
    let total = money::sum_lines(lines.iter().map(|l| (l.quantity, l.unit_price)));
    Ok(CheckoutPlan { total, lines })
}

/// Create the receipt, its lines and the order history for `user_id`, then
/// empty the cart. `today` becomes the issue date of the history rows.
pub async fn checkout(pool: &PgPool, user_id: i64, today: NaiveDate) -> ServiceResult<Receipt> {
    let mut tx = pool.begin().await?;

    let lines: Vec<CheckoutLine> = sqlx::query_as(
        r#"
        SELECT ci.id AS cart_item_id, ci.dish_id, ci.quantity, ci.weekday, d.price AS unit_price
        FROM cart_items ci
        JOIN dishes d ON d.id = ci.dish_id
        WHERE ci.user_id = $1
        ORDER BY ci.added_at, ci.id
        FOR UPDATE OF ci
        "#,
    )
    .bind(user_id)
    .fetch_all(&mut *tx)
    .await?;

    let plan = plan_checkout(lines)?;

    // Users without a profile buy without a company
    let company_id: Option<i64> =
        sqlx::query_scalar("SELECT company_id FROM clients WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
            .flatten();

    let (receipt_id,): (i64,) = sqlx::query_as(
        "INSERT INTO receipts (user_id, company_id, total) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(user_id)
    .bind(company_id)
    .bind(plan.total)
    .fetch_one(&mut *tx)
    .await?;

    for line in &plan.lines {
        sqlx::query(
            r#"
            INSERT INTO receipt_items (receipt_id, dish_id, quantity, unit_price)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(receipt_id)
        .bind(line.dish_id)
        .bind(line.quantity)
        .bind(line.unit_price)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO order_history (user_id, dish_id, quantity, weekday, issued_on)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user_id)
        .bind(line.dish_id)
        .bind(line.quantity)
        .bind(line.weekday)
        .bind(today)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query("DELETE FROM cart_items WHERE user_id = $1 AND id = ANY($2)")
        .bind(user_id)
        .bind(plan.cart_item_ids())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(
        receipt_id,
        user_id,
        lines = plan.lines.len(),
        total = %plan.total,
        "Checkout completed"
    );
    receipts::get(pool, receipt_id, Some(user_id)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;
    use std::str::FromStr;

    fn line(id: i64, quantity: i32, price: &str, weekday: Weekday) -> CheckoutLine {
        CheckoutLine {
            cart_item_id: id,
            dish_id: id * 10,
            quantity,
            weekday,
            unit_price: Decimal::from_str(price).unwrap(),
        }
    }

    #[test]
    fn test_empty_cart_rejected() {
        let err = plan_checkout(vec![]).unwrap_err();
        assert_eq!(err.code, ErrorCode::CartEmpty);
        assert_eq!(err.message, "Tu carrito está vacío.");
    }

    #[test]
    fn test_total_is_sum_of_subtotals() {
        let plan = plan_checkout(vec![
            line(1, 2, "7.50", Weekday::Lun),
            line(2, 3, "4.25", Weekday::Mar),
            line(3, 1, "12.00", Weekday::Lun),
        ])
        .unwrap();

        let expected: Decimal = plan.lines.iter().map(CheckoutLine::subtotal).sum();
        assert_eq!(plan.total, expected);
        assert_eq!(plan.total, Decimal::from_str("39.75").unwrap());
    }

    #[test]
    fn test_one_line_per_cart_entry() {
        // Same dish on two weekdays stays two lines
        let mut second = line(2, 1, "9.90", Weekday::Vie);
        second.dish_id = 10;
        let plan = plan_checkout(vec![line(1, 4, "9.90", Weekday::Lun), second]).unwrap();

        assert_eq!(plan.lines.len(), 2);
        assert_eq!(plan.cart_item_ids(), vec![1, 2]);
        assert_eq!(plan.total, Decimal::from_str("49.50").unwrap());
    }
}
