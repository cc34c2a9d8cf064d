//! Sales and back-office statistics
//!
//! Dates are UTC calendar days; series gaps are filled by the shared helpers.

use std::collections::HashMap;

use chrono::{DateTime, Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use shared::models::{
    AdminCounters, DashboardStats, MonthlySales, ProductionDashboard, average_efficiency,
    daily_series, month_start, monthly_series, weekday_counts,
};
use sqlx::PgPool;

use super::{availability, clients, dishes, inventory, order_history, production, receipts};
use crate::error::ServiceResult;

pub const TOP_DISHES: i64 = 5;
pub const DAILY_SALES_DAYS: u64 = 7;
pub const ACTIVE_CLIENT_DAYS: u64 = 30;
pub const MONTHLY_SALES_MONTHS: u32 = 12;
pub const EFFICIENCY_WINDOW_DAYS: u64 = 30;

/// `days` calendar days before `today`
pub fn days_before(today: NaiveDate, days: u64) -> NaiveDate {
    today.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

pub async fn stats(pool: &PgPool, today: NaiveDate) -> ServiceResult<DashboardStats> {
    let total_orders = order_history::count(pool).await?;

    let (total_sales, pending_receipts, completed_receipts): (Decimal, i64, i64) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(total) FILTER (WHERE paid), 0),
               COUNT(*) FILTER (WHERE NOT paid),
               COUNT(*) FILTER (WHERE paid)
        FROM receipts
        "#,
    )
    .fetch_one(pool)
    .await?;

    let first_day = days_before(today, DAILY_SALES_DAYS - 1);
    let daily: Vec<(NaiveDate, Decimal)> = sqlx::query_as(
        r#"
        SELECT (purchased_at AT TIME ZONE 'UTC')::DATE AS day, SUM(total)
        FROM receipts
        WHERE paid AND purchased_at >= $1
        GROUP BY day
        "#,
    )
    .bind(start_of_day(first_day))
    .fetch_all(pool)
    .await?;
    let daily: HashMap<NaiveDate, Decimal> = daily.into_iter().collect();

    let active_clients: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(DISTINCT c.id)
        FROM clients c
        JOIN order_history oh ON oh.user_id = c.user_id
        WHERE oh.issued_on >= $1
        "#,
    )
    .bind(days_before(today, ACTIVE_CLIENT_DAYS))
    .fetch_one(pool)
    .await?;

    Ok(DashboardStats {
        total_orders,
        total_sales,
        pending_receipts,
        completed_receipts,
        top_dishes: dishes::best_sellers(pool, TOP_DISHES).await?,
        daily_sales: daily_series(today, DAILY_SALES_DAYS, &daily),
        active_clients,
    })
}

/// Paid sales per month for the last twelve months, oldest first
pub async fn monthly_sales(pool: &PgPool, today: NaiveDate) -> ServiceResult<Vec<MonthlySales>> {
    let first = month_start(today, MONTHLY_SALES_MONTHS - 1);
    let rows: Vec<(i32, i32, Decimal)> = sqlx::query_as(
        r#"
        SELECT EXTRACT(YEAR FROM purchased_at AT TIME ZONE 'UTC')::INT AS year,
               EXTRACT(MONTH FROM purchased_at AT TIME ZONE 'UTC')::INT AS month,
               SUM(total)
        FROM receipts
        WHERE paid AND purchased_at >= $1
        GROUP BY year, month
        "#,
    )
    .bind(start_of_day(first))
    .fetch_all(pool)
    .await?;

    let totals: HashMap<(i32, u32), Decimal> = rows
        .into_iter()
        .filter_map(|(y, m, total)| u32::try_from(m).ok().map(|m| ((y, m), total)))
        .collect();
    Ok(monthly_series(today, MONTHLY_SALES_MONTHS, &totals))
}

pub async fn production_overview(pool: &PgPool, today: NaiveDate) -> ServiceResult<ProductionDashboard> {
    let active_batches = production::count_active(pool).await?;

    let completed_today: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM productions
        WHERE status = 'COMPLETADA' AND (completed_at AT TIME ZONE 'UTC')::DATE = $1
        "#,
    )
    .bind(today)
    .fetch_one(pool)
    .await?;

    let recent = production::completed_since(
        pool,
        start_of_day(days_before(today, EFFICIENCY_WINDOW_DAYS)),
    )
    .await?;

    Ok(ProductionDashboard {
        active_batches,
        completed_today,
        critical_inventory: inventory::count_critical(pool, today).await?,
        average_efficiency: average_efficiency(&recent),
    })
}

pub async fn admin_counters(pool: &PgPool, today: NaiveDate) -> ServiceResult<AdminCounters> {
    let per_weekday = availability::count_per_weekday(pool).await?;
    Ok(AdminCounters {
        dish_count: dishes::count(pool).await?,
        availability_count: availability::count(pool).await?,
        client_count: clients::count(pool).await?,
        receipts_today: receipts::count_since(pool, start_of_day(today)).await?,
        availability_per_weekday: weekday_counts(&per_weekday),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_before() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        assert_eq!(days_before(today, 6), NaiveDate::from_ymd_opt(2025, 2, 24).unwrap());
        assert_eq!(days_before(NaiveDate::MIN, 1), NaiveDate::MIN);
    }

    #[test]
    fn test_start_of_day() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        assert_eq!(start_of_day(date).to_rfc3339(), "2025-03-02T00:00:00+00:00");
    }
}
