//! Dashboard and statistics models

use chrono::{Datelike, Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::dish::BestSeller;
use super::weekday::Weekday;

/// Paid sales for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySales {
    pub date: NaiveDate,
    pub sales: Decimal,
}

/// Paid sales for one month, `month` formatted as `YYYY-MM`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySales {
    pub month: String,
    pub sales: Decimal,
}

/// General dashboard statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_orders: i64,
    pub total_sales: Decimal,
    pub pending_receipts: i64,
    pub completed_receipts: i64,
    pub top_dishes: Vec<BestSeller>,
    /// Today first
    pub daily_sales: Vec<DailySales>,
    pub active_clients: i64,
}

/// Availability rows per weekday
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdayCount {
    pub weekday: Weekday,
    pub day_name: String,
    pub count: i64,
}

/// Back-office home counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCounters {
    pub dish_count: i64,
    pub availability_count: i64,
    pub client_count: i64,
    pub receipts_today: i64,
    pub availability_per_weekday: Vec<WeekdayCount>,
}

/// Daily series for the `days` days ending today, newest first, missing days as 0
pub fn daily_series(today: NaiveDate, days: u64, totals: &HashMap<NaiveDate, Decimal>) -> Vec<DailySales> {
    (0..days)
        .filter_map(|i| today.checked_sub_days(Days::new(i)))
        .map(|date| DailySales {
            date,
            sales: totals.get(&date).copied().unwrap_or(Decimal::ZERO),
        })
        .collect()
}

/// First day of the month `back` months before the month of `today`
pub fn month_start(today: NaiveDate, back: u32) -> NaiveDate {
    let months = today.year() * 12 + today.month0() as i32 - back as i32;
    let (year, month0) = (months.div_euclid(12), months.rem_euclid(12) as u32);
    NaiveDate::from_ymd_opt(year, month0 + 1, 1).unwrap_or(today)
}

/// Monthly series for the last `months` months including the current one, oldest first
pub fn monthly_series(
    today: NaiveDate,
    months: u32,
    totals: &HashMap<(i32, u32), Decimal>,
) -> Vec<MonthlySales> {
    (0..months)
        .rev()
        .map(|back| {
            let start = month_start(today, back);
            let key = (start.year(), start.month());
            MonthlySales {
                month: format!("{}-{:02}", key.0, key.1),
                sales: totals.get(&key).copied().unwrap_or(Decimal::ZERO),
            }
        })
        .collect()
}

/// One entry per weekday, Monday first, missing days as 0
pub fn weekday_counts(counts: &HashMap<Weekday, i64>) -> Vec<WeekdayCount> {
    Weekday::ALL
        .into_iter()
        .map(|weekday| WeekdayCount {
            weekday,
            day_name: weekday.display_name().to_string(),
            count: counts.get(&weekday).copied().unwrap_or(0),
        })
        .collect()
}
