//! Order History Models and exports

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::weekday::Weekday;

/// One ordered dish per cart line at checkout (pedido histórico)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderHistoryEntry {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub dish_id: i64,
    pub dish_name: String,
    pub quantity: i32,
    pub weekday: Weekday,
    pub issued_on: NaiveDate,
}

/// Row of the weekday x dish pivot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotRow {
    pub weekday: Weekday,
    pub day_name: String,
    /// One quantity per entry of [`WeekdayPivot::dishes`]
    pub quantities: Vec<i64>,
}

/// Ordered quantities per weekday (rows) and dish (columns)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdayPivot {
    /// Column headers, sorted by name
    pub dishes: Vec<String>,
    /// Only weekdays that have orders, Monday first
    pub rows: Vec<PivotRow>,
}

impl WeekdayPivot {
    /// Sum quantities per (weekday, dish); missing cells are 0
    pub fn build(entries: &[OrderHistoryEntry]) -> Self {
        let dishes: Vec<String> = entries
            .iter()
            .map(|e| e.dish_name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut cells: BTreeMap<Weekday, Vec<i64>> = BTreeMap::new();
        for entry in entries {
            let Ok(col) = dishes.binary_search(&entry.dish_name) else {
                continue;
            };
            let row = cells
                .entry(entry.weekday)
                .or_insert_with(|| vec![0; dishes.len()]);
            row[col] += i64::from(entry.quantity);
        }

        let rows = cells
            .into_iter()
            .map(|(weekday, quantities)| PivotRow {
                weekday,
                day_name: weekday.display_name().to_string(),
                quantities,
            })
            .collect();

        Self { dishes, rows }
    }
}

/// Delivery row joined with the ordering client and company
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ShippingSource {
    pub username: String,
    pub client_name: Option<String>,
    pub phone: Option<String>,
    pub is_private: Option<bool>,
    pub private_address: Option<String>,
    pub company_name: Option<String>,
    pub company_address: Option<String>,
    pub dish_name: String,
    pub quantity: i32,
    pub weekday: Weekday,
}

/// Shipping export row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingRow {
    pub name: String,
    pub phone: String,
    pub company: String,
    pub address: String,
    pub dish: String,
    pub quantity: i32,
    pub day: String,
}

impl From<ShippingSource> for ShippingRow {
    fn from(src: ShippingSource) -> Self {
        let has_client = src.client_name.is_some();
        let is_private = src.is_private.unwrap_or(false);

        let company = match (&src.company_name, has_client && is_private) {
            (Some(name), _) => name.clone(),
            (None, true) => "Particular".to_string(),
            (None, false) => String::new(),
        };
        let address = if has_client && is_private {
            src.private_address.unwrap_or_default()
        } else {
            src.company_address.unwrap_or_default()
        };

        Self {
            name: src.client_name.unwrap_or(src.username),
            phone: src.phone.unwrap_or_default(),
            company,
            address,
            dish: src.dish_name,
            quantity: src.quantity,
            day: src.weekday.display_name().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(dish: &str, quantity: i32, weekday: Weekday) -> OrderHistoryEntry {
        OrderHistoryEntry {
            id: 0,
            user_id: 1,
            username: "ana".to_string(),
            dish_id: 0,
            dish_name: dish.to_string(),
            quantity,
            weekday,
            issued_on: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
        }
    }

    #[test]
    fn test_pivot_orders_days_and_fills_zeros() {
        let entries = vec![
            entry("Paella", 2, Weekday::Vie),
            entry("Lentejas", 1, Weekday::Lun),
            entry("Paella", 3, Weekday::Vie),
            entry("Albóndigas", 4, Weekday::Lun),
        ];
        let pivot = WeekdayPivot::build(&entries);

        assert_eq!(pivot.dishes, vec!["Albóndigas", "Lentejas", "Paella"]);
        assert_eq!(pivot.rows.len(), 2);
        assert_eq!(pivot.rows[0].day_name, "Lunes");
        assert_eq!(pivot.rows[0].quantities, vec![4, 1, 0]);
        assert_eq!(pivot.rows[1].day_name, "Viernes");
        assert_eq!(pivot.rows[1].quantities, vec![0, 0, 5]);
    }

    #[test]
    fn test_pivot_empty() {
        let pivot = WeekdayPivot::build(&[]);
        assert!(pivot.dishes.is_empty());
        assert!(pivot.rows.is_empty());
    }

    fn source() -> ShippingSource {
        ShippingSource {
            username: "ana".to_string(),
            client_name: Some("Ana Pérez".to_string()),
            phone: Some("600111222".to_string()),
            is_private: Some(false),
            private_address: Some("Calle Mayor 1".to_string()),
            company_name: Some("Acme".to_string()),
            company_address: Some("Polígono 7".to_string()),
            dish_name: "Paella".to_string(),
            quantity: 2,
            weekday: Weekday::Mar,
        }
    }

    #[test]
    fn test_shipping_company_client() {
        let row = ShippingRow::from(source());
        assert_eq!(row.name, "Ana Pérez");
        assert_eq!(row.company, "Acme");
        assert_eq!(row.address, "Polígono 7");
        assert_eq!(row.day, "Martes");
    }

    #[test]
    fn test_shipping_private_client() {
        let row = ShippingRow::from(ShippingSource {
            is_private: Some(true),
            company_name: None,
            company_address: None,
            ..source()
        });
        assert_eq!(row.company, "Particular");
        assert_eq!(row.address, "Calle Mayor 1");
    }

    #[test]
    fn test_shipping_without_client_profile() {
        let row = ShippingRow::from(ShippingSource {
            client_name: None,
            phone: None,
            is_private: None,
            private_address: None,
            company_name: None,
            company_address: None,
            ..source()
        });
        assert_eq!(row.name, "ana");
        assert_eq!(row.phone, "");
        assert_eq!(row.company, "");
        assert_eq!(row.address, "");
    }
}
