//! Cart Models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::weekday::Weekday;
use crate::money;

/// Cart line joined with its dish, as shown to the customer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct CartItem {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub dish_id: i64,
    pub dish_name: String,
    /// Current dish price
    pub unit_price: Decimal,
    pub quantity: i32,
    pub weekday: Weekday,
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    pub fn subtotal(&self) -> Decimal {
        money::line_subtotal(self.quantity, self.unit_price)
    }

    /// "<qty> x <dish> - <username> (<day name>)"
    pub fn label(&self) -> String {
        format!(
            "{} x {} - {} ({})",
            self.quantity,
            self.dish_name,
            self.username,
            self.weekday.display_name()
        )
    }
}

/// Add-to-cart payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemCreate {
    pub dish_id: i64,
    pub quantity: Option<i32>,
    pub weekday: Option<Weekday>,
}

/// Update cart line payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartItemUpdate {
    pub quantity: Option<i32>,
    pub weekday: Option<Weekday>,
}

/// Cart line in a summary response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineView {
    pub id: i64,
    pub dish_id: i64,
    pub dish_name: String,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub weekday: Weekday,
    pub weekday_name: String,
    pub subtotal: Decimal,
}

impl From<&CartItem> for CartLineView {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id,
            dish_id: item.dish_id,
            dish_name: item.dish_name.clone(),
            unit_price: item.unit_price,
            quantity: item.quantity,
            weekday: item.weekday,
            weekday_name: item.weekday.display_name().to_string(),
            subtotal: item.subtotal(),
        }
    }
}

/// Cart totals for the current user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartSummary {
    pub item_count: usize,
    pub total_price: Decimal,
    pub items: Vec<CartLineView>,
}

impl CartSummary {
    pub fn from_items(items: &[CartItem]) -> Self {
        let lines: Vec<CartLineView> = items.iter().map(CartLineView::from).collect();
        Self {
            item_count: lines.len(),
            total_price: lines.iter().map(|l| l.subtotal).sum(),
            items: lines,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn item(id: i64, quantity: i32, price: &str, weekday: Weekday) -> CartItem {
        CartItem {
            id,
            user_id: 1,
            username: "ana".to_string(),
            dish_id: id * 10,
            dish_name: format!("Plato {id}"),
            unit_price: Decimal::from_str(price).unwrap(),
            quantity,
            weekday,
            added_at: Utc::now(),
        }
    }

    #[test]
    fn test_subtotal() {
        let line = item(1, 3, "6.50", Weekday::Lun);
        assert_eq!(line.subtotal(), Decimal::from_str("19.50").unwrap());
    }

    #[test]
    fn test_label() {
        let line = item(2, 2, "5.00", Weekday::Mie);
        assert_eq!(line.label(), "2 x Plato 2 - ana (Miércoles)");
    }

    #[test]
    fn test_summary_totals() {
        let items = vec![
            item(1, 2, "7.50", Weekday::Lun),
            item(2, 1, "12.00", Weekday::Mar),
        ];
        let summary = CartSummary::from_items(&items);
        assert_eq!(summary.item_count, 2);
        assert_eq!(summary.total_price, Decimal::from_str("27.00").unwrap());
        assert_eq!(summary.items[1].weekday_name, "Martes");
    }

    #[test]
    fn test_empty_summary() {
        let summary = CartSummary::from_items(&[]);
        assert_eq!(summary.item_count, 0);
        assert_eq!(summary.total_price, Decimal::ZERO);
    }
}
