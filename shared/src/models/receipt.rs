//! Receipt Models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money;

/// Payment state of a receipt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "payment_status", rename_all = "lowercase"))]
pub enum PaymentStatus {
    #[default]
    Pendiente,
    Completado,
    Fallido,
}

impl PaymentStatus {
    pub const fn display_name(&self) -> &'static str {
        match self {
            PaymentStatus::Pendiente => "Pendiente",
            PaymentStatus::Completado => "Completado",
            PaymentStatus::Fallido => "Fallido",
        }
    }
}

/// Payment method recorded when the hosted payment page reports success
pub const PAYMENT_METHOD_TERMINAL: &str = "Paycomet Terminal";

/// Receipt (recibo) produced by checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Receipt {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub company_id: Option<i64>,
    pub company_name: Option<String>,
    pub total: Decimal,
    pub purchased_at: DateTime<Utc>,
    pub paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub payment_reference: Option<String>,
    pub payment_method: Option<String>,
    pub payment_status: PaymentStatus,
    pub iframe_url: Option<String>,
}

impl Receipt {
    /// "Recibo #<id> - <username>"
    pub fn label(&self) -> String {
        format!("Recibo #{} - {}", self.id, self.username)
    }
}

/// Receipt line with the price copied at checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ReceiptItem {
    pub id: i64,
    pub receipt_id: i64,
    pub dish_id: i64,
    pub dish_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl ReceiptItem {
    pub fn subtotal(&self) -> Decimal {
        money::line_subtotal(self.quantity, self.unit_price)
    }
}

/// Receipt with its lines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptDetail {
    #[serde(flatten)]
    pub receipt: Receipt,
    pub items: Vec<ReceiptItem>,
}

/// Receipt list filters for the back office
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReceiptFilter {
    pub paid: Option<bool>,
    pub status: Option<PaymentStatus>,
    /// Matches username, company name or payment reference
    pub search: Option<String>,
}

/// Aggregate receipt counters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ReceiptStats {
    pub total_receipts: i64,
    pub total_sales: Decimal,
    pub paid_receipts: i64,
    pub pending_receipts: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_payment_status_serde() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Completado).unwrap(),
            "\"completado\""
        );
        let status: PaymentStatus = serde_json::from_str("\"fallido\"").unwrap();
        assert_eq!(status, PaymentStatus::Fallido);
        assert_eq!(PaymentStatus::default(), PaymentStatus::Pendiente);
    }

    #[test]
    fn test_receipt_item_subtotal() {
        let item = ReceiptItem {
            id: 1,
            receipt_id: 1,
            dish_id: 4,
            dish_name: "Paella".to_string(),
            quantity: 4,
            unit_price: Decimal::from_str("8.25").unwrap(),
        };
        assert_eq!(item.subtotal(), Decimal::from_str("33.00").unwrap());
    }
}
