//! Inventory Models
//!
//! Freshness, days until expiry and the critical-stock flag depend on the
//! current date, so callers pass `today` explicitly.

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorCode};

/// Lots at or below this available quantity count as critical
pub const CRITICAL_STOCK_THRESHOLD: i32 = 10;

/// Lots expiring within this many days count as critical
pub const CRITICAL_EXPIRY_DAYS: u64 = 2;

/// Freshness bucket of an inventory lot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Freshness {
    Fresco,
    Advertencia,
    Critico,
    Vencido,
}

impl Freshness {
    /// `VENCIDO` on or before today, `CRITICO` within a day,
    /// `ADVERTENCIA` within two days, otherwise `FRESCO`
    pub fn classify(expires_on: NaiveDate, today: NaiveDate) -> Self {
        if expires_on <= today {
            Freshness::Vencido
        } else if expires_on <= plus_days(today, 1) {
            Freshness::Critico
        } else if expires_on <= plus_days(today, 2) {
            Freshness::Advertencia
        } else {
            Freshness::Fresco
        }
    }

    /// Lower-case filter value (`?freshness=critico`)
    pub fn parse_filter(value: &str) -> Result<Self, AppError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fresco" => Ok(Freshness::Fresco),
            "advertencia" => Ok(Freshness::Advertencia),
            "critico" => Ok(Freshness::Critico),
            "vencido" => Ok(Freshness::Vencido),
            other => Err(AppError::with_message(
                ErrorCode::InvalidRequest,
                format!("Unknown freshness filter: {other}"),
            )),
        }
    }

    pub const fn colour(&self) -> &'static str {
        match self {
            Freshness::Fresco => "green",
            Freshness::Advertencia => "orange",
            Freshness::Critico => "red",
            Freshness::Vencido => "darkred",
        }
    }

    /// Inclusive `expires_on` bounds matching this bucket, as SQL filter input
    pub fn expiry_bounds(&self, today: NaiveDate) -> (Option<NaiveDate>, Option<NaiveDate>) {
        let day_after = |n| Some(plus_days(today, n));
        match self {
            Freshness::Vencido => (None, Some(today)),
            Freshness::Critico => (day_after(1), day_after(1)),
            Freshness::Advertencia => (day_after(2), day_after(2)),
            Freshness::Fresco => (day_after(3), None),
        }
    }
}

fn plus_days(date: NaiveDate, n: u64) -> NaiveDate {
    date.checked_add_days(Days::new(n)).unwrap_or(NaiveDate::MAX)
}

/// Inventory lot (inventario) row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct InventoryLot {
    pub id: i64,
    pub dish_id: i64,
    pub dish_name: String,
    pub production_id: Option<i64>,
    pub location: String,
    pub available_quantity: i32,
    pub reserved_quantity: i32,
    pub produced_on: NaiveDate,
    pub expires_on: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryLot {
    pub fn total_quantity(&self) -> i32 {
        self.available_quantity + self.reserved_quantity
    }

    /// Negative once expired
    pub fn days_until_expiry(&self, today: NaiveDate) -> i64 {
        (self.expires_on - today).num_days()
    }

    pub fn freshness(&self, today: NaiveDate) -> Freshness {
        Freshness::classify(self.expires_on, today)
    }

    /// Low stock or expiring within two days
    pub fn is_critical(&self, today: NaiveDate) -> bool {
        self.available_quantity <= CRITICAL_STOCK_THRESHOLD
            || self.expires_on <= plus_days(today, CRITICAL_EXPIRY_DAYS)
    }

    /// Human label for the expiry column, e.g. "Vencido (3 días)"
    pub fn expiry_label(&self, today: NaiveDate) -> String {
        let days = self.days_until_expiry(today);
        if days < 0 {
            format!("Vencido ({} días)", days.abs())
        } else {
            format!("{days} días")
        }
    }
}

/// Inventory lot with derived fields for one reference date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryView {
    #[serde(flatten)]
    pub lot: InventoryLot,
    pub total_quantity: i32,
    pub days_until_expiry: i64,
    pub expiry_label: String,
    pub freshness: Freshness,
    pub freshness_colour: String,
    pub critical: bool,
}

impl InventoryView {
    pub fn new(lot: InventoryLot, today: NaiveDate) -> Self {
        let freshness = lot.freshness(today);
        Self {
            total_quantity: lot.total_quantity(),
            days_until_expiry: lot.days_until_expiry(today),
            expiry_label: lot.expiry_label(today),
            freshness,
            freshness_colour: freshness.colour().to_string(),
            critical: lot.is_critical(today),
            lot,
        }
    }
}

/// Create inventory lot payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryCreate {
    pub dish_id: i64,
    pub production_id: Option<i64>,
    pub location: Option<String>,
    pub available_quantity: i32,
    pub reserved_quantity: Option<i32>,
    pub produced_on: NaiveDate,
    pub expires_on: NaiveDate,
}

/// Update inventory lot payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InventoryUpdate {
    pub production_id: Option<i64>,
    pub location: Option<String>,
    pub available_quantity: Option<i32>,
    pub reserved_quantity: Option<i32>,
    pub produced_on: Option<NaiveDate>,
    pub expires_on: Option<NaiveDate>,
}

/// Check quantities and date ordering of a lot
pub fn validate_lot(
    available: i32,
    reserved: i32,
    produced_on: NaiveDate,
    expires_on: NaiveDate,
) -> Result<(), AppError> {
    if available < 0 || reserved < 0 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "Quantities must be non-negative",
        ));
    }
    if expires_on < produced_on {
        return Err(AppError::new(ErrorCode::InvalidExpiryDate)
            .with_detail("produced_on", produced_on.to_string())
            .with_detail("expires_on", expires_on.to_string()));
    }
    Ok(())
}

// ── Movements ───────────────────────────────────────────────────────

/// Kind of inventory movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db",
    sqlx(type_name = "movement_type", rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum MovementType {
    Entrada,
    Salida,
    Ajuste,
    Merma,
}

impl MovementType {
    pub const fn display_name(&self) -> &'static str {
        match self {
            MovementType::Entrada => "Entrada",
            MovementType::Salida => "Salida",
            MovementType::Ajuste => "Ajuste",
            MovementType::Merma => "Merma",
        }
    }
}

/// Inventory movement (movimiento de inventario) row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct InventoryMovement {
    pub id: i64,
    pub lot_id: i64,
    pub dish_name: String,
    pub movement_type: MovementType,
    /// Signed: positive adds stock, negative removes it
    pub quantity: i32,
    pub reason: String,
    pub responsible_id: Option<i64>,
    pub responsible_username: Option<String>,
    pub moved_at: DateTime<Utc>,
}

/// Record movement payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementCreate {
    pub lot_id: i64,
    pub movement_type: MovementType,
    pub quantity: i32,
    pub reason: String,
}

/// Available quantity after applying a signed movement
pub fn apply_movement(lot_id: i64, available: i32, quantity: i32) -> Result<i32, AppError> {
    match available.checked_add(quantity) {
        Some(result) if result >= 0 => Ok(result),
        _ => Err(AppError::insufficient_stock(lot_id, available, quantity)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn lot(available: i32, expires_on: NaiveDate) -> InventoryLot {
        InventoryLot {
            id: 1,
            dish_id: 1,
            dish_name: "Paella".to_string(),
            production_id: None,
            location: "Cámara 1".to_string(),
            available_quantity: available,
            reserved_quantity: 5,
            produced_on: date(2025, 3, 1),
            expires_on,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_freshness_thresholds() {
        let today = date(2025, 3, 10);
        assert_eq!(Freshness::classify(date(2025, 3, 9), today), Freshness::Vencido);
        assert_eq!(Freshness::classify(today, today), Freshness::Vencido);
        assert_eq!(Freshness::classify(date(2025, 3, 11), today), Freshness::Critico);
        assert_eq!(
            Freshness::classify(date(2025, 3, 12), today),
            Freshness::Advertencia
        );
        assert_eq!(Freshness::classify(date(2025, 3, 13), today), Freshness::Fresco);
    }

    #[test]
    fn test_expiry_bounds_match_classify() {
        let today = date(2025, 3, 10);
        for offset in -3i64..6 {
            let expires = today + chrono::Duration::days(offset);
            let bucket = Freshness::classify(expires, today);
            let (from, to) = bucket.expiry_bounds(today);
            assert!(from.is_none_or(|f| expires >= f), "{expires} below {bucket:?}");
            assert!(to.is_none_or(|t| expires <= t), "{expires} above {bucket:?}");
        }
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(Freshness::parse_filter("critico").unwrap(), Freshness::Critico);
        assert_eq!(Freshness::parse_filter("VENCIDO").unwrap(), Freshness::Vencido);
        assert!(Freshness::parse_filter("caducado").is_err());
    }

    #[test]
    fn test_days_until_expiry_and_label() {
        let today = date(2025, 3, 10);
        let expired = lot(20, date(2025, 3, 7));
        assert_eq!(expired.days_until_expiry(today), -3);
        assert_eq!(expired.expiry_label(today), "Vencido (3 días)");

        let fresh = lot(20, date(2025, 3, 15));
        assert_eq!(fresh.days_until_expiry(today), 5);
        assert_eq!(fresh.expiry_label(today), "5 días");
    }

    #[test]
    fn test_critical_stock() {
        let today = date(2025, 3, 10);
        assert!(lot(10, date(2025, 3, 20)).is_critical(today));
        assert!(lot(50, date(2025, 3, 12)).is_critical(today));
        assert!(!lot(11, date(2025, 3, 13)).is_critical(today));
    }

    #[test]
    fn test_view() {
        let today = date(2025, 3, 10);
        let view = InventoryView::new(lot(7, date(2025, 3, 11)), today);
        assert_eq!(view.total_quantity, 12);
        assert_eq!(view.freshness, Freshness::Critico);
        assert_eq!(view.freshness_colour, "red");
        assert!(view.critical);
    }

    #[test]
    fn test_validate_lot() {
        assert!(validate_lot(5, 0, date(2025, 3, 1), date(2025, 3, 6)).is_ok());
        let err = validate_lot(5, 0, date(2025, 3, 6), date(2025, 3, 1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidExpiryDate);
        assert!(validate_lot(-1, 0, date(2025, 3, 1), date(2025, 3, 6)).is_err());
    }

    #[test]
    fn test_apply_movement() {
        assert_eq!(apply_movement(1, 10, 5).unwrap(), 15);
        assert_eq!(apply_movement(1, 10, -10).unwrap(), 0);

        let err = apply_movement(1, 10, -11).unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
    }
}
