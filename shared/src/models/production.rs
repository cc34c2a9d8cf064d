//! Production Models
//!
//! Derived metrics (completion, total cost, efficiency) are computed at read
//! time from stored quantities and costs; nothing derived is persisted.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money;

/// Lifecycle of a production batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db",
    sqlx(type_name = "production_status", rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum ProductionStatus {
    #[default]
    Planificada,
    EnProceso,
    Completada,
    Cancelada,
}

impl ProductionStatus {
    pub const fn display_name(&self) -> &'static str {
        match self {
            ProductionStatus::Planificada => "Planificada",
            ProductionStatus::EnProceso => "En proceso",
            ProductionStatus::Completada => "Completada",
            ProductionStatus::Cancelada => "Cancelada",
        }
    }

    /// Planned or in progress
    pub const fn is_active(&self) -> bool {
        matches!(self, ProductionStatus::Planificada | ProductionStatus::EnProceso)
    }
}

/// Traffic-light band for progress indicators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Green,
    Orange,
    Red,
}

impl Band {
    fn from_thresholds(value: Decimal, green: Decimal, orange: Decimal) -> Self {
        if value >= green {
            Band::Green
        } else if value >= orange {
            Band::Orange
        } else {
            Band::Red
        }
    }
}

/// Production batch (producción) row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Production {
    pub id: i64,
    pub dish_id: i64,
    pub dish_name: String,
    pub dish_code: String,
    pub planned_quantity: i32,
    pub produced_quantity: i32,
    pub planned_date: NaiveDate,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub status: ProductionStatus,
    pub responsible_id: Option<i64>,
    pub responsible_username: Option<String>,
    pub ingredient_cost: Decimal,
    pub labour_cost: Decimal,
    pub other_costs: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Production {
    /// `produced / planned * 100`, 0 when nothing was planned
    pub fn completion_percent(&self) -> Decimal {
        money::percent(
            Decimal::from(self.produced_quantity),
            Decimal::from(self.planned_quantity),
        )
    }

    pub fn total_cost(&self) -> Decimal {
        self.ingredient_cost + self.labour_cost + self.other_costs
    }

    /// Completion capped at 100, only for completed batches
    pub fn efficiency(&self) -> Decimal {
        if self.status != ProductionStatus::Completada {
            return Decimal::ZERO;
        }
        self.completion_percent().min(Decimal::ONE_HUNDRED)
    }

    /// Cost per produced unit, `None` until something was produced
    pub fn unit_cost(&self) -> Option<Decimal> {
        (self.produced_quantity > 0)
            .then(|| money::round_money(self.total_cost() / Decimal::from(self.produced_quantity)))
    }

    /// >= 100 green, >= 50 orange, else red
    pub fn completion_band(&self) -> Band {
        Band::from_thresholds(
            self.completion_percent(),
            Decimal::ONE_HUNDRED,
            Decimal::from(50),
        )
    }

    /// >= 80 green, >= 60 orange, else red
    pub fn efficiency_band(&self) -> Band {
        Band::from_thresholds(self.efficiency(), Decimal::from(80), Decimal::from(60))
    }
}

/// Production row with derived metrics, as returned by the back office
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionView {
    #[serde(flatten)]
    pub production: Production,
    pub completion_percent: Decimal,
    pub completion_band: Band,
    pub total_cost: Decimal,
    pub efficiency: Decimal,
    pub efficiency_band: Band,
    pub unit_cost: Option<Decimal>,
}

impl From<Production> for ProductionView {
    fn from(production: Production) -> Self {
        Self {
            completion_percent: money::round_money(production.completion_percent()),
            completion_band: production.completion_band(),
            total_cost: production.total_cost(),
            efficiency: money::round_money(production.efficiency()),
            efficiency_band: production.efficiency_band(),
            unit_cost: production.unit_cost(),
            production,
        }
    }
}

/// Create production payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionCreate {
    pub dish_id: i64,
    pub planned_quantity: i32,
    pub produced_quantity: Option<i32>,
    pub planned_date: NaiveDate,
    pub status: Option<ProductionStatus>,
    pub responsible_id: Option<i64>,
    pub ingredient_cost: Option<Decimal>,
    pub labour_cost: Option<Decimal>,
    pub other_costs: Option<Decimal>,
    pub notes: Option<String>,
}

/// Update production payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductionUpdate {
    pub planned_quantity: Option<i32>,
    pub produced_quantity: Option<i32>,
    pub planned_date: Option<NaiveDate>,
    pub status: Option<ProductionStatus>,
    pub responsible_id: Option<i64>,
    pub ingredient_cost: Option<Decimal>,
    pub labour_cost: Option<Decimal>,
    pub other_costs: Option<Decimal>,
    pub notes: Option<String>,
}

/// Export row for production spreadsheets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionExportRow {
    pub dish: String,
    pub dish_code: String,
    pub planned_quantity: i32,
    pub produced_quantity: i32,
    pub planned_date: NaiveDate,
    pub status: String,
    pub responsible: String,
    pub ingredient_cost: Decimal,
    pub labour_cost: Decimal,
    pub other_costs: Decimal,
    pub total_cost: Decimal,
    pub completion_percent: Decimal,
    pub efficiency: Decimal,
}

impl From<&Production> for ProductionExportRow {
    fn from(p: &Production) -> Self {
        Self {
            dish: p.dish_name.clone(),
            dish_code: p.dish_code.clone(),
            planned_quantity: p.planned_quantity,
            produced_quantity: p.produced_quantity,
            planned_date: p.planned_date,
            status: p.status.display_name().to_string(),
            responsible: p.responsible_username.clone().unwrap_or_default(),
            ingredient_cost: p.ingredient_cost,
            labour_cost: p.labour_cost,
            other_costs: p.other_costs,
            total_cost: p.total_cost(),
            completion_percent: money::round_money(p.completion_percent()),
            efficiency: money::round_money(p.efficiency()),
        }
    }
}

/// Production dashboard counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionDashboard {
    pub active_batches: i64,
    pub completed_today: i64,
    pub critical_inventory: i64,
    pub average_efficiency: Decimal,
}

/// Average efficiency over completed batches, 0 when there are none
pub fn average_efficiency(batches: &[Production]) -> Decimal {
    let completed: Vec<Decimal> = batches
        .iter()
        .filter(|p| p.status == ProductionStatus::Completada)
        .map(Production::efficiency)
        .collect();
    if completed.is_empty() {
        return Decimal::ZERO;
    }
    let sum: Decimal = completed.iter().copied().sum();
    money::round_money(sum / Decimal::from(completed.len()))
}
