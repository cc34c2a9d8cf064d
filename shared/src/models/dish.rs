//! Dish Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::weekday::Weekday;

/// Menu group a dish belongs to
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "dish_group"))]
pub enum DishGroup {
    #[serde(rename = "CARNE")]
    #[cfg_attr(feature = "db", sqlx(rename = "CARNE"))]
    Carne,
    #[serde(rename = "TORTILLAS")]
    #[cfg_attr(feature = "db", sqlx(rename = "TORTILLAS"))]
    Tortillas,
    #[serde(rename = "PLATO DE CUCHARA")]
    #[cfg_attr(feature = "db", sqlx(rename = "PLATO DE CUCHARA"))]
    PlatoDeCuchara,
    #[serde(rename = "ENSALADA Y VERDURA")]
    #[cfg_attr(feature = "db", sqlx(rename = "ENSALADA Y VERDURA"))]
    EnsaladaYVerdura,
    #[serde(rename = "PESCADO")]
    #[cfg_attr(feature = "db", sqlx(rename = "PESCADO"))]
    Pescado,
    #[serde(rename = "ARROCES Y PASTAS")]
    #[cfg_attr(feature = "db", sqlx(rename = "ARROCES Y PASTAS"))]
    ArrocesYPastas,
    #[default]
    #[serde(rename = "OTROS")]
    #[cfg_attr(feature = "db", sqlx(rename = "OTROS"))]
    Otros,
}

impl DishGroup {
    pub const ALL: [DishGroup; 7] = [
        DishGroup::Carne,
        DishGroup::Tortillas,
        DishGroup::PlatoDeCuchara,
        DishGroup::EnsaladaYVerdura,
        DishGroup::Pescado,
        DishGroup::ArrocesYPastas,
        DishGroup::Otros,
    ];

    /// Stored code, also used in `?grupo=` query strings
    pub const fn code(&self) -> &'static str {
        match self {
            DishGroup::Carne => "CARNE",
            DishGroup::Tortillas => "TORTILLAS",
            DishGroup::PlatoDeCuchara => "PLATO DE CUCHARA",
            DishGroup::EnsaladaYVerdura => "ENSALADA Y VERDURA",
            DishGroup::Pescado => "PESCADO",
            DishGroup::ArrocesYPastas => "ARROCES Y PASTAS",
            DishGroup::Otros => "OTROS",
        }
    }

    pub const fn display_name(&self) -> &'static str {
        match self {
            DishGroup::Carne => "Carnes",
            DishGroup::Tortillas => "Tortillas",
            DishGroup::PlatoDeCuchara => "Platos de cucharas",
            DishGroup::EnsaladaYVerdura => "Ensalada y Verduras",
            DishGroup::Pescado => "Pescados",
            DishGroup::ArrocesYPastas => "Arroces y pastas",
            DishGroup::Otros => "Otros",
        }
    }

    /// Parse a stored code; empty input means "all groups"
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        DishGroup::ALL.into_iter().find(|g| g.code() == code)
    }
}

/// Promotional status shown on the dish card
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "dish_status"))]
pub enum DishStatus {
    #[default]
    #[serde(rename = "NUEVO")]
    #[cfg_attr(feature = "db", sqlx(rename = "NUEVO"))]
    Nuevo,
    #[serde(rename = "PLATO DE LA SEMANA")]
    #[cfg_attr(feature = "db", sqlx(rename = "PLATO DE LA SEMANA"))]
    PlatoDeLaSemana,
    #[serde(rename = "DESCUENTO")]
    #[cfg_attr(feature = "db", sqlx(rename = "DESCUENTO"))]
    Descuento,
    #[serde(rename = "COMUN")]
    #[cfg_attr(feature = "db", sqlx(rename = "COMUN"))]
    Comun,
}

impl DishStatus {
    pub const fn display_name(&self) -> &'static str {
        match self {
            DishStatus::Nuevo => "Nuevo",
            DishStatus::PlatoDeLaSemana => "Plato de la semana",
            DishStatus::Descuento => "Descuento",
            DishStatus::Comun => "Común",
        }
    }
}

/// Dish entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Dish {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    /// Relative path under the media directory
    pub image: Option<String>,
    pub weight_kg: Decimal,
    #[serde(rename = "group")]
    pub dish_group: DishGroup,
    pub ingredients: String,
    pub allergens: String,
    pub shelf_life: String,
    /// Always `price / 1.10`, recomputed on every save
    pub price_without_vat: Decimal,
    pub calories: Option<i32>,
    pub proteins: Option<Decimal>,
    pub fat: Option<Decimal>,
    pub carbohydrates: Option<Decimal>,
    pub sodium: Option<Decimal>,
    pub status: DishStatus,
    pub created_at: DateTime<Utc>,
}

/// Default shelf life label for new dishes
pub const DEFAULT_SHELF_LIFE: &str = "5 días";

/// Create dish payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DishCreate {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image: Option<String>,
    pub weight_kg: Option<Decimal>,
    pub group: Option<DishGroup>,
    pub ingredients: Option<String>,
    pub allergens: Option<String>,
    pub shelf_life: Option<String>,
    pub calories: Option<i32>,
    pub proteins: Option<Decimal>,
    pub fat: Option<Decimal>,
    pub carbohydrates: Option<Decimal>,
    pub sodium: Option<Decimal>,
    pub status: Option<DishStatus>,
}

/// Update dish payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DishUpdate {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub image: Option<String>,
    pub weight_kg: Option<Decimal>,
    pub group: Option<DishGroup>,
    pub ingredients: Option<String>,
    pub allergens: Option<String>,
    pub shelf_life: Option<String>,
    pub calories: Option<i32>,
    pub proteins: Option<Decimal>,
    pub fat: Option<Decimal>,
    pub carbohydrates: Option<Decimal>,
    pub sodium: Option<Decimal>,
    pub status: Option<DishStatus>,
}

/// Dish ranked by ordered quantity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct BestSeller {
    pub dish_id: i64,
    pub name: String,
    pub total_quantity: i64,
}

// ── Availability ────────────────────────────────────────────────────

/// Dish offered on a weekday, unique per (dish, weekday)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DishAvailability {
    pub id: i64,
    pub dish_id: i64,
    pub dish_name: String,
    pub weekday: Weekday,
}

impl DishAvailability {
    /// "<dish> disponible el <day name>"
    pub fn label(&self) -> String {
        format!("{} disponible el {}", self.dish_name, self.weekday.display_name())
    }
}

/// Create or replace availability payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityInput {
    pub dish_id: i64,
    pub weekday: Weekday,
}

/// Dish card on the ordering page for one weekday
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AvailableDish {
    pub availability_id: i64,
    pub weekday: Weekday,
    #[cfg_attr(feature = "db", sqlx(flatten))]
    #[serde(flatten)]
    pub dish: Dish,
}
