//! Company Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Company (empresa) that receives deliveries for its employees
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Company {
    pub id: i64,
    pub code: String,
    pub name: String,
    /// Delivery address
    pub address: Option<String>,
    /// Tax identifier (CIF), unique
    pub cif: String,
}

impl fmt::Display for Company {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.address.as_deref().unwrap_or(""))
    }
}

/// Create company payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyCreate {
    pub code: String,
    pub name: String,
    pub address: Option<String>,
    pub cif: String,
}

/// Update company payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyUpdate {
    pub code: Option<String>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub cif: Option<String>,
}
