//! User Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Login account. The password hash never leaves the server crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub is_staff: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
