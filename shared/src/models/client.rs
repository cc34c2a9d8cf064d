//! Client Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Client profile attached to a user account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Client {
    pub id: i64,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
    pub important: bool,
    pub user_id: i64,
    pub company_id: Option<i64>,
    /// Joined from the company row
    pub company_name: Option<String>,
    /// Private customer ("particular"), delivered at `private_address`
    pub is_private: bool,
    pub private_address: Option<String>,
    pub phone: Option<String>,
    pub national_id: Option<String>,
    pub email: Option<String>,
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_private {
            write!(f, "{} - Particular", self.full_name)
        } else {
            write!(
                f,
                "{} - {}",
                self.full_name,
                self.company_name.as_deref().unwrap_or("Sin empresa")
            )
        }
    }
}

/// Create client payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientCreate {
    /// Owner account; the web profile form always uses the session user
    pub user_id: Option<i64>,
    pub full_name: String,
    pub important: Option<bool>,
    pub company_id: Option<i64>,
    pub is_private: Option<bool>,
    pub private_address: Option<String>,
    pub phone: Option<String>,
    pub national_id: Option<String>,
    pub email: Option<String>,
}

/// Update client payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientUpdate {
    pub full_name: Option<String>,
    pub important: Option<bool>,
    pub company_id: Option<i64>,
    pub is_private: Option<bool>,
    pub private_address: Option<String>,
    pub phone: Option<String>,
    pub national_id: Option<String>,
    pub email: Option<String>,
}

/// Client with at least one order in the activity window
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ActiveClient {
    pub id: i64,
    pub full_name: String,
    pub username: String,
    pub company_name: Option<String>,
    pub order_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(is_private: bool, company_name: Option<&str>) -> Client {
        Client {
            id: 1,
            full_name: "Ana Pérez".to_string(),
            created_at: Utc::now(),
            important: false,
            user_id: 1,
            company_id: company_name.map(|_| 3),
            company_name: company_name.map(str::to_string),
            is_private,
            private_address: None,
            phone: None,
            national_id: None,
            email: None,
        }
    }

    #[test]
    fn test_display_private_client() {
        assert_eq!(client(true, Some("Acme")).to_string(), "Ana Pérez - Particular");
    }

    #[test]
    fn test_display_company_client() {
        assert_eq!(client(false, Some("Acme")).to_string(), "Ana Pérez - Acme");
    }

    #[test]
    fn test_display_without_company() {
        assert_eq!(client(false, None).to_string(), "Ana Pérez - Sin empresa");
    }
}
