//! `AppError` and the JSON envelope returned by the API

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Business or system error carried from the db layer to the response
///
/// `message` is what the user sees; `details` holds field names and ids
/// for API clients.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Error with the code's default message
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }

    pub fn staff_required() -> Self {
        Self::new(ErrorCode::StaffRequired)
    }

    /// "Tu carrito está vacío."
    pub fn cart_empty() -> Self {
        Self::new(ErrorCode::CartEmpty)
    }

    /// A movement of `requested` units would take lot `lot_id` below zero
    pub fn insufficient_stock(lot_id: i64, available: i32, requested: i32) -> Self {
        Self::new(ErrorCode::InsufficientStock)
            .with_detail("lot_id", lot_id)
            .with_detail("available", available)
            .with_detail("requested", requested)
    }

    /// Pages show these messages verbatim; system errors get a generic page
    pub fn is_user_facing(&self) -> bool {
        !matches!(self.code.category(), ErrorCategory::System)
    }
}

/// JSON envelope: `{"code": 0, "message": "OK"}` on success, the error code,
/// message and details otherwise
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl ApiResponse {
    /// Acknowledgement for writes that return no body (deletes)
    pub fn ok() -> Self {
        Self {
            code: ErrorCode::Success.code(),
            message: "OK".to_string(),
            details: None,
        }
    }

    pub fn error(err: &AppError) -> Self {
        Self {
            code: err.code.code(),
            message: err.message.clone(),
            details: err.details.clone(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        if !self.is_user_facing() {
            tracing::error!(code = %self.code, message = %self.message, "System error");
        }
        (self.http_status(), axum::Json(ApiResponse::error(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_message_comes_from_code() {
        let err = AppError::new(ErrorCode::CartEmpty);
        assert_eq!(err.to_string(), "Tu carrito está vacío.");
        assert!(err.details.is_none());
        assert_eq!(AppError::cart_empty().code, ErrorCode::CartEmpty);
    }

    #[test]
    fn test_details_accumulate() {
        let err = AppError::validation("Invalid fields: email")
            .with_detail("field", "email")
            .with_detail("max_len", 254);
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert_eq!(details.get("field").unwrap(), "email");
        assert_eq!(details.get("max_len").unwrap(), 254);
    }

    #[test]
    fn test_auth_constructors() {
        assert_eq!(AppError::not_authenticated().http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::invalid_credentials().code, ErrorCode::InvalidCredentials);
        assert_eq!(AppError::token_expired().code, ErrorCode::TokenExpired);
        assert_eq!(AppError::invalid_token("bad").message, "bad");
        assert_eq!(AppError::staff_required().http_status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_insufficient_stock_details() {
        let err = AppError::insufficient_stock(12, 3, -5);
        let details = err.details.unwrap();
        assert_eq!(details.get("lot_id").unwrap(), 12);
        assert_eq!(details.get("available").unwrap(), 3);
        assert_eq!(details.get("requested").unwrap(), -5);
    }

    #[test]
    fn test_system_errors_are_not_user_facing() {
        assert!(!AppError::new(ErrorCode::DatabaseError).is_user_facing());
        assert!(!AppError::new(ErrorCode::TemplateError).is_user_facing());
        assert!(AppError::new(ErrorCode::AvailabilityExists).is_user_facing());
    }

    #[test]
    fn test_envelope_json() {
        let json = serde_json::to_value(ApiResponse::ok()).unwrap();
        assert_eq!(json, serde_json::json!({"code": 0, "message": "OK"}));

        let err = AppError::new(ErrorCode::DishNotFound).with_detail("id", 9);
        let json = serde_json::to_value(ApiResponse::error(&err)).unwrap();
        assert_eq!(json["code"], 6001);
        assert_eq!(json["message"], "Dish not found");
        assert_eq!(json["details"]["id"], 9);
    }
}
