//! Unified service-layer error type
//!
//! `ServiceError` bridges DB-layer errors (`sqlx::Error`, `BoxError`) and the
//! API-layer error (`AppError`) so handlers can propagate with `?`.
//! Unique-constraint violations are recognised by constraint name and turned
//! into the matching `*Exists` error code instead of an internal error.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Service-layer error
///
/// - `Db`: database/infrastructure errors (logged, mapped to InternalError)
/// - `App`: business-rule errors (passed through to the client)
#[derive(Debug)]
pub enum ServiceError {
    Db(BoxError),
    App(AppError),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::Db(e) => write!(f, "database error: {e}"),
            ServiceError::App(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ServiceError {}

/// Unique constraint name -> error code
const UNIQUE_CONSTRAINTS: &[(&str, ErrorCode)] = &[
    ("uq_users_username", ErrorCode::UsernameExists),
    ("uq_companies_code", ErrorCode::CompanyCodeExists),
    ("uq_companies_cif", ErrorCode::CompanyCifExists),
    ("uq_clients_user", ErrorCode::ClientProfileExists),
    ("uq_dishes_code", ErrorCode::DishCodeExists),
    ("uq_dish_availability", ErrorCode::AvailabilityExists),
];

/// Map a unique-constraint name to its error code
pub fn unique_violation_code(constraint: Option<&str>) -> ErrorCode {
    constraint
        .and_then(|name| {
            UNIQUE_CONSTRAINTS
                .iter()
                .find(|(c, _)| *c == name)
                .map(|(_, code)| *code)
        })
        .unwrap_or(ErrorCode::AlreadyExists)
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                let code = unique_violation_code(db_err.constraint());
                return ServiceError::App(AppError::new(code));
            }
            if db_err.is_foreign_key_violation() {
                return ServiceError::App(AppError::with_message(
                    ErrorCode::InvalidRequest,
                    "Referenced record does not exist or is still in use",
                ));
            }
        }
        ServiceError::Db(e.into())
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::DatabaseError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_mapping() {
        assert_eq!(
            unique_violation_code(Some("uq_dish_availability")),
            ErrorCode::AvailabilityExists
        );
        assert_eq!(
            unique_violation_code(Some("uq_users_username")),
            ErrorCode::UsernameExists
        );
        assert_eq!(
            unique_violation_code(Some("some_other_key")),
            ErrorCode::AlreadyExists
        );
        assert_eq!(unique_violation_code(None), ErrorCode::AlreadyExists);
    }

    #[test]
    fn test_app_error_passes_through() {
        let err: ServiceError = AppError::new(ErrorCode::CartEmpty).into();
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::CartEmpty);
    }

    #[test]
    fn test_db_error_is_hidden() {
        let err: ServiceError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ServiceError::Db(_)));
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::DatabaseError);
        assert!(!app.message.contains("row"));
    }
}
