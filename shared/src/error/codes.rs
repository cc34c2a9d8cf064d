//! Unified error codes for Familia Gastro
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Client / company errors
//! - 4xxx: Cart / receipt errors
//! - 5xxx: Payment errors
//! - 6xxx: Dish / availability errors
//! - 7xxx: Production / inventory errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Serialized as its `u16` value so the JSON envelope stays compact and
/// stable for the browser scripts and back-office consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1007,
    /// Username already taken
    UsernameExists = 1008,
    /// Password and confirmation differ
    PasswordMismatch = 1009,
    /// Password too short
    PasswordTooShort = 1010,
    /// Too many attempts from the same address
    TooManyAttempts = 1011,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Staff account required
    StaffRequired = 2003,

    // ==================== 3xxx: Client / Company ====================
    /// Client profile not found
    ClientNotFound = 3001,
    /// User already has a client profile
    ClientProfileExists = 3002,
    /// Company not found
    CompanyNotFound = 3101,
    /// Company code already exists
    CompanyCodeExists = 3102,
    /// Company CIF already exists
    CompanyCifExists = 3103,

    // ==================== 4xxx: Cart / Receipt ====================
    /// Cart has no items
    CartEmpty = 4001,
    /// Cart item not found
    CartItemNotFound = 4002,
    /// Quantity must be at least one
    InvalidQuantity = 4003,
    /// Receipt not found
    ReceiptNotFound = 4101,
    /// No receipt waiting for payment
    NoPendingReceipt = 4102,
    /// Receipt is already paid
    ReceiptAlreadyPaid = 4103,

    // ==================== 5xxx: Payment ====================
    /// Payment failed or was cancelled
    PaymentFailed = 5001,
    /// Payment gateway is not configured
    PaymentNotConfigured = 5002,

    // ==================== 6xxx: Dish / Availability ====================
    /// Dish not found
    DishNotFound = 6001,
    /// Dish code already exists
    DishCodeExists = 6002,
    /// Dish price is invalid
    DishInvalidPrice = 6003,
    /// Dish is not offered on the requested weekday
    DishUnavailableOnDay = 6004,
    /// Availability not found
    AvailabilityNotFound = 6101,
    /// Dish already assigned to that weekday
    AvailabilityExists = 6102,
    /// Weekday code not recognised
    InvalidWeekday = 6103,

    // ==================== 7xxx: Production / Inventory ====================
    /// Production batch not found
    ProductionNotFound = 7001,
    /// Production status not recognised
    InvalidProductionStatus = 7002,
    /// Inventory lot not found
    InventoryNotFound = 7101,
    /// Movement would leave the lot below zero
    InsufficientStock = 7102,
    /// Expiry date earlier than production date
    InvalidExpiryDate = 7103,
    /// Inventory movement not found
    MovementNotFound = 7201,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
    /// Template rendering failed
    TemplateError = 9006,
}

impl ErrorCode {
    /// Numeric value of this code
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Default human readable message
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Usuario o Contraseña incorrecta",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::AccountDisabled => "Account is disabled",
            ErrorCode::UsernameExists => "El usuario ya existe",
            ErrorCode::PasswordMismatch => "Su contraseña no coincide",
            ErrorCode::PasswordTooShort => "Password must be at least 8 characters",
            ErrorCode::TooManyAttempts => "Too many attempts",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::StaffRequired => "Staff account is required",

            // Client / Company
            ErrorCode::ClientNotFound => "Client not found",
            ErrorCode::ClientProfileExists => "Client profile already exists",
            ErrorCode::CompanyNotFound => "Company not found",
            ErrorCode::CompanyCodeExists => "Company code already exists",
            ErrorCode::CompanyCifExists => "Company CIF already exists",

            // Cart / Receipt
            ErrorCode::CartEmpty => "Tu carrito está vacío.",
            ErrorCode::CartItemNotFound => "Cart item not found",
            ErrorCode::InvalidQuantity => "Quantity must be at least 1",
            ErrorCode::ReceiptNotFound => "Receipt not found",
            ErrorCode::NoPendingReceipt => "No se encontró ningún recibo.",
            ErrorCode::ReceiptAlreadyPaid => "Receipt has already been paid",

            // Payment
            ErrorCode::PaymentFailed => "El pago fue cancelado o falló.",
            ErrorCode::PaymentNotConfigured => "Payment gateway is not configured",

            // Dish / Availability
            ErrorCode::DishNotFound => "Dish not found",
            ErrorCode::DishCodeExists => "Dish code already exists",
            ErrorCode::DishInvalidPrice => "Dish has invalid price",
            ErrorCode::DishUnavailableOnDay => "Dish is not available on that day",
            ErrorCode::AvailabilityNotFound => "Availability not found",
            ErrorCode::AvailabilityExists => "Este plato ya está asignado para ese día.",
            ErrorCode::InvalidWeekday => "Invalid weekday",

            // Production / Inventory
            ErrorCode::ProductionNotFound => "Production batch not found",
            ErrorCode::InvalidProductionStatus => "Invalid production status",
            ErrorCode::InventoryNotFound => "Inventory lot not found",
            ErrorCode::InsufficientStock => "Insufficient stock in inventory lot",
            ErrorCode::InvalidExpiryDate => "Expiry date is before production date",
            ErrorCode::MovementNotFound => "Inventory movement not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::TemplateError => "Template rendering failed",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when a numeric code does not map to an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1007 => Ok(ErrorCode::AccountDisabled),
            1008 => Ok(ErrorCode::UsernameExists),
            1009 => Ok(ErrorCode::PasswordMismatch),
            1010 => Ok(ErrorCode::PasswordTooShort),
            1011 => Ok(ErrorCode::TooManyAttempts),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::StaffRequired),

            // Client / Company
            3001 => Ok(ErrorCode::ClientNotFound),
            3002 => Ok(ErrorCode::ClientProfileExists),
            3101 => Ok(ErrorCode::CompanyNotFound),
            3102 => Ok(ErrorCode::CompanyCodeExists),
            3103 => Ok(ErrorCode::CompanyCifExists),

            // Cart / Receipt
            4001 => Ok(ErrorCode::CartEmpty),
            4002 => Ok(ErrorCode::CartItemNotFound),
            4003 => Ok(ErrorCode::InvalidQuantity),
            4101 => Ok(ErrorCode::ReceiptNotFound),
            4102 => Ok(ErrorCode::NoPendingReceipt),
            4103 => Ok(ErrorCode::ReceiptAlreadyPaid),

            // Payment
            5001 => Ok(ErrorCode::PaymentFailed),
            5002 => Ok(ErrorCode::PaymentNotConfigured),

            // Dish / Availability
            6001 => Ok(ErrorCode::DishNotFound),
            6002 => Ok(ErrorCode::DishCodeExists),
            6003 => Ok(ErrorCode::DishInvalidPrice),
            6004 => Ok(ErrorCode::DishUnavailableOnDay),
            6101 => Ok(ErrorCode::AvailabilityNotFound),
            6102 => Ok(ErrorCode::AvailabilityExists),
            6103 => Ok(ErrorCode::InvalidWeekday),

            // Production / Inventory
            7001 => Ok(ErrorCode::ProductionNotFound),
            7002 => Ok(ErrorCode::InvalidProductionStatus),
            7101 => Ok(ErrorCode::InventoryNotFound),
            7102 => Ok(ErrorCode::InsufficientStock),
            7103 => Ok(ErrorCode::InvalidExpiryDate),
            7201 => Ok(ErrorCode::MovementNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),
            9006 => Ok(ErrorCode::TemplateError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::StaffRequired.code(), 2003);
        assert_eq!(ErrorCode::CompanyCifExists.code(), 3103);
        assert_eq!(ErrorCode::CartEmpty.code(), 4001);
        assert_eq!(ErrorCode::PaymentFailed.code(), 5001);
        assert_eq!(ErrorCode::AvailabilityExists.code(), 6102);
        assert_eq!(ErrorCode::InsufficientStock.code(), 7102);
        assert_eq!(ErrorCode::TemplateError.code(), 9006);
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(1008), Ok(ErrorCode::UsernameExists));
        assert_eq!(ErrorCode::try_from(4001), Ok(ErrorCode::CartEmpty));
        assert_eq!(ErrorCode::try_from(6102), Ok(ErrorCode::AvailabilityExists));
        assert_eq!(ErrorCode::try_from(9001), Ok(ErrorCode::InternalError));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
        assert_eq!(ErrorCode::try_from(8001), Err(InvalidErrorCode(8001)));
    }

    #[test]
    fn test_serialize() {
        assert_eq!(serde_json::to_string(&ErrorCode::NotFound).unwrap(), "3");
        assert_eq!(serde_json::to_string(&ErrorCode::CartEmpty).unwrap(), "4001");
    }

    #[test]
    fn test_deserialize() {
        let code: ErrorCode = serde_json::from_str("6001").unwrap();
        assert_eq!(code, ErrorCode::DishNotFound);

        let result: Result<ErrorCode, _> = serde_json::from_str("1234");
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ErrorCode::Success), "0");
        assert_eq!(format!("{}", ErrorCode::ReceiptNotFound), "4101");
    }

    #[test]
    fn test_user_facing_messages() {
        assert_eq!(ErrorCode::CartEmpty.message(), "Tu carrito está vacío.");
        assert_eq!(
            ErrorCode::AvailabilityExists.message(),
            "Este plato ya está asignado para ese día."
        );
        assert_eq!(ErrorCode::PasswordMismatch.message(), "Su contraseña no coincide");
        assert_eq!(ErrorCode::UsernameExists.message(), "El usuario ya existe");
    }

    #[test]
    fn test_every_code_roundtrips_through_u16() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::InvalidCredentials,
            ErrorCode::PermissionDenied,
            ErrorCode::ClientNotFound,
            ErrorCode::NoPendingReceipt,
            ErrorCode::PaymentNotConfigured,
            ErrorCode::InvalidWeekday,
            ErrorCode::MovementNotFound,
            ErrorCode::ConfigError,
        ];

        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }
}
