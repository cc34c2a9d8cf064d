//! Database access layer
//!
//! One module per table family. Every function returns [`ServiceResult`] so
//! handlers can `?` into `AppError`.
//!
//! [`ServiceResult`]: crate::error::ServiceResult

pub mod availability;
pub mod cart;
pub mod clients;
pub mod companies;
pub mod dashboard;
pub mod dishes;
pub mod inventory;
pub mod movements;
pub mod order_history;
pub mod production;
pub mod receipts;
pub mod users;
