//! Data models
//!
//! Shared between gastro-server and its API consumers.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (PostgreSQL BIGSERIAL).

pub mod cart;
pub mod client;
pub mod company;
pub mod dashboard;
pub mod dish;
pub mod inventory;
pub mod order_history;
pub mod production;
pub mod receipt;
pub mod user;
pub mod weekday;

// Re-exports
pub use cart::*;
pub use client::*;
pub use company::*;
pub use dashboard::*;
pub use dish::*;
pub use inventory::*;
pub use order_history::*;
pub use production::*;
pub use receipt::*;
pub use user::*;
pub use weekday::*;
