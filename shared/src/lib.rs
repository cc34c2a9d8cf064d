//! Shared types for Familia Gastro
//!
//! Domain models, derived-field rules, money helpers and the unified error
//! system used by the server and its API consumers.

pub mod error;
pub mod models;
pub mod money;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, ErrorCode};
