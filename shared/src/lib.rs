//! Shared types for the Mesa ordering service
//!
//! Common types used by the server and by API clients: the unified error
//! system, domain models, and small utilities (timestamps, ID generation).

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
