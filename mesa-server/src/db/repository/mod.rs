//! Repository Module
//!
//! CRUD operations over the SQLite tables. Repository methods own their
//! transactions; the row-level helper functions they are built from take a
//! `&mut SqliteConnection` so the placement engine can compose them inside
//! one transaction of its own.

pub mod item;
pub mod order;

pub use item::ItemRepository;
pub use order::OrderRepository;

use shared::AppError;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Item {0} not found")]
    ItemNotFound(i64),

    #[error("Variant {size} not found on item {item_id}")]
    VariantNotFound { item_id: i64, size: String },

    #[error("Not enough stock for {item} ({size})")]
    InsufficientStock { item: String, size: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unknown category: {0}")]
    InvalidCategory(String),

    #[error("Price for size {size} must be a non-negative number")]
    InvalidPrice { size: String },

    #[error("Stock for size {size} must be a non-negative integer")]
    InvalidStock { size: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Store busy: {0}")]
    Busy(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return RepoError::Conflict(db_err.to_string());
            }
        }
        // SQLite reports lock contention through error text; classify it so
        // callers can surface a retryable error instead of a 500
        let msg = err.to_string();
        let lowered = msg.to_lowercase();
        if lowered.contains("database is locked") || lowered.contains("busy") {
            RepoError::Busy(msg)
        } else {
            RepoError::Database(msg)
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::ItemNotFound(id) => AppError::item_not_found(id),
            RepoError::VariantNotFound { item_id, size } => {
                AppError::variant_not_found(item_id, size)
            }
            RepoError::InsufficientStock { item, size } => {
                AppError::insufficient_stock(item, size)
            }
            RepoError::Conflict(msg) => {
                AppError::with_message(shared::ErrorCode::AlreadyExists, msg)
            }
            RepoError::InvalidCategory(value) => AppError::invalid_category(value),
            RepoError::InvalidPrice { size } => AppError::with_message(
                shared::ErrorCode::InvalidPrice,
                format!("Price for size {} must be a non-negative number", size),
            ),
            RepoError::InvalidStock { size } => AppError::with_message(
                shared::ErrorCode::InvalidStock,
                format!("Stock for size {} must be a non-negative integer", size),
            ),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Busy(_) => AppError::busy(),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
