//! Placement engine errors

use crate::db::repository::RepoError;
use shared::{AppError, ErrorCode};
use thiserror::Error;

/// Reasons a placement request terminates in Rejected or Failed
///
/// Every variant aborts the whole request; no stock mutation from a
/// rejected request survives.
#[derive(Debug, Error)]
pub enum PlacementError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Order has no lines")]
    EmptyOrder,

    #[error("Quantity must be positive for item {item_id} ({size})")]
    InvalidQuantity { item_id: i64, size: String },

    #[error("Item {0} not found")]
    ItemNotFound(i64),

    #[error("Variant {size} not found on item {item_id}")]
    VariantNotFound { item_id: i64, size: String },

    #[error("Not enough stock for {item} ({size}): requested {requested}, available {available}")]
    InsufficientStock {
        item: String,
        size: String,
        requested: i64,
        available: i64,
    },

    #[error(transparent)]
    Store(#[from] RepoError),
}

impl From<PlacementError> for AppError {
    fn from(err: PlacementError) -> Self {
        match err {
            PlacementError::MissingField(field) => AppError::required(field),
            PlacementError::EmptyOrder => AppError::new(ErrorCode::OrderEmpty),
            PlacementError::InvalidQuantity { item_id, size } => {
                AppError::validation(format!(
                    "Quantity must be positive for item {} ({})",
                    item_id, size
                ))
                .with_detail("item_id", item_id)
                .with_detail("size", size)
            }
            PlacementError::ItemNotFound(id) => AppError::item_not_found(id),
            PlacementError::VariantNotFound { item_id, size } => {
                AppError::variant_not_found(item_id, size)
            }
            PlacementError::InsufficientStock {
                item,
                size,
                requested,
                available,
            } => AppError::insufficient_stock(item, size)
                .with_detail("requested", requested)
                .with_detail("available", available),
            PlacementError::Store(e) => e.into(),
        }
    }
}
