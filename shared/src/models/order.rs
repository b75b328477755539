//! Order models
//!
//! An order is the unique open order for a (customer, seat) pair. Placing
//! again for the same pair merges lines; fulfilling a seat deletes all of
//! its orders.

use serde::{Deserialize, Serialize};

/// One line of an order: a quantity of a specific item variant
///
/// Line identity within an order is `(item_id, size)`; merging placements
/// for the same pair sums quantities. `name` is a denormalized copy for
/// display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderLine {
    pub item_id: i64,
    pub name: String,
    pub size: String,
    pub quantity: i64,
}

/// An open order for a (customer, seat) pair
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub customer_name: String,
    pub seat_number: String,
    pub items: Vec<OrderLine>,
    pub created_at: i64,
}

/// One requested line in a place-order request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineInput {
    /// Item id
    pub item: i64,
    pub size: String,
    pub quantity: i64,
    /// Display name as the client knows it; the committed line always
    /// carries the store's own name
    #[serde(default)]
    pub name: Option<String>,
}

/// Place-order request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub customer_name: String,
    pub seat_number: String,
    pub items: Vec<OrderLineInput>,
}

/// Result of fulfilling a seat: how many orders were delivered
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillReceipt {
    pub seat_number: String,
    pub removed: u64,
}
