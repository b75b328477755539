//! Seat fulfillment engine
//!
//! Marking a seat delivered removes every order for that seat. Delivered
//! items are not returned to inventory.

use crate::db::repository::OrderRepository;
use crate::db::DbService;
use shared::models::FulfillReceipt;
use shared::AppError;

#[derive(Clone)]
pub struct FulfillmentEngine {
    db: DbService,
}

impl FulfillmentEngine {
    pub fn new(db: DbService) -> Self {
        Self { db }
    }

    /// Delete all orders for the seat; SeatHasNoOrders (404, non-fatal)
    /// when nothing matched
    pub async fn fulfill_seat(&self, seat_number: &str) -> Result<FulfillReceipt, AppError> {
        let seat = seat_number.trim();
        if seat.is_empty() {
            return Err(AppError::required("seatNumber"));
        }

        let removed = OrderRepository::new(self.db.clone())
            .delete_for_seat(seat)
            .await
            .map_err(AppError::from)?;

        if removed == 0 {
            return Err(AppError::seat_has_no_orders(seat));
        }

        tracing::info!(seat_number = seat, removed, "Seat fulfilled");
        Ok(FulfillReceipt {
            seat_number: seat.to_string(),
            removed,
        })
    }
}
