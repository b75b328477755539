//! Order API handlers

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::validation::{validate_required_text, MAX_NAME_LEN, MAX_SEAT_LEN};
use crate::utils::{AppError, AppResult};
use shared::models::{FulfillReceipt, Order, PlaceOrderRequest};

/// POST /api/orders - place an order (any session)
///
/// Returns the committed order: newly created, or the open order for the
/// same (customer, seat) with the new lines merged in. Rejections leave
/// stock untouched.
pub async fn place(
    State(state): State<ServerState>,
    _user: CurrentUser,
    Json(req): Json<PlaceOrderRequest>,
) -> AppResult<Json<Order>> {
    validate_required_text(&req.customer_name, "customerName", MAX_NAME_LEN)?;
    validate_required_text(&req.seat_number, "seatNumber", MAX_SEAT_LEN)?;

    let order = state
        .placement_engine()
        .place(req)
        .await
        .map_err(AppError::from)?;
    Ok(Json(order))
}

/// GET /api/orders - all open orders (staff only)
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Order>>> {
    user.require_staff()?;
    let orders = state
        .order_repository()
        .list_all()
        .await
        .map_err(AppError::from)?;
    Ok(Json(orders))
}

#[derive(Debug, Deserialize)]
pub struct FulfillQuery {
    #[serde(rename = "seatNumber", alias = "seat_number")]
    pub seat_number: String,
}

/// DELETE /api/orders?seatNumber=N - mark a seat delivered (staff only)
///
/// Removes every order for the seat; no restock. 404 when the seat has no
/// open orders.
pub async fn fulfill(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<FulfillQuery>,
) -> AppResult<Json<FulfillReceipt>> {
    user.require_staff()?;
    let receipt = state
        .fulfillment_engine()
        .fulfill_seat(&query.seat_number)
        .await?;
    Ok(Json(receipt))
}
