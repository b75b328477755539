//! API route modules
//!
//! # Structure
//!
//! - [`health`] - liveness and database ping
//! - [`auth`] - session token issuance
//! - [`items`] - menu browsing and item upsert
//! - [`orders`] - order placement, listing, and seat fulfillment

pub mod auth;
pub mod health;
pub mod items;
pub mod orders;

use axum::{middleware, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Assemble the application router with session, trace, and CORS layers
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(items::router())
        .merge(orders::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_session,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
