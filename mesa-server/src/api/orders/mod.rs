//! Order API module

mod handler;

use axum::{
    routing::get,
    Router,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", order_routes())
}

fn order_routes() -> Router<ServerState> {
    Router::new().route(
        "/",
        get(handler::list)
            .post(handler::place)
            .delete(handler::fulfill),
    )
}
