//! Item API module

mod handler;

use axum::{
    routing::get,
    Router,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/items", item_routes())
}

fn item_routes() -> Router<ServerState> {
    Router::new().route("/", get(handler::list).post(handler::upsert))
}
