//! Order API module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/stores/{slug}/orders", get(handler::recent))
        .nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::place))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", post(handler::update_status))
}
