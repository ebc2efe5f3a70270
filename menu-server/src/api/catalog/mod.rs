//! Catalog API module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/stores/{slug}/catalog", get(handler::catalog))
        .route("/api/stores/{slug}/reconciliation", get(handler::reconciliation))
}
