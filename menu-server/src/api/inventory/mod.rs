//! Inventory API module
//!
//! Stock only changes through the ledger: orders write `sale`/`return`
//! movements, `/adjust` writes the manual ones.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/stores/{slug}/inventory",
            get(handler::list).post(handler::create),
        )
        .nest("/api/inventory", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/movements", get(handler::movements))
        .route("/{id}/adjust", post(handler::adjust))
}
