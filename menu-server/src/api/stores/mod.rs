//! Store API module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/stores", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{slug}", get(handler::get_by_slug))
        .route(
            "/{slug}/categories",
            get(handler::list_categories).post(handler::create_category),
        )
        .route(
            "/{slug}/products",
            get(handler::list_products).post(handler::create_product),
        )
}
