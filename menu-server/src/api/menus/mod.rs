//! Menu API module
//!
//! | Path | Method | Meaning |
//! |------|--------|---------|
//! | /api/stores/{slug}/menus | GET, POST | menus of a store (with rules) / create |
//! | /api/menus/{id} | GET, PUT | one menu / update |
//! | /api/menus/{id}/rules | GET, POST | rules of a menu / add |
//! | /api/menu-rules/{id} | DELETE | remove a rule |
//! | /api/menus/{id}/products | GET, POST | product links / link one |
//! | /api/menus/{id}/products/link-all | POST | link every store product |

mod handler;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route(
            "/api/stores/{slug}/menus",
            get(handler::list).post(handler::create),
        )
        .nest("/api/menus", routes())
        .route("/api/menu-rules/{id}", delete(handler::delete_rule))
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{id}", get(handler::get_by_id).put(handler::update))
        .route("/{id}/rules", get(handler::list_rules).post(handler::create_rule))
        .route(
            "/{id}/products",
            get(handler::list_links).post(handler::link_product),
        )
        .route("/{id}/products/link-all", post(handler::link_all))
}
