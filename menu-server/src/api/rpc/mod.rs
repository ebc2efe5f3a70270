//! Storefront RPC
//!
//! | Path | Body | Result |
//! |------|------|--------|
//! | /rpc/resolve_menu | `{p_store_id?, p_slug?, p_session_type?, p_table_id?, p_bar_id?}` | `MenuResolution` |
//! | /rpc/get_menu_products | `{p_menu_id}` | `CatalogEntry[]` |

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/rpc/resolve_menu", post(handler::resolve_menu))
        .route("/rpc/get_menu_products", post(handler::get_menu_products))
}
