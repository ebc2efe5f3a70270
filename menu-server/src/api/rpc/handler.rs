use axum::{Json, extract::State};

use crate::catalog::RuleContext;
use crate::catalog::service::{
    find_active_store, find_active_store_by_id, menu_products, resolve_menu as resolve,
};
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};
use shared::models::{CatalogEntry, MenuProductsParams, MenuResolution, ResolveMenuParams};

/// POST /rpc/resolve_menu
///
/// `p_store_id` wins over `p_slug` when both are sent. No matching menu is a
/// normal answer (`menu: null`), not an error.
pub async fn resolve_menu(
    State(state): State<ServerState>,
    Json(params): Json<ResolveMenuParams>,
) -> AppResult<Json<MenuResolution>> {
    let store = match (params.p_store_id, params.p_slug.as_deref()) {
        (Some(id), _) => find_active_store_by_id(&state.pool, id).await?,
        (None, Some(slug)) => find_active_store(&state.pool, slug).await?,
        (None, None) => {
            return Err(AppError::validation("p_store_id or p_slug is required")
                .with_detail("field", "p_slug"));
        }
    };
    let ctx = RuleContext::now(params.context());
    Ok(Json(resolve(&state.pool, store, &ctx).await?))
}

/// POST /rpc/get_menu_products
pub async fn get_menu_products(
    State(state): State<ServerState>,
    Json(params): Json<MenuProductsParams>,
) -> AppResult<Json<Vec<CatalogEntry>>> {
    Ok(Json(
        menu_products(&state.pool, &state.images, params.p_menu_id).await?,
    ))
}
