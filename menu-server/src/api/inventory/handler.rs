//! Inventory API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::ensure_category;
use crate::catalog::service::find_store;
use crate::core::ServerState;
use crate::db::repository::inventory_item;
use crate::ledger;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_optional_text, validate_price,
    validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{InventoryItem, InventoryItemCreate, StockAdjustment, StockMovement};

#[derive(Debug, Deserialize)]
pub struct MovementsQuery {
    pub limit: Option<i64>,
}

/// GET /api/stores/{slug}/inventory
pub async fn list(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Vec<InventoryItem>>> {
    let store = find_store(&state.pool, &slug).await?;
    Ok(Json(inventory_item::find_by_store(&state.pool, store.id).await?))
}

/// POST /api/stores/{slug}/inventory
pub async fn create(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
    Json(payload): Json<InventoryItemCreate>,
) -> AppResult<Json<InventoryItem>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.sku, "sku", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.unit, "unit", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.image_url, "image_url", MAX_URL_LEN)?;
    if let Some(price) = payload.price {
        validate_price(price, "price")?;
    }
    if let Some(stock) = payload.current_stock
        && !stock.is_finite()
    {
        return Err(AppError::with_message(
            ErrorCode::StockInvalidQuantity,
            "current_stock must be a finite number",
        ));
    }

    let store = find_store(&state.pool, &slug).await?;
    if let Some(category_id) = payload.category_id {
        ensure_category(&state.pool, store.id, category_id).await?;
    }
    let item = inventory_item::create(&state.pool, store.id, payload).await?;
    tracing::info!(inventory_item_id = item.id, store = %store.slug, "Inventory item created");
    Ok(Json(item))
}

/// GET /api/inventory/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<InventoryItem>> {
    let item = inventory_item::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::InventoryItemNotFound).with_detail("id", id))?;
    Ok(Json(item))
}

/// GET /api/inventory/{id}/movements?limit=
pub async fn movements(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Query(query): Query<MovementsQuery>,
) -> AppResult<Json<Vec<StockMovement>>> {
    Ok(Json(
        ledger::list_movements(&state.pool, id, query.limit).await?,
    ))
}

/// POST /api/inventory/{id}/adjust
pub async fn adjust(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<StockAdjustment>,
) -> AppResult<Json<StockMovement>> {
    Ok(Json(ledger::adjust_stock(&state.pool, id, payload).await?))
}
