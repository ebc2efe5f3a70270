//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::catalog::service::find_store;
use crate::core::ServerState;
use crate::ledger;
use crate::utils::AppResult;
use shared::models::{Order, OrderCreate, OrderStatusUpdate};

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}

/// POST /api/orders
pub async fn place(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    Ok(Json(
        ledger::place_order(&state.pool, &state.images, payload).await?,
    ))
}

/// GET /api/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    Ok(Json(ledger::get_order(&state.pool, id).await?))
}

/// POST /api/orders/{id}/status
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<Order>> {
    Ok(Json(
        ledger::update_status(&state.pool, id, payload.status).await?,
    ))
}

/// GET /api/stores/{slug}/orders?limit=
pub async fn recent(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
    Query(query): Query<RecentQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let store = find_store(&state.pool, &slug).await?;
    Ok(Json(
        ledger::recent_orders(&state.pool, store.id, query.limit).await?,
    ))
}
