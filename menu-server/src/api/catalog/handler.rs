//! Catalog API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};

use crate::catalog::service::{self, find_active_store, find_store};
use crate::core::ServerState;
use crate::utils::AppResult;
use shared::models::{ReconciliationReport, SessionContext, StoreCatalog};

/// GET /api/stores/{slug}/catalog?session_type=&table_id=&bar_id=
pub async fn catalog(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
    Query(session): Query<SessionContext>,
) -> AppResult<Json<StoreCatalog>> {
    let store = find_active_store(&state.pool, &slug).await?;
    Ok(Json(
        service::store_catalog(&state.pool, &state.images, store, session).await?,
    ))
}

/// GET /api/stores/{slug}/reconciliation
pub async fn reconciliation(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Json<ReconciliationReport>> {
    let store = find_store(&state.pool, &slug).await?;
    Ok(Json(service::reconciliation(&state.pool, store).await?))
}
