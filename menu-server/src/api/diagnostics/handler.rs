use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::catalog::service::find_store;
use crate::core::ServerState;
use crate::diagnostics;
use crate::utils::AppResult;
use shared::models::DiagnosticsReport;

#[derive(Debug, Default, Deserialize)]
pub struct DiagnosticsQuery {
    /// HEAD every effective image URL (slow)
    #[serde(default)]
    pub probe_images: bool,
}

/// GET /api/stores/{slug}/diagnostics?probe_images=
pub async fn report(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
    Query(query): Query<DiagnosticsQuery>,
) -> AppResult<Json<DiagnosticsReport>> {
    let store = find_store(&state.pool, &slug).await?;
    let probe = query.probe_images.then_some(&state.probe);
    Ok(Json(
        diagnostics::run(&state.pool, &state.images, probe, store).await?,
    ))
}
