//! Store API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::ensure_category;
use crate::catalog::service::find_store;
use crate::core::ServerState;
use crate::db::repository::{RepoError, category, inventory_item, product, store};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_optional_text,
    validate_price, validate_required_text, validate_slug,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Category, CategoryCreate, Product, ProductCreate, Store, StoreCreate};

/// GET /api/stores
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Store>>> {
    Ok(Json(store::find_all(&state.pool).await?))
}

/// POST /api/stores
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<StoreCreate>,
) -> AppResult<Json<Store>> {
    validate_slug(&payload.slug, "slug")?;
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    if let Some(theme) = &payload.theme {
        validate_required_text(&theme.accent_color, "accent_color", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&theme.background_color, "background_color", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&theme.default_image_url, "default_image_url", MAX_URL_LEN)?;
    }

    let created = store::create(&state.pool, payload).await.map_err(|e| match e {
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::StoreSlugExists, msg),
        other => other.into(),
    })?;
    tracing::info!(store_id = created.id, slug = %created.slug, "Store created");
    Ok(Json(created))
}

/// GET /api/stores/{slug}
pub async fn get_by_slug(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Store>> {
    Ok(Json(find_store(&state.pool, &slug).await?))
}

/// GET /api/stores/{slug}/categories
pub async fn list_categories(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Vec<Category>>> {
    let store = find_store(&state.pool, &slug).await?;
    Ok(Json(category::find_by_store(&state.pool, store.id).await?))
}

/// POST /api/stores/{slug}/categories
pub async fn create_category(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    let store = find_store(&state.pool, &slug).await?;
    Ok(Json(category::create(&state.pool, store.id, payload).await?))
}

/// GET /api/stores/{slug}/products
pub async fn list_products(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Vec<Product>>> {
    let store = find_store(&state.pool, &slug).await?;
    Ok(Json(product::find_by_store(&state.pool, store.id).await?))
}

/// POST /api/stores/{slug}/products
pub async fn create_product(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&payload.sku, "sku", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;
    validate_optional_text(&payload.image_url, "image_url", MAX_URL_LEN)?;
    if let Some(price) = payload.base_price {
        validate_price(price, "base_price")?;
    }

    let store = find_store(&state.pool, &slug).await?;
    if let Some(category_id) = payload.category_id {
        ensure_category(&state.pool, store.id, category_id).await?;
    }
    if let Some(item_id) = payload.inventory_item_id {
        let owned = inventory_item::find_by_id(&state.pool, item_id)
            .await?
            .is_some_and(|i| i.store_id == store.id);
        if !owned {
            return Err(AppError::with_message(
                ErrorCode::InventoryItemNotFound,
                format!("Inventory item {item_id} not found in store '{slug}'"),
            )
            .with_detail("id", item_id));
        }
    }

    let created = product::create(&state.pool, store.id, payload).await?;
    tracing::info!(product_id = created.id, store = %store.slug, "Product created");
    Ok(Json(created))
}
