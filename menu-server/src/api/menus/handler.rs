//! Menu API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use sqlx::SqlitePool;

use crate::catalog::resolver::attach_rules;
use crate::catalog::rules::validate_condition;
use crate::catalog::service::find_store;
use crate::core::ServerState;
use crate::db::repository::{RepoError, menu, menu_product, menu_rule, product};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_price, validate_required_text,
    validate_slug,
};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{
    LinkAllResult, Menu, MenuCreate, MenuProduct, MenuProductLink, MenuRule, MenuRuleCreate,
    MenuUpdate, MenuWithRules,
};
use shared::util::slugify;

async fn find_menu(pool: &SqlitePool, id: i64) -> AppResult<Menu> {
    menu::find_by_id(pool, id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::MenuNotFound, format!("Menu {id} not found"))
            .with_detail("id", id)
    })
}

fn validate_priority(priority: Option<i32>) -> AppResult<()> {
    if let Some(p) = priority
        && p < 0
    {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("priority must be non-negative, got {p}"),
        ));
    }
    Ok(())
}

/// GET /api/stores/{slug}/menus
pub async fn list(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Vec<MenuWithRules>>> {
    let store = find_store(&state.pool, &slug).await?;
    let menus = menu::find_by_store(&state.pool, store.id).await?;
    let rules = menu_rule::find_by_store(&state.pool, store.id).await?;
    Ok(Json(attach_rules(menus, rules)))
}

/// POST /api/stores/{slug}/menus
///
/// A store has at most one fallback menu.
pub async fn create(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
    Json(payload): Json<MenuCreate>,
) -> AppResult<Json<Menu>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_priority(payload.priority)?;
    let menu_slug = match &payload.slug {
        Some(s) => s.clone(),
        None => slugify(&payload.name),
    };
    validate_slug(&menu_slug, "slug")?;

    let store = find_store(&state.pool, &slug).await?;
    if payload.is_fallback == Some(true)
        && let Some(existing) = menu::find_fallbacks(&state.pool, store.id).await?.first()
    {
        return Err(AppError::conflict(format!(
            "Store '{}' already has a fallback menu ('{}')",
            store.slug, existing.slug
        ))
        .with_detail("menu_id", existing.id));
    }

    let created = menu::create(&state.pool, store.id, &menu_slug, payload).await?;
    tracing::info!(
        menu_id = created.id,
        store = %store.slug,
        slug = %created.slug,
        is_fallback = created.is_fallback,
        "Menu created"
    );
    Ok(Json(created))
}

/// GET /api/menus/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MenuWithRules>> {
    let menu = find_menu(&state.pool, id).await?;
    let rules = menu_rule::find_by_menu(&state.pool, id).await?;
    Ok(Json(MenuWithRules { menu, rules }))
}

/// PUT /api/menus/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<MenuUpdate>,
) -> AppResult<Json<Menu>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_priority(payload.priority)?;

    let current = find_menu(&state.pool, id).await?;
    if current.is_fallback && payload.is_active == Some(false) {
        return Err(AppError::new(ErrorCode::FallbackMenuProtected).with_detail("id", id));
    }
    Ok(Json(menu::update(&state.pool, id, payload).await?))
}

/// GET /api/menus/{id}/rules
pub async fn list_rules(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<MenuRule>>> {
    find_menu(&state.pool, id).await?;
    Ok(Json(menu_rule::find_by_menu(&state.pool, id).await?))
}

/// POST /api/menus/{id}/rules
pub async fn create_rule(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<MenuRuleCreate>,
) -> AppResult<Json<MenuRule>> {
    validate_condition(&payload.condition)?;
    find_menu(&state.pool, id).await?;
    let rule = menu_rule::create(
        &state.pool,
        id,
        &payload.condition,
        payload.is_active.unwrap_or(true),
    )
    .await?;
    tracing::info!(menu_id = id, rule_id = rule.id, rule_type = rule.condition.rule_type(), "Menu rule added");
    Ok(Json(rule))
}

/// DELETE /api/menu-rules/{id}
pub async fn delete_rule(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let rule = menu_rule::find_by_id(&state.pool, id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::MenuRuleNotFound, format!("Menu rule {id} not found"))
            .with_detail("id", id)
    })?;
    let deleted = menu_rule::delete(&state.pool, rule.id).await?;
    tracing::info!(menu_id = rule.menu_id, rule_id = id, "Menu rule removed");
    Ok(Json(deleted))
}

/// GET /api/menus/{id}/products
pub async fn list_links(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<MenuProduct>>> {
    find_menu(&state.pool, id).await?;
    Ok(Json(menu_product::find_by_menu(&state.pool, id).await?))
}

/// POST /api/menus/{id}/products
pub async fn link_product(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<MenuProductLink>,
) -> AppResult<Json<MenuProduct>> {
    if let Some(price) = payload.price_override {
        validate_price(price, "price_override")?;
    }
    let menu = find_menu(&state.pool, id).await?;
    let product = product::find_by_id(&state.pool, payload.product_id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::ProductNotFound).with_detail("id", payload.product_id)
        })?;
    if product.store_id != menu.store_id {
        return Err(AppError::new(ErrorCode::MenuStoreMismatch)
            .with_detail("menu_id", menu.id)
            .with_detail("product_id", product.id));
    }

    let link = menu_product::link(&state.pool, menu.id, &payload)
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(_) => AppError::new(ErrorCode::ProductAlreadyLinked)
                .with_detail("menu_id", menu.id)
                .with_detail("product_id", product.id),
            other => other.into(),
        })?;
    Ok(Json(link))
}

/// POST /api/menus/{id}/products/link-all
pub async fn link_all(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<LinkAllResult>> {
    let menu = find_menu(&state.pool, id).await?;
    let result = menu_product::link_all(&state.pool, menu.id, menu.store_id).await?;
    tracing::info!(
        menu_id = menu.id,
        linked = result.linked,
        made_visible = result.made_visible,
        unchanged = result.unchanged,
        "Linked store products to menu"
    );
    Ok(Json(result))
}
