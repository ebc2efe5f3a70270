//! Database-backed catalog operations
//!
//! Loads everything one store needs in a handful of queries, then runs the
//! pure resolver / bridge / visibility code over it.

use std::collections::HashMap;

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    CatalogEntry, Category, InventoryItem, MenuProduct, MenuResolution, MenuWithRules, Product,
    ReconciliationReport, SessionContext, Store, StoreCatalog,
};
use sqlx::SqlitePool;

use super::bridge::Bridge;
use super::image::ImagePolicy;
use super::resolver::{attach_rules, resolve};
use super::rules::RuleContext;
use super::visibility::{CatalogSource, expand};
use crate::db::repository::{category, inventory_item, menu, menu_product, menu_rule, product, store};

/// One store's menus, catalog records and links
pub struct StoreSnapshot {
    pub store: Store,
    pub menus: Vec<MenuWithRules>,
    pub links: Vec<MenuProduct>,
    pub products: HashMap<i64, Product>,
    pub items: HashMap<i64, InventoryItem>,
    pub categories: HashMap<i64, Category>,
    pub bridge: Bridge,
}

impl StoreSnapshot {
    pub async fn load(pool: &SqlitePool, store: Store) -> AppResult<Self> {
        let menus = menu::find_by_store(pool, store.id).await?;
        let rules = menu_rule::find_by_store(pool, store.id).await?;
        let links = menu_product::find_by_store(pool, store.id).await?;
        let products = product::find_by_store(pool, store.id).await?;
        let items = inventory_item::find_by_store(pool, store.id).await?;
        let categories = category::find_by_store(pool, store.id).await?;

        let bridge = Bridge::build(store.id, &products, &items);
        Ok(Self {
            menus: attach_rules(menus, rules),
            links,
            products: products.into_iter().map(|p| (p.id, p)).collect(),
            items: items.into_iter().map(|i| (i.id, i)).collect(),
            categories: categories.into_iter().map(|c| (c.id, c)).collect(),
            bridge,
            store,
        })
    }

    pub fn resolve(&self, ctx: &RuleContext) -> MenuResolution {
        resolve(&self.menus, ctx)
    }

    pub fn links_of(&self, menu_id: i64) -> Vec<MenuProduct> {
        self.links
            .iter()
            .filter(|l| l.menu_id == menu_id)
            .cloned()
            .collect()
    }

    /// Visible entries of one of this store's menus
    pub fn entries(&self, menu_id: i64, images: &ImagePolicy) -> Vec<CatalogEntry> {
        let links = self.links_of(menu_id);
        let source = CatalogSource {
            store: &self.store,
            links: &links,
            products: &self.products,
            items: &self.items,
            categories: &self.categories,
            bridge: &self.bridge,
        };
        expand(&source, images)
    }

    pub fn reconciliation(&self) -> ReconciliationReport {
        self.bridge.report().clone()
    }
}

/// Store by slug; unknown slugs are a not-found error
pub async fn find_store(pool: &SqlitePool, slug: &str) -> AppResult<Store> {
    store::find_by_slug(pool, slug)
        .await?
        .ok_or_else(|| AppError::store_not_found(slug))
}

/// Store that may serve customers
pub async fn find_active_store(pool: &SqlitePool, slug: &str) -> AppResult<Store> {
    let store = find_store(pool, slug).await?;
    ensure_active(&store)?;
    Ok(store)
}

pub async fn find_active_store_by_id(pool: &SqlitePool, id: i64) -> AppResult<Store> {
    let store = store::find_by_id(pool, id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::StoreNotFound, format!("Store {id} not found"))
                .with_detail("id", id)
        })?;
    ensure_active(&store)?;
    Ok(store)
}

fn ensure_active(store: &Store) -> AppResult<()> {
    if !store.is_active {
        return Err(AppError::new(ErrorCode::StoreInactive).with_detail("slug", store.slug.clone()));
    }
    Ok(())
}

/// Resolve the menu a store serves for a context
pub async fn resolve_menu(
    pool: &SqlitePool,
    store: Store,
    ctx: &RuleContext,
) -> AppResult<MenuResolution> {
    let snapshot = StoreSnapshot::load(pool, store).await?;
    let resolution = snapshot.resolve(ctx);
    log_resolution(&snapshot.store, ctx, &resolution);
    Ok(resolution)
}

/// Resolve and expand in one step
pub async fn store_catalog(
    pool: &SqlitePool,
    images: &ImagePolicy,
    store: Store,
    session: SessionContext,
) -> AppResult<StoreCatalog> {
    let ctx = RuleContext::now(session);
    let snapshot = StoreSnapshot::load(pool, store).await?;
    let resolution = snapshot.resolve(&ctx);
    log_resolution(&snapshot.store, &ctx, &resolution);

    let entries = match resolution.menu_id() {
        Some(menu_id) => snapshot.entries(menu_id, images),
        None => Vec::new(),
    };
    Ok(StoreCatalog {
        store_id: snapshot.store.id,
        store_slug: snapshot.store.slug.clone(),
        resolution,
        entries,
    })
}

/// Visible entries of a menu, looked up by id
pub async fn menu_products(
    pool: &SqlitePool,
    images: &ImagePolicy,
    menu_id: i64,
) -> AppResult<Vec<CatalogEntry>> {
    let menu = menu::find_by_id(pool, menu_id).await?.ok_or_else(|| {
        AppError::with_message(ErrorCode::MenuNotFound, format!("Menu {menu_id} not found"))
            .with_detail("id", menu_id)
    })?;
    let store = find_active_store_by_id(pool, menu.store_id).await?;
    let snapshot = StoreSnapshot::load(pool, store).await?;
    Ok(snapshot.entries(menu.id, images))
}

pub async fn reconciliation(pool: &SqlitePool, store: Store) -> AppResult<ReconciliationReport> {
    let snapshot = StoreSnapshot::load(pool, store).await?;
    Ok(snapshot.reconciliation())
}

fn log_resolution(store: &Store, ctx: &RuleContext, resolution: &MenuResolution) {
    tracing::debug!(
        store = %store.slug,
        session_type = ctx.session.effective_session_type().as_str(),
        table_id = ?ctx.session.table_id,
        bar_id = ?ctx.session.bar_id,
        menu_id = ?resolution.menu_id(),
        reason = ?resolution.reason,
        ambiguous = resolution.ambiguous,
        "Menu resolved"
    );
}
