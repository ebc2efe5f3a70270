//! Store diagnostics
//!
//! Read-only health report of one store's menu setup: fallback coverage,
//! priority clashes, dead links, bridge gaps, image problems and orders
//! whose stock never moved.

use std::collections::{BTreeMap, HashSet};

use shared::error::AppResult;
use shared::models::{
    DiagnosticIssue, DiagnosticsReport, InventoryItem, IssueCode, SessionContext, Severity, Store,
    TableCounts,
};
use shared::util::now_millis;
use sqlx::SqlitePool;

use crate::catalog::image::{self, ImageCandidates};
use crate::catalog::{ImagePolicy, RuleContext, StoreSnapshot};
use crate::db::repository::{StoreTable, count_for_store, order};
use crate::services::ImageProbe;

/// Build the report; `probe` enables HEAD checks of effective image URLs
pub async fn run(
    pool: &SqlitePool,
    images: &ImagePolicy,
    probe: Option<&ImageProbe>,
    store: Store,
) -> AppResult<DiagnosticsReport> {
    let counts = table_counts(pool, store.id).await?;
    let undeducted = order::find_delivered_not_deducted(pool, store.id).await?;
    let snapshot = StoreSnapshot::load(pool, store).await?;
    let generic_resolution = snapshot.resolve(&RuleContext::now(SessionContext::generic()));

    let mut issues = Vec::new();
    menu_issues(&snapshot, images, &mut issues);
    link_issues(&snapshot, &mut issues);
    bridge_issues(&snapshot, &mut issues);
    image_issues(&snapshot, &mut issues);
    for o in &undeducted {
        issues.push(DiagnosticIssue::new(
            IssueCode::StockNotDeducted,
            format!("Delivered order {} never deducted stock", o.id),
            Some(o.id),
        ));
    }

    let mut image_probes = Vec::new();
    if let Some(probe) = probe {
        let targets = effective_images(&snapshot, images);
        image_probes = probe
            .probe_all(targets.iter().map(|(url, _)| url.clone()))
            .await;
        for result in image_probes.iter().filter(|r| !r.ok) {
            for (_, product_id) in targets.iter().filter(|(url, _)| *url == result.url) {
                let why = match (result.status, &result.error) {
                    (Some(status), _) => format!("HTTP {status}"),
                    (None, Some(err)) => err.clone(),
                    (None, None) => "unreachable".to_string(),
                };
                issues.push(DiagnosticIssue::new(
                    IssueCode::BrokenImage,
                    format!("Image {} is broken ({why})", result.url),
                    Some(*product_id),
                ));
            }
        }
    }

    issues.sort_by_key(|i| i.severity);
    let report = DiagnosticsReport {
        store_id: snapshot.store.id,
        store_slug: snapshot.store.slug.clone(),
        generated_at: now_millis(),
        counts,
        generic_resolution,
        issues,
        image_probes,
    };
    tracing::info!(
        store = %report.store_slug,
        errors = report.issues.iter().filter(|i| i.severity == Severity::Error).count(),
        issues = report.issues.len(),
        "Diagnostics generated"
    );
    Ok(report)
}

async fn table_counts(pool: &SqlitePool, store_id: i64) -> AppResult<TableCounts> {
    Ok(TableCounts {
        menus: count_for_store(pool, StoreTable::Menu, store_id).await?,
        menu_rules: count_for_store(pool, StoreTable::MenuRule, store_id).await?,
        menu_products: count_for_store(pool, StoreTable::MenuProduct, store_id).await?,
        categories: count_for_store(pool, StoreTable::Category, store_id).await?,
        products: count_for_store(pool, StoreTable::Product, store_id).await?,
        inventory_items: count_for_store(pool, StoreTable::InventoryItem, store_id).await?,
        orders: count_for_store(pool, StoreTable::Orders, store_id).await?,
        stock_movements: count_for_store(pool, StoreTable::StockMovement, store_id).await?,
    })
}

fn menu_issues(snapshot: &StoreSnapshot, images: &ImagePolicy, issues: &mut Vec<DiagnosticIssue>) {
    let active: Vec<_> = snapshot
        .menus
        .iter()
        .map(|m| &m.menu)
        .filter(|m| m.is_active)
        .collect();

    let fallbacks: Vec<_> = active.iter().filter(|m| m.is_fallback).collect();
    match fallbacks.len() {
        0 => issues.push(DiagnosticIssue::new(
            IssueCode::NoFallbackMenu,
            "No active fallback menu; visitors without a matching context see nothing",
            None,
        )),
        1 => {}
        n => {
            for m in &fallbacks {
                issues.push(DiagnosticIssue::new(
                    IssueCode::MultipleFallbackMenus,
                    format!("{n} active fallback menus; '{}' is one of them", m.slug),
                    Some(m.id),
                ));
            }
        }
    }

    let mut by_priority: BTreeMap<i32, Vec<&str>> = BTreeMap::new();
    for m in active.iter().filter(|m| !m.is_fallback) {
        by_priority.entry(m.priority).or_default().push(&m.slug);
    }
    for (priority, slugs) in by_priority.into_iter().filter(|(_, s)| s.len() > 1) {
        issues.push(DiagnosticIssue::new(
            IssueCode::PriorityConflict,
            format!("Menus {} share priority {priority}", slugs.join(", ")),
            None,
        ));
    }

    for m in &active {
        if snapshot.entries(m.id, images).is_empty() {
            issues.push(DiagnosticIssue::new(
                IssueCode::EmptyMenu,
                format!("Menu '{}' has no visible products", m.slug),
                Some(m.id),
            ));
        }
    }
}

fn link_issues(snapshot: &StoreSnapshot, issues: &mut Vec<DiagnosticIssue>) {
    let mut linked = HashSet::new();
    for link in &snapshot.links {
        if snapshot.products.contains_key(&link.product_id) {
            linked.insert(link.product_id);
        } else {
            issues.push(DiagnosticIssue::new(
                IssueCode::OrphanMenuLink,
                format!(
                    "Menu {} links product {} which is not in this store",
                    link.menu_id, link.product_id
                ),
                Some(link.id),
            ));
        }
    }

    let mut unlinked: Vec<_> = snapshot
        .products
        .values()
        .filter(|p| p.is_active && !linked.contains(&p.id))
        .collect();
    unlinked.sort_by_key(|p| p.id);
    for p in unlinked {
        issues.push(DiagnosticIssue::new(
            IssueCode::UnlinkedProduct,
            format!("Product '{}' is on no menu", p.name),
            Some(p.id),
        ));
    }
}

fn bridge_issues(snapshot: &StoreSnapshot, issues: &mut Vec<DiagnosticIssue>) {
    let report = snapshot.bridge.report();
    for id in &report.unmatched_products {
        issues.push(DiagnosticIssue::new(
            IssueCode::UnmatchedProduct,
            format!("Product {id} has no inventory item"),
            Some(*id),
        ));
    }
    for id in &report.orphan_inventory_items {
        issues.push(DiagnosticIssue::new(
            IssueCode::OrphanInventoryItem,
            format!("Inventory item {id} backs no product"),
            Some(*id),
        ));
    }
    for broken in &report.broken_links {
        issues.push(DiagnosticIssue::new(
            IssueCode::BrokenInventoryLink,
            format!(
                "Product {} is linked to inventory item {} which is not in this store",
                broken.product_id, broken.inventory_item_id
            ),
            Some(broken.product_id),
        ));
    }
    for amb in &report.ambiguous {
        issues.push(DiagnosticIssue::new(
            IssueCode::AmbiguousMatch,
            format!(
                "Product {} matches {} inventory items by {:?} '{}'",
                amb.product_id,
                amb.candidates.len(),
                amb.strategy,
                amb.key
            ),
            Some(amb.product_id),
        ));
    }
}

/// Stored image references, checked raw (before normalization)
fn image_issues(snapshot: &StoreSnapshot, issues: &mut Vec<DiagnosticIssue>) {
    let mut products: Vec<_> = snapshot.products.values().filter(|p| p.is_active).collect();
    products.sort_by_key(|p| p.id);

    for p in products {
        let item_image = backing_item(snapshot, p.id).and_then(|i| i.image_url.as_deref());
        let raw = [p.image_url.as_deref(), p.image.as_deref(), item_image];
        for url in raw.into_iter().flatten().filter(|u| !u.trim().is_empty()) {
            let code = if image::is_placeholder(url) {
                IssueCode::PlaceholderImage
            } else if image::is_staging(url) {
                IssueCode::StagingImage
            } else if image::is_legacy_bucket(url) {
                IssueCode::LegacyBucketImage
            } else {
                continue;
            };
            issues.push(DiagnosticIssue::new(
                code,
                format!("Product '{}' image {url}", p.name),
                Some(p.id),
            ));
        }
    }
}

/// Inventory item the bridge paired with the product, by any strategy
fn backing_item(snapshot: &StoreSnapshot, product_id: i64) -> Option<&InventoryItem> {
    snapshot
        .bridge
        .match_for(product_id)
        .and_then(|m| snapshot.items.get(&m.inventory_item_id))
}

/// Effective image URL of every active product, with the product id
fn effective_images(snapshot: &StoreSnapshot, images: &ImagePolicy) -> Vec<(String, i64)> {
    let mut out: Vec<(String, i64)> = snapshot
        .products
        .values()
        .filter(|p| p.is_active)
        .filter_map(|p| {
            let item = backing_item(snapshot, p.id);
            let candidates = ImageCandidates {
                product_image_url: p.image_url.as_deref(),
                product_image: p.image.as_deref(),
                inventory_image_url: item.and_then(|i| i.image_url.as_deref()),
            };
            let (url, _) = images.resolve(candidates, &snapshot.store.theme);
            url.map(|u| (u, p.id))
        })
        .collect();
    out.sort();
    out
}
