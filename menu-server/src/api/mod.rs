//! API routes
//!
//! # Structure
//!
//! - [`health`] - liveness and database check
//! - [`stores`] - stores, categories and products
//! - [`menus`] - menus, rules and menu ↔ product links
//! - [`rpc`] - storefront procedures (`resolve_menu`, `get_menu_products`)
//! - [`catalog`] - resolved catalog and bridge reconciliation
//! - [`orders`] - order placement and lifecycle
//! - [`inventory`] - inventory items and the stock ledger
//! - [`diagnostics`] - per-store health report

pub mod catalog;
pub mod diagnostics;
pub mod health;
pub mod inventory;
pub mod menus;
pub mod orders;
pub mod rpc;
pub mod stores;

pub use crate::utils::{AppError, AppResult};

use crate::db::repository::category;
use crate::utils::ErrorCode;

/// Category must exist and belong to the store
pub(crate) async fn ensure_category(
    pool: &sqlx::SqlitePool,
    store_id: i64,
    category_id: i64,
) -> AppResult<()> {
    let owned = category::find_by_id(pool, category_id)
        .await?
        .is_some_and(|c| c.store_id == store_id);
    if !owned {
        return Err(AppError::with_message(
            ErrorCode::CategoryNotFound,
            format!("Category {category_id} not found"),
        )
        .with_detail("id", category_id));
    }
    Ok(())
}
