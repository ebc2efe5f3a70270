//! Repository Module
//!
//! Free async functions over a `SqlitePool` (or a transaction connection),
//! one module per table.

pub mod category;
pub mod inventory_item;
pub mod menu;
pub mod menu_product;
pub mod menu_rule;
pub mod order;
pub mod product;
pub mod stock_movement;
pub mod store;

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound("Row not found".into()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepoError::Duplicate(db_err.message().to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                RepoError::Validation(format!("Referenced record missing: {}", db_err.message()))
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(err: serde_json::Error) -> Self {
        RepoError::Database(format!("JSON column encoding failed: {err}"))
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => {
                tracing::error!(error = %msg, "Repository error");
                AppError::database(msg)
            }
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Rows of `table` belonging to a store (tables carrying `store_id`)
pub async fn count_for_store(
    pool: &sqlx::SqlitePool,
    table: StoreTable,
    store_id: i64,
) -> RepoResult<i64> {
    let sql = match table {
        StoreTable::Menu => "SELECT COUNT(*) FROM menu WHERE store_id = ?",
        StoreTable::MenuRule => {
            "SELECT COUNT(*) FROM menu_rule r JOIN menu m ON m.id = r.menu_id WHERE m.store_id = ?"
        }
        StoreTable::MenuProduct => {
            "SELECT COUNT(*) FROM menu_product mp JOIN menu m ON m.id = mp.menu_id WHERE m.store_id = ?"
        }
        StoreTable::Category => "SELECT COUNT(*) FROM category WHERE store_id = ?",
        StoreTable::Product => "SELECT COUNT(*) FROM product WHERE store_id = ?",
        StoreTable::InventoryItem => "SELECT COUNT(*) FROM inventory_item WHERE store_id = ?",
        StoreTable::Orders => "SELECT COUNT(*) FROM orders WHERE store_id = ?",
        StoreTable::StockMovement => {
            "SELECT COUNT(*) FROM stock_movement sm JOIN inventory_item i ON i.id = sm.inventory_item_id WHERE i.store_id = ?"
        }
    };
    let count = sqlx::query_scalar::<_, i64>(sql)
        .bind(store_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Tables counted per store by diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreTable {
    Menu,
    MenuRule,
    MenuProduct,
    Category,
    Product,
    InventoryItem,
    Orders,
    StockMovement,
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::db::DbService;
    use sqlx::SqlitePool;

    /// Fresh in-memory pool with migrations applied
    pub async fn test_pool() -> SqlitePool {
        DbService::in_memory().await.unwrap().pool
    }
}
