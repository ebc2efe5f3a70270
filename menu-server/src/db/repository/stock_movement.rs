//! Stock Movement Repository (append-only)

use super::RepoResult;
use shared::models::StockMovement;
use sqlx::{SqliteConnection, SqlitePool};

/// Ledger of one inventory item, newest first
pub async fn find_by_item(
    pool: &SqlitePool,
    inventory_item_id: i64,
    limit: i64,
) -> RepoResult<Vec<StockMovement>> {
    let movements = sqlx::query_as::<_, StockMovement>(
        "SELECT id, inventory_item_id, qty_delta, reason, order_id, created_at FROM stock_movement WHERE inventory_item_id = ? ORDER BY created_at DESC, id DESC LIMIT ?",
    )
    .bind(inventory_item_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(movements)
}

pub async fn find_by_order(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<StockMovement>> {
    let movements = sqlx::query_as::<_, StockMovement>(
        "SELECT id, inventory_item_id, qty_delta, reason, order_id, created_at FROM stock_movement WHERE order_id = ? ORDER BY created_at, id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(movements)
}

pub async fn insert(conn: &mut SqliteConnection, movement: &StockMovement) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO stock_movement (id, inventory_item_id, qty_delta, reason, order_id, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(movement.id)
    .bind(movement.inventory_item_id)
    .bind(movement.qty_delta)
    .bind(movement.reason)
    .bind(movement.order_id)
    .bind(movement.created_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}
