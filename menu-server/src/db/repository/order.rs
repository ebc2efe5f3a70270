//! Order Repository

use super::{RepoError, RepoResult};
use shared::models::{Order, OrderStatus};
use sqlx::{SqliteConnection, SqlitePool};

const COLUMNS: &str = "id, store_id, menu_id, table_id, session_type, status, items, total, stock_deducted, created_at, updated_at";

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<Order>>
where
    E: sqlx::SqliteExecutor<'e>,
{
    let sql = format!("SELECT {COLUMNS} FROM orders WHERE id = ?");
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(order)
}

/// Most recent orders of a store
pub async fn find_recent(pool: &SqlitePool, store_id: i64, limit: i64) -> RepoResult<Vec<Order>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM orders WHERE store_id = ? ORDER BY created_at DESC, id DESC LIMIT ?"
    );
    let orders = sqlx::query_as::<_, Order>(&sql)
        .bind(store_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(orders)
}

/// Delivered orders whose stock was never deducted
pub async fn find_delivered_not_deducted(pool: &SqlitePool, store_id: i64) -> RepoResult<Vec<Order>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM orders WHERE store_id = ? AND status = 'delivered' AND stock_deducted = 0 ORDER BY created_at"
    );
    let orders = sqlx::query_as::<_, Order>(&sql)
        .bind(store_id)
        .fetch_all(pool)
        .await?;
    Ok(orders)
}

pub async fn insert(conn: &mut SqliteConnection, order: &Order) -> RepoResult<()> {
    let items = serde_json::to_string(&order.items)?;
    sqlx::query(
        "INSERT INTO orders (id, store_id, menu_id, table_id, session_type, status, items, total, stock_deducted, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )
    .bind(order.id)
    .bind(order.store_id)
    .bind(order.menu_id)
    .bind(order.table_id)
    .bind(order.session_type)
    .bind(order.status)
    .bind(items)
    .bind(order.total)
    .bind(order.stock_deducted)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn set_status(
    conn: &mut SqliteConnection,
    id: i64,
    status: OrderStatus,
    now: i64,
) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE orders SET status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    Ok(())
}

/// Flip `stock_deducted` only if it currently holds `!deducted`
///
/// Returns false when another writer got there first.
pub async fn mark_stock_deducted(
    conn: &mut SqliteConnection,
    id: i64,
    deducted: bool,
    now: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE orders SET stock_deducted = ?1, updated_at = ?2 WHERE id = ?3 AND stock_deducted = ?4",
    )
    .bind(deducted)
    .bind(now)
    .bind(id)
    .bind(!deducted)
    .execute(&mut *conn)
    .await?;
    Ok(rows.rows_affected() > 0)
}
