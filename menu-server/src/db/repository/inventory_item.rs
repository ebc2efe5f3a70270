//! Inventory Item Repository

use super::{RepoError, RepoResult};
use shared::models::{InventoryItem, InventoryItemCreate};
use sqlx::{SqliteConnection, SqlitePool};

const COLUMNS: &str = "id, store_id, category_id, name, sku, price, image_url, is_menu_visible, current_stock, unit, created_at";

pub async fn find_by_store(pool: &SqlitePool, store_id: i64) -> RepoResult<Vec<InventoryItem>> {
    let sql = format!("SELECT {COLUMNS} FROM inventory_item WHERE store_id = ? ORDER BY name, id");
    let items = sqlx::query_as::<_, InventoryItem>(&sql)
        .bind(store_id)
        .fetch_all(pool)
        .await?;
    Ok(items)
}

pub async fn find_by_id<'e, E>(executor: E, id: i64) -> RepoResult<Option<InventoryItem>>
where
    E: sqlx::SqliteExecutor<'e>,
{
    let sql = format!("SELECT {COLUMNS} FROM inventory_item WHERE id = ?");
    let item = sqlx::query_as::<_, InventoryItem>(&sql)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(item)
}

pub async fn create(
    pool: &SqlitePool,
    store_id: i64,
    data: InventoryItemCreate,
) -> RepoResult<InventoryItem> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO inventory_item (id, store_id, category_id, name, sku, price, image_url, is_menu_visible, current_stock, unit, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )
    .bind(id)
    .bind(store_id)
    .bind(data.category_id)
    .bind(&data.name)
    .bind(&data.sku)
    .bind(data.price.unwrap_or(0.0))
    .bind(&data.image_url)
    .bind(data.is_menu_visible.unwrap_or(true))
    .bind(data.current_stock.unwrap_or(0.0))
    .bind(&data.unit)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create inventory item".into()))
}

/// Add `delta` to the item's stock inside the caller's transaction
pub async fn apply_stock_delta(conn: &mut SqliteConnection, id: i64, delta: f64) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE inventory_item SET current_stock = current_stock + ?1 WHERE id = ?2")
        .bind(delta)
        .bind(id)
        .execute(&mut *conn)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Inventory item {id} not found")));
    }
    Ok(())
}
