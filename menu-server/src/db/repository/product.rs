//! Product Repository

use super::{RepoError, RepoResult};
use shared::models::{Product, ProductCreate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, store_id, category_id, inventory_item_id, name, description, sku, base_price, image, image_url, is_visible, is_active, is_available, created_at";

pub async fn find_by_store(pool: &SqlitePool, store_id: i64) -> RepoResult<Vec<Product>> {
    let sql = format!("SELECT {COLUMNS} FROM product WHERE store_id = ? ORDER BY name, id");
    let products = sqlx::query_as::<_, Product>(&sql)
        .bind(store_id)
        .fetch_all(pool)
        .await?;
    Ok(products)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let sql = format!("SELECT {COLUMNS} FROM product WHERE id = ?");
    let product = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(product)
}

/// Products referenced by the links of a menu, whatever store they belong to
pub async fn find_by_menu(pool: &SqlitePool, menu_id: i64) -> RepoResult<Vec<Product>> {
    let sql = format!(
        "SELECT {} FROM product p JOIN menu_product mp ON mp.product_id = p.id WHERE mp.menu_id = ?",
        prefixed_columns("p")
    );
    let products = sqlx::query_as::<_, Product>(&sql)
        .bind(menu_id)
        .fetch_all(pool)
        .await?;
    Ok(products)
}

pub async fn create(pool: &SqlitePool, store_id: i64, data: ProductCreate) -> RepoResult<Product> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    sqlx::query(
        "INSERT INTO product (id, store_id, category_id, inventory_item_id, name, description, sku, base_price, image, image_url, is_visible, is_active, is_available, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, 1, ?12, ?13)",
    )
    .bind(id)
    .bind(store_id)
    .bind(data.category_id)
    .bind(data.inventory_item_id)
    .bind(&data.name)
    .bind(&data.description)
    .bind(&data.sku)
    .bind(data.base_price.unwrap_or(0.0))
    .bind(&data.image)
    .bind(&data.image_url)
    .bind(data.is_visible.unwrap_or(true))
    .bind(data.is_available.unwrap_or(true))
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

fn prefixed_columns(alias: &str) -> String {
    COLUMNS
        .split(", ")
        .map(|c| format!("{alias}.{c}"))
        .collect::<Vec<_>>()
        .join(", ")
}
