//! Category Repository

use super::{RepoError, RepoResult};
use shared::models::{Category, CategoryCreate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, store_id, name, sort_order, is_menu_visible, is_active";

pub async fn find_by_store(pool: &SqlitePool, store_id: i64) -> RepoResult<Vec<Category>> {
    let sql = format!("SELECT {COLUMNS} FROM category WHERE store_id = ? ORDER BY sort_order, name");
    let categories = sqlx::query_as::<_, Category>(&sql)
        .bind(store_id)
        .fetch_all(pool)
        .await?;
    Ok(categories)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Category>> {
    let sql = format!("SELECT {COLUMNS} FROM category WHERE id = ?");
    let category = sqlx::query_as::<_, Category>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(category)
}

pub async fn create(pool: &SqlitePool, store_id: i64, data: CategoryCreate) -> RepoResult<Category> {
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO category (id, store_id, name, sort_order, is_menu_visible, is_active) VALUES (?1, ?2, ?3, ?4, ?5, 1)",
    )
    .bind(id)
    .bind(store_id)
    .bind(&data.name)
    .bind(data.sort_order.unwrap_or(0))
    .bind(data.is_menu_visible.unwrap_or(true))
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create category".into()))
}
