//! Menu Product Repository

use super::{RepoError, RepoResult};
use shared::models::{LinkAllResult, MenuProduct, MenuProductLink};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, menu_id, product_id, price_override, sort_order, is_visible";

pub async fn find_by_menu(pool: &SqlitePool, menu_id: i64) -> RepoResult<Vec<MenuProduct>> {
    let sql = format!("SELECT {COLUMNS} FROM menu_product WHERE menu_id = ? ORDER BY sort_order, id");
    let links = sqlx::query_as::<_, MenuProduct>(&sql)
        .bind(menu_id)
        .fetch_all(pool)
        .await?;
    Ok(links)
}

/// Links of every menu of a store
pub async fn find_by_store(pool: &SqlitePool, store_id: i64) -> RepoResult<Vec<MenuProduct>> {
    let links = sqlx::query_as::<_, MenuProduct>(
        "SELECT mp.id, mp.menu_id, mp.product_id, mp.price_override, mp.sort_order, mp.is_visible FROM menu_product mp JOIN menu m ON m.id = mp.menu_id WHERE m.store_id = ? ORDER BY mp.menu_id, mp.sort_order, mp.id",
    )
    .bind(store_id)
    .fetch_all(pool)
    .await?;
    Ok(links)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<MenuProduct>> {
    let sql = format!("SELECT {COLUMNS} FROM menu_product WHERE id = ?");
    let link = sqlx::query_as::<_, MenuProduct>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(link)
}

pub async fn link(pool: &SqlitePool, menu_id: i64, data: &MenuProductLink) -> RepoResult<MenuProduct> {
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO menu_product (id, menu_id, product_id, price_override, sort_order, is_visible) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(id)
    .bind(menu_id)
    .bind(data.product_id)
    .bind(data.price_override)
    .bind(data.sort_order.unwrap_or(0))
    .bind(data.is_visible.unwrap_or(true))
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to link product".into()))
}

/// Link every product of `store_id` to the menu and make existing links visible
///
/// Idempotent: a second run reports everything as unchanged. Only an existing
/// `(menu_id, product_id)` link is skipped; any other constraint failure
/// aborts the whole run.
pub async fn link_all(pool: &SqlitePool, menu_id: i64, store_id: i64) -> RepoResult<LinkAllResult> {
    let mut tx = pool.begin().await?;

    let product_ids: Vec<i64> =
        sqlx::query_scalar("SELECT id FROM product WHERE store_id = ? ORDER BY name, id")
            .bind(store_id)
            .fetch_all(&mut *tx)
            .await?;

    let mut result = LinkAllResult::default();
    for (position, product_id) in product_ids.into_iter().enumerate() {
        let inserted = sqlx::query(
            "INSERT INTO menu_product (id, menu_id, product_id, price_override, sort_order, is_visible) VALUES (?1, ?2, ?3, NULL, ?4, 1) ON CONFLICT(menu_id, product_id) DO NOTHING",
        )
        .bind(shared::util::snowflake_id())
        .bind(menu_id)
        .bind(product_id)
        .bind(position as i32)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if inserted > 0 {
            result.linked += 1;
            continue;
        }

        let shown = sqlx::query(
            "UPDATE menu_product SET is_visible = 1 WHERE menu_id = ? AND product_id = ? AND is_visible = 0",
        )
        .bind(menu_id)
        .bind(product_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if shown > 0 {
            result.made_visible += 1;
        } else {
            result.unchanged += 1;
        }
    }

    tx.commit().await?;
    Ok(result)
}
