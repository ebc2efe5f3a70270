//! Store Repository

use super::{RepoError, RepoResult};
use shared::models::{Store, StoreCreate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, slug, name, theme, settings, is_active, created_at";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Store>> {
    let sql = format!("SELECT {COLUMNS} FROM store ORDER BY name");
    let stores = sqlx::query_as::<_, Store>(&sql).fetch_all(pool).await?;
    Ok(stores)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Store>> {
    let sql = format!("SELECT {COLUMNS} FROM store WHERE id = ?");
    let store = sqlx::query_as::<_, Store>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(store)
}

pub async fn find_by_slug(pool: &SqlitePool, slug: &str) -> RepoResult<Option<Store>> {
    let sql = format!("SELECT {COLUMNS} FROM store WHERE slug = ? LIMIT 1");
    let store = sqlx::query_as::<_, Store>(&sql)
        .bind(slug)
        .fetch_optional(pool)
        .await?;
    Ok(store)
}

pub async fn create(pool: &SqlitePool, data: StoreCreate) -> RepoResult<Store> {
    if find_by_slug(pool, &data.slug).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Store slug '{}' already exists",
            data.slug
        )));
    }

    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();
    let theme = serde_json::to_string(&data.theme.unwrap_or_default())?;
    let settings = serde_json::to_string(&data.settings.unwrap_or_default())?;

    sqlx::query(
        "INSERT INTO store (id, slug, name, theme, settings, is_active, created_at) VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6)",
    )
    .bind(id)
    .bind(&data.slug)
    .bind(&data.name)
    .bind(theme)
    .bind(settings)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create store".into()))
}
