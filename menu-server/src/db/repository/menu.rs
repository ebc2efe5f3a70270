//! Menu Repository

use super::{RepoError, RepoResult};
use shared::models::{Menu, MenuCreate, MenuUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str =
    "id, store_id, name, slug, description, priority, is_fallback, is_active, created_at";

/// Default priority for menus created without one
pub const DEFAULT_PRIORITY: i32 = 100;

/// All menus of a store, resolution order (priority, then id)
pub async fn find_by_store(pool: &SqlitePool, store_id: i64) -> RepoResult<Vec<Menu>> {
    let sql = format!("SELECT {COLUMNS} FROM menu WHERE store_id = ? ORDER BY priority, id");
    let menus = sqlx::query_as::<_, Menu>(&sql)
        .bind(store_id)
        .fetch_all(pool)
        .await?;
    Ok(menus)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Menu>> {
    let sql = format!("SELECT {COLUMNS} FROM menu WHERE id = ?");
    let menu = sqlx::query_as::<_, Menu>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(menu)
}

pub async fn find_fallbacks(pool: &SqlitePool, store_id: i64) -> RepoResult<Vec<Menu>> {
    let sql = format!(
        "SELECT {COLUMNS} FROM menu WHERE store_id = ? AND is_fallback = 1 AND is_active = 1 ORDER BY priority, id"
    );
    let menus = sqlx::query_as::<_, Menu>(&sql)
        .bind(store_id)
        .fetch_all(pool)
        .await?;
    Ok(menus)
}

/// Insert a menu. `slug` must already be resolved by the caller.
pub async fn create(
    pool: &SqlitePool,
    store_id: i64,
    slug: &str,
    data: MenuCreate,
) -> RepoResult<Menu> {
    let id = shared::util::snowflake_id();
    let now = shared::util::now_millis();

    sqlx::query(
        "INSERT INTO menu (id, store_id, name, slug, description, priority, is_fallback, is_active, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8)",
    )
    .bind(id)
    .bind(store_id)
    .bind(&data.name)
    .bind(slug)
    .bind(&data.description)
    .bind(data.priority.unwrap_or(DEFAULT_PRIORITY))
    .bind(data.is_fallback.unwrap_or(false))
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(msg) if msg.contains("menu.slug") => {
            RepoError::Duplicate(format!("Menu slug '{slug}' already exists for this store"))
        }
        // idx_menu_single_fallback, reported by SQLite as "menu.store_id"
        RepoError::Duplicate(_) => RepoError::Duplicate(format!(
            "Store {store_id} already has an active fallback menu"
        )),
        other => other,
    })?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create menu".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: MenuUpdate) -> RepoResult<Menu> {
    let rows = sqlx::query(
        "UPDATE menu SET name = COALESCE(?1, name), description = COALESCE(?2, description), priority = COALESCE(?3, priority), is_active = COALESCE(?4, is_active) WHERE id = ?5",
    )
    .bind(data.name)
    .bind(data.description)
    .bind(data.priority)
    .bind(data.is_active)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| match RepoError::from(e) {
        RepoError::Duplicate(_) => {
            RepoError::Duplicate(format!("Activating menu {id} would add a second fallback"))
        }
        other => other,
    })?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Menu {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Menu {id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::store;
    use crate::db::repository::test_support::test_pool;
    use shared::models::StoreCreate;

    async fn seed_store(pool: &SqlitePool) -> i64 {
        store::create(
            pool,
            StoreCreate {
                slug: "demo".into(),
                name: "Demo".into(),
                theme: None,
                settings: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    fn menu(name: &str, priority: Option<i32>, fallback: bool) -> MenuCreate {
        MenuCreate {
            name: name.into(),
            slug: None,
            description: None,
            priority,
            is_fallback: Some(fallback),
        }
    }

    #[tokio::test]
    async fn menus_are_listed_by_priority() {
        let pool = test_pool().await;
        let store_id = seed_store(&pool).await;
        create(&pool, store_id, "general", menu("General", None, true)).await.unwrap();
        create(&pool, store_id, "bar", menu("Bar", Some(10), false)).await.unwrap();

        let menus = find_by_store(&pool, store_id).await.unwrap();
        assert_eq!(menus.len(), 2);
        assert_eq!(menus[0].slug, "bar");
        assert_eq!(menus[1].priority, DEFAULT_PRIORITY);

        let fallbacks = find_fallbacks(&pool, store_id).await.unwrap();
        assert_eq!(fallbacks.len(), 1);
        assert_eq!(fallbacks[0].slug, "general");
    }

    #[tokio::test]
    async fn duplicate_slug_in_store_is_rejected() {
        let pool = test_pool().await;
        let store_id = seed_store(&pool).await;
        create(&pool, store_id, "bar", menu("Bar", None, false)).await.unwrap();
        let err = create(&pool, store_id, "bar", menu("Bar 2", None, false))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn update_keeps_unspecified_fields() {
        let pool = test_pool().await;
        let store_id = seed_store(&pool).await;
        let created = create(&pool, store_id, "bar", menu("Bar", Some(5), false))
            .await
            .unwrap();

        let updated = update(
            &pool,
            created.id,
            MenuUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(!updated.is_active);
        assert_eq!(updated.priority, 5);
        assert_eq!(updated.name, "Bar");

        let err = update(&pool, 42, MenuUpdate::default()).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn one_active_fallback_per_store() {
        let pool = test_pool().await;
        let store_id = seed_store(&pool).await;
        let general = create(&pool, store_id, "general", menu("General", None, true))
            .await
            .unwrap();

        let err = create(&pool, store_id, "otra", menu("Otra", None, true))
            .await
            .unwrap_err();
        assert!(matches!(&err, RepoError::Duplicate(msg) if msg.contains("fallback")));

        // an inactive fallback does not count
        update(
            &pool,
            general.id,
            MenuUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        create(&pool, store_id, "otra", menu("Otra", None, true)).await.unwrap();

        let err = update(
            &pool,
            general.id,
            MenuUpdate {
                is_active: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
        assert_eq!(find_fallbacks(&pool, store_id).await.unwrap().len(), 1);
    }
}
