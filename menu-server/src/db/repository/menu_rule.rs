//! Menu Rule Repository

use super::{RepoError, RepoResult};
use shared::models::{MenuRule, RuleCondition};
use sqlx::SqlitePool;

pub async fn find_by_menu(pool: &SqlitePool, menu_id: i64) -> RepoResult<Vec<MenuRule>> {
    let rules = sqlx::query_as::<_, MenuRule>(
        "SELECT id, menu_id, condition, is_active FROM menu_rule WHERE menu_id = ? ORDER BY id",
    )
    .bind(menu_id)
    .fetch_all(pool)
    .await?;
    Ok(rules)
}

/// Every rule of every menu of a store
pub async fn find_by_store(pool: &SqlitePool, store_id: i64) -> RepoResult<Vec<MenuRule>> {
    let rules = sqlx::query_as::<_, MenuRule>(
        "SELECT r.id, r.menu_id, r.condition, r.is_active FROM menu_rule r JOIN menu m ON m.id = r.menu_id WHERE m.store_id = ? ORDER BY r.menu_id, r.id",
    )
    .bind(store_id)
    .fetch_all(pool)
    .await?;
    Ok(rules)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<MenuRule>> {
    let rule = sqlx::query_as::<_, MenuRule>(
        "SELECT id, menu_id, condition, is_active FROM menu_rule WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(rule)
}

pub async fn create(
    pool: &SqlitePool,
    menu_id: i64,
    condition: &RuleCondition,
    is_active: bool,
) -> RepoResult<MenuRule> {
    let id = shared::util::snowflake_id();
    let condition_json = serde_json::to_string(condition)?;
    sqlx::query("INSERT INTO menu_rule (id, menu_id, condition, is_active) VALUES (?1, ?2, ?3, ?4)")
        .bind(id)
        .bind(menu_id)
        .bind(condition_json)
        .bind(is_active)
        .execute(pool)
        .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create menu rule".into()))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM menu_rule WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;
    use crate::db::repository::{menu, store};
    use shared::models::{MenuCreate, SessionType, StoreCreate};

    #[tokio::test]
    async fn condition_is_stored_as_tagged_json() {
        let pool = test_pool().await;
        let store = store::create(
            &pool,
            StoreCreate {
                slug: "demo".into(),
                name: "Demo".into(),
                theme: None,
                settings: None,
            },
        )
        .await
        .unwrap();
        let menu = menu::create(
            &pool,
            store.id,
            "bar",
            MenuCreate {
                name: "Bar".into(),
                slug: None,
                description: None,
                priority: None,
                is_fallback: None,
            },
        )
        .await
        .unwrap();

        let cond = RuleCondition::SessionType {
            values: vec![SessionType::Bar],
        };
        let rule = create(&pool, menu.id, &cond, true).await.unwrap();
        assert_eq!(rule.condition, cond);

        let raw: String = sqlx::query_scalar("SELECT condition FROM menu_rule WHERE id = ?")
            .bind(rule.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["rule_type"], "session_type");

        assert_eq!(find_by_store(&pool, store.id).await.unwrap().len(), 1);
        assert!(delete(&pool, rule.id).await.unwrap());
        assert!(!delete(&pool, rule.id).await.unwrap());
        assert!(find_by_menu(&pool, menu.id).await.unwrap().is_empty());
    }
}
