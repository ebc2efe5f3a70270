//! Order placement and lifecycle

use std::collections::HashMap;

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    CatalogEntry, Order, OrderCreate, OrderLine, OrderStatus, SessionContext,
};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

use super::money::{self, line_total, order_total, to_f64, validate_quantity};
use super::stock::{deduct_in, order_not_found, restock_in};
use crate::catalog::service::find_active_store;
use crate::catalog::{ImagePolicy, RuleContext, StoreSnapshot};
use crate::db::repository::{RepoError, order};

pub const DEFAULT_RECENT_LIMIT: i64 = 50;
pub const MAX_RECENT_LIMIT: i64 = 200;

/// Price an order against the menu the store serves right now, persist it
/// and deduct stock
pub async fn place_order(
    pool: &SqlitePool,
    images: &ImagePolicy,
    data: OrderCreate,
) -> AppResult<Order> {
    if data.items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }
    for line in &data.items {
        validate_quantity(line.quantity)?;
    }

    let store = find_active_store(pool, &data.store_slug).await?;
    let session = SessionContext {
        session_type: data.session_type,
        table_id: data.table_id,
        bar_id: data.bar_id,
    };
    let ctx = RuleContext::now(session);
    let snapshot = StoreSnapshot::load(pool, store).await?;
    let resolution = snapshot.resolve(&ctx);
    let Some(menu_id) = resolution.menu_id() else {
        return Err(AppError::new(ErrorCode::OrderNoMenu).with_detail("store", data.store_slug));
    };

    let entries: HashMap<i64, CatalogEntry> = snapshot
        .entries(menu_id, images)
        .into_iter()
        .map(|e| (e.product_id, e))
        .collect();

    let mut lines = Vec::with_capacity(data.items.len());
    for input in &data.items {
        let Some(entry) = entries.get(&input.product_id) else {
            let code = if snapshot.products.contains_key(&input.product_id) {
                ErrorCode::ProductNotVisible
            } else {
                ErrorCode::ProductNotFound
            };
            return Err(AppError::new(code).with_detail("product_id", input.product_id));
        };
        money::require_finite(entry.price, "price")?;
        lines.push(OrderLine {
            product_id: entry.product_id,
            inventory_item_id: entry.inventory_item_id,
            name: entry.name.clone(),
            unit_price: entry.price,
            quantity: input.quantity,
            line_total: to_f64(line_total(entry.price, input.quantity)),
        });
    }

    let now = now_millis();
    let new_order = Order {
        id: snowflake_id(),
        store_id: snapshot.store.id,
        menu_id,
        table_id: ctx.session.table_id,
        session_type: ctx.session.effective_session_type(),
        status: OrderStatus::Pending,
        total: to_f64(order_total(&lines)),
        items: lines,
        stock_deducted: false,
        created_at: now,
        updated_at: now,
    };

    let mut tx = pool.begin().await.map_err(RepoError::from)?;
    order::insert(&mut tx, &new_order).await?;
    deduct_in(&mut tx, &new_order, now).await?;
    tx.commit().await.map_err(RepoError::from)?;

    tracing::info!(
        order_id = new_order.id,
        store = %snapshot.store.slug,
        menu_id,
        total = new_order.total,
        lines = new_order.items.len(),
        "Order placed"
    );
    get_order(pool, new_order.id).await
}

/// Move an order along its lifecycle
///
/// Cancelling returns deducted stock; delivering deducts it if that never
/// happened. Setting the current status again is a no-op.
pub async fn update_status(pool: &SqlitePool, id: i64, next: OrderStatus) -> AppResult<Order> {
    let mut tx = pool.begin().await.map_err(RepoError::from)?;
    let current = order::find_by_id(&mut *tx, id)
        .await?
        .ok_or_else(|| order_not_found(id))?;

    if current.status == next {
        return Ok(current);
    }
    if !current.status.can_transition_to(next) {
        return Err(AppError::with_message(
            ErrorCode::OrderInvalidTransition,
            format!(
                "Cannot move order from {} to {}",
                current.status.as_str(),
                next.as_str()
            ),
        )
        .with_detail("from", current.status.as_str())
        .with_detail("to", next.as_str()));
    }

    let now = now_millis();
    order::set_status(&mut tx, id, next, now).await?;
    match next {
        OrderStatus::Cancelled if current.stock_deducted => {
            restock_in(&mut tx, &current, now).await?;
        }
        OrderStatus::Delivered if !current.stock_deducted => {
            deduct_in(&mut tx, &current, now).await?;
        }
        _ => {}
    }
    tx.commit().await.map_err(RepoError::from)?;

    tracing::info!(
        order_id = id,
        from = current.status.as_str(),
        to = next.as_str(),
        "Order status updated"
    );
    get_order(pool, id).await
}

pub async fn get_order(pool: &SqlitePool, id: i64) -> AppResult<Order> {
    order::find_by_id(pool, id)
        .await?
        .ok_or_else(|| order_not_found(id))
}

/// Most recent orders of a store
pub async fn recent_orders(pool: &SqlitePool, store_id: i64, limit: Option<i64>) -> AppResult<Vec<Order>> {
    let limit = limit.unwrap_or(DEFAULT_RECENT_LIMIT).clamp(1, MAX_RECENT_LIMIT);
    Ok(order::find_recent(pool, store_id, limit).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;
    use crate::db::repository::{inventory_item, menu_product, product, stock_movement};
    use crate::ledger::fixtures::{images, seed};
    use shared::models::{MenuProductLink, MovementReason, OrderLineInput, ProductCreate};

    fn create(slug: &str, product_id: i64, quantity: i32) -> OrderCreate {
        OrderCreate {
            store_slug: slug.into(),
            session_type: None,
            table_id: Some(7),
            bar_id: None,
            items: vec![OrderLineInput {
                product_id,
                quantity,
            }],
        }
    }

    async fn stock_of(pool: &SqlitePool, id: i64) -> f64 {
        inventory_item::find_by_id(pool, id)
            .await
            .unwrap()
            .unwrap()
            .current_stock
    }

    #[tokio::test]
    async fn placing_an_order_prices_and_deducts() {
        let pool = test_pool().await;
        let fx = seed(&pool).await;

        let order = place_order(&pool, &images(), create("demo", fx.product_id, 3))
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.menu_id, fx.menu_id);
        assert_eq!(order.table_id, Some(7));
        assert_eq!(order.total, 7.5);
        assert!(order.stock_deducted);
        assert_eq!(order.items[0].inventory_item_id, Some(fx.item_id));
        assert_eq!(stock_of(&pool, fx.item_id).await, 7.0);

        let movements = stock_movement::find_by_order(&pool, order.id).await.unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].reason, MovementReason::Sale);
        assert_eq!(movements[0].qty_delta, -3.0);

        // second deduction is a no-op
        assert!(!crate::ledger::deduct_stock(&pool, order.id).await.unwrap());
        assert_eq!(stock_of(&pool, fx.item_id).await, 7.0);
    }

    #[tokio::test]
    async fn cancelling_returns_stock_once() {
        let pool = test_pool().await;
        let fx = seed(&pool).await;
        let order = place_order(&pool, &images(), create("demo", fx.product_id, 2))
            .await
            .unwrap();

        let cancelled = update_status(&pool, order.id, OrderStatus::Cancelled)
            .await
            .unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert!(!cancelled.stock_deducted);
        assert_eq!(stock_of(&pool, fx.item_id).await, 10.0);

        let err = update_status(&pool, order.id, OrderStatus::Preparing)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderInvalidTransition);

        let movements = stock_movement::find_by_order(&pool, order.id).await.unwrap();
        assert_eq!(movements.len(), 2);
        let returned: f64 = movements
            .iter()
            .filter(|m| m.reason == MovementReason::Return)
            .map(|m| m.qty_delta)
            .sum();
        assert_eq!(returned, 2.0);
    }

    #[tokio::test]
    async fn lifecycle_follows_transition_table() {
        let pool = test_pool().await;
        let fx = seed(&pool).await;
        let order = place_order(&pool, &images(), create("demo", fx.product_id, 1))
            .await
            .unwrap();

        let err = update_status(&pool, order.id, OrderStatus::Delivered)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderInvalidTransition);

        for status in [
            OrderStatus::Preparing,
            OrderStatus::Delayed,
            OrderStatus::Ready,
            OrderStatus::Delivered,
        ] {
            let o = update_status(&pool, order.id, status).await.unwrap();
            assert_eq!(o.status, status);
        }
        assert_eq!(stock_of(&pool, fx.item_id).await, 9.0);

        let same = update_status(&pool, order.id, OrderStatus::Delivered)
            .await
            .unwrap();
        assert_eq!(same.status, OrderStatus::Delivered);
    }

    #[tokio::test]
    async fn rejects_hidden_unknown_and_empty() {
        let pool = test_pool().await;
        let fx = seed(&pool).await;

        let hidden = product::create(
            &pool,
            fx.store_id,
            ProductCreate {
                name: "Secreto".into(),
                category_id: None,
                inventory_item_id: None,
                description: None,
                sku: None,
                base_price: Some(4.0),
                image: None,
                image_url: None,
                is_visible: None,
                is_available: None,
            },
        )
        .await
        .unwrap();
        menu_product::link(
            &pool,
            fx.menu_id,
            &MenuProductLink {
                product_id: hidden.id,
                price_override: None,
                sort_order: None,
                is_visible: Some(false),
            },
        )
        .await
        .unwrap();

        let err = place_order(&pool, &images(), create("demo", hidden.id, 1))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductNotVisible);

        let err = place_order(&pool, &images(), create("demo", 12345, 1))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductNotFound);

        let mut empty = create("demo", fx.product_id, 1);
        empty.items.clear();
        let err = place_order(&pool, &images(), empty).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderEmpty);

        let err = place_order(&pool, &images(), create("demo", fx.product_id, 0))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderInvalidQuantity);

        let err = place_order(&pool, &images(), create("nowhere", fx.product_id, 1))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::StoreNotFound);

        assert!(recent_orders(&pool, fx.store_id, None).await.unwrap().is_empty());
        assert_eq!(stock_of(&pool, fx.item_id).await, 10.0);
    }

    #[tokio::test]
    async fn price_override_is_charged() {
        let pool = test_pool().await;
        let fx = seed(&pool).await;
        sqlx::query("UPDATE menu_product SET price_override = 2.0 WHERE menu_id = ?")
            .bind(fx.menu_id)
            .execute(&pool)
            .await
            .unwrap();

        let order = place_order(&pool, &images(), create("demo", fx.product_id, 4))
            .await
            .unwrap();
        assert_eq!(order.items[0].unit_price, 2.0);
        assert_eq!(order.total, 8.0);

        let recent = recent_orders(&pool, fx.store_id, Some(10)).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id, order.id);
    }
}
