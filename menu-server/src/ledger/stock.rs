//! Stock ledger
//!
//! Every change to `inventory_item.current_stock` is paired with an appended
//! `stock_movement` row inside the same transaction.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{MovementReason, Order, StockAdjustment, StockMovement};
use shared::util::{now_millis, snowflake_id};
use sqlx::{SqliteConnection, SqlitePool};

use crate::db::repository::{RepoError, inventory_item, order, stock_movement};

pub const DEFAULT_MOVEMENT_LIMIT: i64 = 100;
pub const MAX_MOVEMENT_LIMIT: i64 = 500;

/// Deduct stock for an order, once
///
/// Returns false when the order was already deducted.
pub async fn deduct_stock(pool: &SqlitePool, order_id: i64) -> AppResult<bool> {
    let mut tx = pool.begin().await.map_err(RepoError::from)?;
    let order = order::find_by_id(&mut *tx, order_id)
        .await?
        .ok_or_else(|| order_not_found(order_id))?;
    let deducted = deduct_in(&mut tx, &order, now_millis()).await?;
    tx.commit().await.map_err(RepoError::from)?;
    Ok(deducted)
}

/// Sale movements for every inventory-backed line
pub(crate) async fn deduct_in(conn: &mut SqliteConnection, order: &Order, now: i64) -> AppResult<bool> {
    if !order::mark_stock_deducted(conn, order.id, true, now).await? {
        tracing::debug!(order_id = order.id, "Stock already deducted");
        return Ok(false);
    }
    let moved = write_movements(conn, order, MovementReason::Sale, -1.0, now).await?;
    tracing::info!(order_id = order.id, lines = moved, "Stock deducted");
    Ok(true)
}

/// Return movements undoing a previous deduction
pub(crate) async fn restock_in(conn: &mut SqliteConnection, order: &Order, now: i64) -> AppResult<bool> {
    if !order::mark_stock_deducted(conn, order.id, false, now).await? {
        return Ok(false);
    }
    let moved = write_movements(conn, order, MovementReason::Return, 1.0, now).await?;
    tracing::info!(order_id = order.id, lines = moved, "Stock returned");
    Ok(true)
}

async fn write_movements(
    conn: &mut SqliteConnection,
    order: &Order,
    reason: MovementReason,
    sign: f64,
    now: i64,
) -> AppResult<usize> {
    let mut moved = 0;
    for line in &order.items {
        let Some(item_id) = line.inventory_item_id else {
            continue;
        };
        let delta = sign * f64::from(line.quantity);
        match inventory_item::apply_stock_delta(conn, item_id, delta).await {
            Ok(()) => {}
            Err(RepoError::NotFound(_)) => {
                tracing::warn!(
                    order_id = order.id,
                    inventory_item_id = item_id,
                    "Inventory item gone, skipping stock movement"
                );
                continue;
            }
            Err(e) => return Err(e.into()),
        }
        stock_movement::insert(
            conn,
            &StockMovement {
                id: snowflake_id(),
                inventory_item_id: item_id,
                qty_delta: delta,
                reason,
                order_id: Some(order.id),
                created_at: now,
            },
        )
        .await?;
        moved += 1;
    }
    Ok(moved)
}

/// Record a manual stock movement
pub async fn adjust_stock(
    pool: &SqlitePool,
    inventory_item_id: i64,
    data: StockAdjustment,
) -> AppResult<StockMovement> {
    if !data.reason.is_manual() {
        return Err(AppError::with_message(
            ErrorCode::StockInvalidReason,
            format!("'{}' movements are written by orders", data.reason.as_str()),
        )
        .with_detail("reason", data.reason.as_str()));
    }
    if !data.qty_delta.is_finite() || data.qty_delta == 0.0 {
        return Err(AppError::with_message(
            ErrorCode::StockInvalidQuantity,
            "qty_delta must be a non-zero finite number",
        ));
    }

    let mut tx = pool.begin().await.map_err(RepoError::from)?;
    if inventory_item::find_by_id(&mut *tx, inventory_item_id)
        .await?
        .is_none()
    {
        return Err(item_not_found(inventory_item_id));
    }

    let movement = StockMovement {
        id: snowflake_id(),
        inventory_item_id,
        qty_delta: data.qty_delta,
        reason: data.reason,
        order_id: None,
        created_at: now_millis(),
    };
    inventory_item::apply_stock_delta(&mut tx, inventory_item_id, movement.qty_delta).await?;
    stock_movement::insert(&mut tx, &movement).await?;
    tx.commit().await.map_err(RepoError::from)?;

    tracing::info!(
        inventory_item_id,
        qty_delta = movement.qty_delta,
        reason = movement.reason.as_str(),
        "Stock adjusted"
    );
    Ok(movement)
}

/// Ledger of one item, newest first
pub async fn list_movements(
    pool: &SqlitePool,
    inventory_item_id: i64,
    limit: Option<i64>,
) -> AppResult<Vec<StockMovement>> {
    if inventory_item::find_by_id(pool, inventory_item_id)
        .await?
        .is_none()
    {
        return Err(item_not_found(inventory_item_id));
    }
    let limit = limit
        .unwrap_or(DEFAULT_MOVEMENT_LIMIT)
        .clamp(1, MAX_MOVEMENT_LIMIT);
    Ok(stock_movement::find_by_item(pool, inventory_item_id, limit).await?)
}

pub(crate) fn order_not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
        .with_detail("id", id)
}

fn item_not_found(id: i64) -> AppError {
    AppError::with_message(
        ErrorCode::InventoryItemNotFound,
        format!("Inventory item {id} not found"),
    )
    .with_detail("id", id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;
    use crate::ledger::fixtures::{images, seed};
    use crate::ledger::orders::place_order;
    use shared::models::{OrderCreate, OrderLineInput};

    #[tokio::test]
    async fn manual_adjustment_moves_stock_and_appends() {
        let pool = test_pool().await;
        let fx = seed(&pool).await;

        let m = adjust_stock(
            &pool,
            fx.item_id,
            StockAdjustment {
                qty_delta: 24.0,
                reason: MovementReason::Purchase,
            },
        )
        .await
        .unwrap();
        assert_eq!(m.order_id, None);

        let item = inventory_item::find_by_id(&pool, fx.item_id).await.unwrap().unwrap();
        assert_eq!(item.current_stock, 34.0);

        let ledger = list_movements(&pool, fx.item_id, None).await.unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].reason, MovementReason::Purchase);
    }

    #[tokio::test]
    async fn invalid_adjustments_are_rejected() {
        let pool = test_pool().await;
        let fx = seed(&pool).await;

        let err = adjust_stock(
            &pool,
            fx.item_id,
            StockAdjustment {
                qty_delta: 0.0,
                reason: MovementReason::Waste,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::StockInvalidQuantity);

        let err = adjust_stock(
            &pool,
            fx.item_id,
            StockAdjustment {
                qty_delta: -1.0,
                reason: MovementReason::Sale,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::StockInvalidReason);

        let err = adjust_stock(
            &pool,
            fx.item_id + 1,
            StockAdjustment {
                qty_delta: 1.0,
                reason: MovementReason::ManualAdjustment,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InventoryItemNotFound);

        let item = inventory_item::find_by_id(&pool, fx.item_id).await.unwrap().unwrap();
        assert_eq!(item.current_stock, 10.0);
    }

    #[tokio::test]
    async fn movements_of_unknown_item_is_not_found() {
        let pool = test_pool().await;
        let err = list_movements(&pool, 42, Some(10)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InventoryItemNotFound);
    }

    #[tokio::test]
    async fn movement_ids_are_issued_like_any_other_id() {
        let pool = test_pool().await;
        let fx = seed(&pool).await;
        let line = OrderLineInput {
            product_id: fx.product_id,
            quantity: 1,
        };
        let order = place_order(
            &pool,
            &images(),
            OrderCreate {
                store_slug: "demo".into(),
                session_type: None,
                table_id: None,
                bar_id: None,
                items: vec![line.clone(), line.clone(), line],
            },
        )
        .await
        .unwrap();

        let movements = stock_movement::find_by_order(&pool, order.id).await.unwrap();
        assert_eq!(movements.len(), 3);
        let max = movements.iter().map(|m| m.id).max().unwrap();
        // later ids never fall inside the range a deduction already used
        assert!(snowflake_id() > max);
    }
}
