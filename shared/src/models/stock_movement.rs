//! Stock movement ledger entry

use serde::{Deserialize, Serialize};

/// Why stock moved
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum MovementReason {
    Sale,
    Return,
    Purchase,
    ManualAdjustment,
    Waste,
}

impl MovementReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::Return => "return",
            Self::Purchase => "purchase",
            Self::ManualAdjustment => "manual_adjustment",
            Self::Waste => "waste",
        }
    }

    /// Reasons an operator may record by hand (sale/return come from orders)
    pub fn is_manual(&self) -> bool {
        matches!(self, Self::Purchase | Self::ManualAdjustment | Self::Waste)
    }
}

/// Stock movement entity (append-only)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct StockMovement {
    pub id: i64,
    pub inventory_item_id: i64,
    pub qty_delta: f64,
    pub reason: MovementReason,
    pub order_id: Option<i64>,
    pub created_at: i64,
}

/// Manual stock adjustment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAdjustment {
    pub qty_delta: f64,
    pub reason: MovementReason,
}
