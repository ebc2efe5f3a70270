//! Order Model

use serde::{Deserialize, Serialize};

use super::session::SessionType;

/// Order lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
    Delayed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Delayed => "delayed",
        }
    }

    /// Delivered and cancelled orders accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Preparing | Delayed | Cancelled)
                | (Preparing, Ready | Delayed | Cancelled)
                | (Delayed, Preparing | Ready | Cancelled)
                | (Ready, Delivered | Cancelled)
        )
    }
}

/// Order line as stored inside the order (JSON column)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    pub product_id: i64,
    /// Backing inventory item, if any (stock is deducted from it)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_item_id: Option<i64>,
    pub name: String,
    pub unit_price: f64,
    pub quantity: i32,
    pub line_total: f64,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub store_id: i64,
    pub menu_id: i64,
    pub table_id: Option<i64>,
    pub session_type: SessionType,
    pub status: OrderStatus,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub items: Vec<OrderLine>,
    pub total: f64,
    pub stock_deducted: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Requested order line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineInput {
    pub product_id: i64,
    pub quantity: i32,
}

/// Place order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub store_slug: String,
    #[serde(default)]
    pub session_type: Option<SessionType>,
    #[serde(default)]
    pub table_id: Option<i64>,
    #[serde(default)]
    pub bar_id: Option<i64>,
    pub items: Vec<OrderLineInput>,
}

/// Status change payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}
