//! Menu ↔ Product link

use serde::{Deserialize, Serialize};

/// Menu product link entity. `(menu_id, product_id)` is unique.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MenuProduct {
    pub id: i64,
    pub menu_id: i64,
    pub product_id: i64,
    /// Replaces the canonical price on this menu only
    pub price_override: Option<f64>,
    pub sort_order: i32,
    pub is_visible: bool,
}

/// Link product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuProductLink {
    pub product_id: i64,
    pub price_override: Option<f64>,
    pub sort_order: Option<i32>,
    pub is_visible: Option<bool>,
}

/// Result of linking every store product to a menu
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkAllResult {
    pub linked: usize,
    /// Existing links switched back to visible
    pub made_visible: usize,
    pub unchanged: usize,
}
