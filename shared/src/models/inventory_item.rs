//! Inventory Item Model
//!
//! Stock-bearing record. Products may point at one through
//! `Product::inventory_item_id`.

use serde::{Deserialize, Serialize};

/// Inventory item entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct InventoryItem {
    pub id: i64,
    pub store_id: i64,
    pub category_id: Option<i64>,
    pub name: String,
    pub sku: Option<String>,
    pub price: f64,
    pub image_url: Option<String>,
    pub is_menu_visible: bool,
    pub current_stock: f64,
    pub unit: Option<String>,
    pub created_at: i64,
}

/// Create inventory item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItemCreate {
    pub name: String,
    pub category_id: Option<i64>,
    pub sku: Option<String>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub is_menu_visible: Option<bool>,
    pub current_stock: Option<f64>,
    pub unit: Option<String>,
}
