//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub store_id: i64,
    pub category_id: Option<i64>,
    /// Explicit link to the backing inventory item
    pub inventory_item_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub base_price: f64,
    /// Legacy image column
    pub image: Option<String>,
    pub image_url: Option<String>,
    pub is_visible: bool,
    pub is_active: bool,
    pub is_available: bool,
    pub created_at: i64,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub category_id: Option<i64>,
    pub inventory_item_id: Option<i64>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub base_price: Option<f64>,
    pub image: Option<String>,
    pub image_url: Option<String>,
    pub is_visible: Option<bool>,
    pub is_available: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_payload_accepts_only_a_name() {
        let data: ProductCreate = serde_json::from_str(r#"{"name":"Tortilla"}"#).unwrap();
        assert_eq!(data.name, "Tortilla");
        assert!(data.inventory_item_id.is_none());
        assert!(data.base_price.is_none());
    }

    #[test]
    fn product_is_reachable_from_models() {
        let json = serde_json::json!({
            "id": 1, "store_id": 2, "category_id": null, "inventory_item_id": 3,
            "name": "Café", "description": null, "sku": "CAF-1", "base_price": 1.2,
            "image": null, "image_url": null, "is_visible": true, "is_active": true,
            "is_available": true, "created_at": 0
        });
        let product: crate::models::Product = serde_json::from_value(json).unwrap();
        assert_eq!(product.inventory_item_id, Some(3));
    }
}
