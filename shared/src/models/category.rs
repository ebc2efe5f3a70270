//! Category Model

use serde::{Deserialize, Serialize};

/// Category entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub store_id: i64,
    pub name: String,
    pub sort_order: i32,
    /// Whether entries of this category appear on customer menus
    #[serde(default = "default_true")]
    pub is_menu_visible: bool,
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    pub sort_order: Option<i32>,
    pub is_menu_visible: Option<bool>,
}
