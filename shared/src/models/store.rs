//! Store Model

use serde::{Deserialize, Serialize};

/// Menu layout on the customer-facing page
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    #[default]
    Grid,
    List,
}

/// Display/theme configuration (stored as JSON)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreTheme {
    #[serde(default = "default_accent")]
    pub accent_color: String,
    #[serde(default = "default_background")]
    pub background_color: String,
    #[serde(default)]
    pub layout_mode: LayoutMode,
    /// When false the catalog carries no image URLs at all
    #[serde(default = "default_true")]
    pub show_images: bool,
    /// Store-level image used before the global placeholder
    #[serde(default)]
    pub default_image_url: Option<String>,
}

impl Default for StoreTheme {
    fn default() -> Self {
        Self {
            accent_color: default_accent(),
            background_color: default_background(),
            layout_mode: LayoutMode::default(),
            show_images: true,
            default_image_url: None,
        }
    }
}

/// Catalog behaviour switches (stored as JSON)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoreSettings {
    /// Drop inventory-backed entries whose stock is not positive
    #[serde(default)]
    pub hide_out_of_stock: bool,
}

fn default_accent() -> String {
    "#36e27b".to_string()
}

fn default_background() -> String {
    "#0a0b09".to_string()
}

fn default_true() -> bool {
    true
}

/// Store entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Store {
    pub id: i64,
    pub slug: String,
    pub name: String,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub theme: StoreTheme,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub settings: StoreSettings,
    pub is_active: bool,
    pub created_at: i64,
}

/// Create store payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreCreate {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub theme: Option<StoreTheme>,
    #[serde(default)]
    pub settings: Option<StoreSettings>,
}
