//! Resolved catalog types
//!
//! Output of menu resolution, the visibility filter and the
//! inventory/product bridge. Not persisted.

use serde::{Deserialize, Serialize};

use super::menu::Menu;

/// Why a menu was (or was not) selected
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionReason {
    /// An enabled manual override rule forced this menu
    ManualOverride,
    /// Every active rule of the menu matched the context
    RuleMatch,
    /// Non-fallback menu without rules
    Unconditional,
    /// Nothing matched, the fallback menu is served
    Fallback,
    /// The store has no servable menu
    NoMenu,
}

/// Result of menu resolution. `menu == None` is a valid outcome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuResolution {
    pub menu: Option<Menu>,
    pub reason: ResolutionReason,
    /// Set when several menus were equally eligible (e.g. two fallbacks)
    #[serde(default)]
    pub ambiguous: bool,
    /// Context rules matched by the selected menu
    #[serde(default)]
    pub matched_rules: usize,
}

impl MenuResolution {
    pub fn none() -> Self {
        Self {
            menu: None,
            reason: ResolutionReason::NoMenu,
            ambiguous: false,
            matched_rules: 0,
        }
    }

    pub fn menu_id(&self) -> Option<i64> {
        self.menu.as_ref().map(|m| m.id)
    }
}

/// Where the effective image came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ImageSource {
    ProductImageUrl,
    ProductImage,
    InventoryImageUrl,
    StoreDefault,
    Placeholder,
    /// Images are switched off for the store
    Disabled,
}

/// A purchasable entry of a resolved menu
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    pub product_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory_item_id: Option<i64>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Effective price (menu override or canonical price)
    pub price: f64,
    pub price_overridden: bool,
    pub image_url: Option<String>,
    pub image_source: ImageSource,
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    /// Stock of the backing inventory item
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<f64>,
    pub sort_order: i32,
}

/// Resolution plus expansion for one store/context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreCatalog {
    pub store_id: i64,
    pub store_slug: String,
    pub resolution: MenuResolution,
    pub entries: Vec<CatalogEntry>,
}

/// Strategy that paired a product with an inventory item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    ExplicitLink,
    Sku,
    ExactName,
    CaseInsensitiveName,
    PartialName,
}

/// Product ↔ inventory pairing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BridgeMatch {
    pub product_id: i64,
    pub inventory_item_id: i64,
    pub strategy: MatchStrategy,
}

/// A product whose key maps to several inventory items
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AmbiguousMatch {
    pub product_id: i64,
    pub strategy: MatchStrategy,
    pub key: String,
    pub candidates: Vec<i64>,
}

/// Explicit `inventory_item_id` that names no inventory item of the store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BrokenLink {
    pub product_id: i64,
    pub inventory_item_id: i64,
}

/// Product/inventory reconciliation for a store
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReconciliationReport {
    pub store_id: i64,
    pub matches: Vec<BridgeMatch>,
    pub unmatched_products: Vec<i64>,
    pub orphan_inventory_items: Vec<i64>,
    pub ambiguous: Vec<AmbiguousMatch>,
    /// Products whose explicit link is dangling; they still go through the
    /// heuristic strategies
    #[serde(default)]
    pub broken_links: Vec<BrokenLink>,
}
