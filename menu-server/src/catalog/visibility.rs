//! Catalog Visibility Filter
//!
//! Expands a menu's links into purchasable entries. An entry is shown only
//! when every flag on its path agrees: the link, the product, the backing
//! inventory item, the owning category and (optionally) stock.

use std::collections::HashMap;

use shared::models::{CatalogEntry, Category, InventoryItem, MenuProduct, Product, Store};

use super::bridge::{Bridge, canonical};
use super::image::{ImageCandidates, ImagePolicy};

/// Everything the filter reads, already loaded for one store
pub struct CatalogSource<'a> {
    pub store: &'a Store,
    pub links: &'a [MenuProduct],
    pub products: &'a HashMap<i64, Product>,
    pub items: &'a HashMap<i64, InventoryItem>,
    pub categories: &'a HashMap<i64, Category>,
    pub bridge: &'a Bridge,
}

/// Why a link produced no entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hidden {
    MissingProduct,
    LinkHidden,
    ProductHidden,
    InventoryHidden,
    CategoryHidden,
    OutOfStock,
}

pub fn expand(source: &CatalogSource<'_>, images: &ImagePolicy) -> Vec<CatalogEntry> {
    let mut entries: Vec<CatalogEntry> = source
        .links
        .iter()
        .filter_map(|link| entry_for(source, link, images).ok())
        .collect();
    entries.sort_by(|a, b| {
        a.sort_order
            .cmp(&b.sort_order)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.product_id.cmp(&b.product_id))
    });
    entries
}

/// Build the entry for one link, or say why it is hidden
pub fn entry_for(
    source: &CatalogSource<'_>,
    link: &MenuProduct,
    images: &ImagePolicy,
) -> Result<CatalogEntry, Hidden> {
    let product = source
        .products
        .get(&link.product_id)
        .filter(|p| p.store_id == source.store.id)
        .ok_or(Hidden::MissingProduct)?;

    if !link.is_visible {
        return Err(Hidden::LinkHidden);
    }
    if !(product.is_visible && product.is_active && product.is_available) {
        return Err(Hidden::ProductHidden);
    }

    let item = source
        .bridge
        .match_for(product.id)
        .and_then(|m| source.items.get(&m.inventory_item_id));
    if let Some(item) = item
        && !item.is_menu_visible
    {
        return Err(Hidden::InventoryHidden);
    }

    let canonical = canonical(product, item);
    if let Some(category_id) = canonical.category_id {
        let shown = source
            .categories
            .get(&category_id)
            .is_some_and(|c| c.is_menu_visible && c.is_active);
        if !shown {
            return Err(Hidden::CategoryHidden);
        }
    }

    if source.store.settings.hide_out_of_stock
        && canonical.stock.is_some_and(|stock| stock <= 0.0)
    {
        return Err(Hidden::OutOfStock);
    }

    let override_price = link.price_override.filter(|p| p.is_finite() && *p >= 0.0);
    let (image_url, image_source) = images.resolve(
        ImageCandidates {
            product_image_url: product.image_url.as_deref(),
            product_image: product.image.as_deref(),
            inventory_image_url: item.and_then(|i| i.image_url.as_deref()),
        },
        &source.store.theme,
    );

    Ok(CatalogEntry {
        product_id: product.id,
        inventory_item_id: canonical.inventory_item_id,
        name: canonical.name,
        description: canonical.description,
        price: override_price.unwrap_or(canonical.price),
        price_overridden: override_price.is_some(),
        image_url,
        image_source,
        category_name: canonical
            .category_id
            .and_then(|id| source.categories.get(&id))
            .map(|c| c.name.clone()),
        category_id: canonical.category_id,
        stock: canonical.stock,
        sort_order: link.sort_order,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{ImageSource, StoreSettings, StoreTheme};

    struct Fixture {
        store: Store,
        links: Vec<MenuProduct>,
        products: HashMap<i64, Product>,
        items: HashMap<i64, InventoryItem>,
        categories: HashMap<i64, Category>,
    }

    impl Fixture {
        fn new() -> Self {
            let store = Store {
                id: 1,
                slug: "demo".into(),
                name: "Demo".into(),
                theme: StoreTheme::default(),
                settings: StoreSettings::default(),
                is_active: true,
                created_at: 0,
            };
            let category = Category {
                id: 50,
                store_id: 1,
                name: "Bebidas".into(),
                sort_order: 0,
                is_menu_visible: true,
                is_active: true,
            };
            let item = InventoryItem {
                id: 20,
                store_id: 1,
                category_id: Some(50),
                name: "Cerveza".into(),
                sku: None,
                price: 3.0,
                image_url: Some("products/cerveza.jpg".into()),
                is_menu_visible: true,
                current_stock: 5.0,
                unit: None,
                created_at: 0,
            };
            let product = Product {
                id: 10,
                store_id: 1,
                category_id: None,
                inventory_item_id: Some(20),
                name: "Cerveza".into(),
                description: None,
                sku: None,
                base_price: 0.0,
                image: None,
                image_url: None,
                is_visible: true,
                is_active: true,
                is_available: true,
                created_at: 0,
            };
            let link = MenuProduct {
                id: 1,
                menu_id: 7,
                product_id: 10,
                price_override: None,
                sort_order: 0,
                is_visible: true,
            };
            Self {
                store,
                links: vec![link],
                products: HashMap::from([(10, product)]),
                items: HashMap::from([(20, item)]),
                categories: HashMap::from([(50, category)]),
            }
        }

        fn run(&self) -> Vec<CatalogEntry> {
            let products: Vec<Product> = self.products.values().cloned().collect();
            let items: Vec<InventoryItem> = self.items.values().cloned().collect();
            let bridge = Bridge::build(self.store.id, &products, &items);
            let source = CatalogSource {
                store: &self.store,
                links: &self.links,
                products: &self.products,
                items: &self.items,
                categories: &self.categories,
                bridge: &bridge,
            };
            expand(&source, &ImagePolicy::new(None, "https://images.unsplash.com/p.jpg"))
        }
    }

    #[test]
    fn visible_entry_uses_canonical_fields() {
        let entries = Fixture::new().run();
        assert_eq!(entries.len(), 1);
        let e = &entries[0];
        assert_eq!(e.price, 3.0);
        assert!(!e.price_overridden);
        assert_eq!(e.category_id, Some(50));
        assert_eq!(e.category_name.as_deref(), Some("Bebidas"));
        assert_eq!(e.stock, Some(5.0));
        assert_eq!(e.image_source, ImageSource::InventoryImageUrl);
        assert_eq!(e.image_url.as_deref(), Some("products/cerveza.jpg"));
    }

    #[test]
    fn any_false_flag_hides_the_entry() {
        let cases: Vec<Box<dyn Fn(&mut Fixture)>> = vec![
            Box::new(|f| f.links[0].is_visible = false),
            Box::new(|f| f.products.get_mut(&10).unwrap().is_visible = false),
            Box::new(|f| f.products.get_mut(&10).unwrap().is_active = false),
            Box::new(|f| f.products.get_mut(&10).unwrap().is_available = false),
            Box::new(|f| f.items.get_mut(&20).unwrap().is_menu_visible = false),
            Box::new(|f| f.categories.get_mut(&50).unwrap().is_menu_visible = false),
            Box::new(|f| f.categories.get_mut(&50).unwrap().is_active = false),
        ];
        for (i, break_flag) in cases.iter().enumerate() {
            let mut fixture = Fixture::new();
            break_flag(&mut fixture);
            assert!(fixture.run().is_empty(), "case {i} should hide the entry");
        }
    }

    #[test]
    fn out_of_stock_only_hidden_when_enabled() {
        let mut f = Fixture::new();
        f.items.get_mut(&20).unwrap().current_stock = 0.0;
        assert_eq!(f.run().len(), 1);
        f.store.settings.hide_out_of_stock = true;
        assert!(f.run().is_empty());
    }

    #[test]
    fn price_override_wins() {
        let mut f = Fixture::new();
        f.links[0].price_override = Some(2.5);
        let e = &f.run()[0];
        assert_eq!(e.price, 2.5);
        assert!(e.price_overridden);
    }

    #[test]
    fn foreign_product_is_skipped() {
        let mut f = Fixture::new();
        f.products.get_mut(&10).unwrap().store_id = 2;
        assert!(f.run().is_empty());
    }

    #[test]
    fn ordered_by_sort_order_then_name_then_id() {
        let mut f = Fixture::new();
        let base = f.products[&10].clone();
        for (id, name, order) in [(11, "Agua", 1), (12, "Zumo", 0), (13, "agua", 1)] {
            let mut p = base.clone();
            p.id = id;
            p.name = name.into();
            p.inventory_item_id = None;
            f.products.insert(id, p);
            f.links.push(MenuProduct {
                id,
                menu_id: 7,
                product_id: id,
                price_override: Some(1.0),
                sort_order: order,
                is_visible: true,
            });
        }
        let names: Vec<(i64, String)> = f.run().into_iter().map(|e| (e.product_id, e.name)).collect();
        assert_eq!(
            names,
            vec![
                (10, "Cerveza".to_string()),
                (12, "Zumo".to_string()),
                (11, "Agua".to_string()),
                (13, "agua".to_string()),
            ]
        );
    }
}
