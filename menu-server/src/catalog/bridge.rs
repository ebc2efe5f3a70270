//! Inventory ↔ Product bridge
//!
//! Pairs each product with at most one inventory item of the same store and
//! derives the canonical record the catalog shows. Explicit links win; the
//! heuristic strategies only apply to unlinked products (or products whose
//! explicit link is dangling, which is reported) and report every ambiguous
//! key instead of guessing.

use std::collections::{HashMap, HashSet};

use shared::models::{
    AmbiguousMatch, BridgeMatch, BrokenLink, InventoryItem, MatchStrategy, Product,
    ReconciliationReport,
};

/// Name/price/category/stock shown for a product
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category_id: Option<i64>,
    pub stock: Option<f64>,
    pub inventory_item_id: Option<i64>,
}

/// Result of matching a store's products against its inventory
#[derive(Debug, Clone, Default)]
pub struct Bridge {
    matches: HashMap<i64, BridgeMatch>,
    report: ReconciliationReport,
}

impl Bridge {
    pub fn build(store_id: i64, products: &[Product], items: &[InventoryItem]) -> Self {
        let items: Vec<&InventoryItem> = items.iter().filter(|i| i.store_id == store_id).collect();
        let by_id: HashMap<i64, &InventoryItem> = items.iter().map(|i| (i.id, *i)).collect();
        let by_sku = index(&items, |i| i.sku.as_deref().map(normalize_key));
        let by_name = index(&items, |i| Some(i.name.clone()));
        let by_name_ci = index(&items, |i| Some(normalize_key(&i.name)));

        let mut report = ReconciliationReport {
            store_id,
            ..Default::default()
        };
        let mut matches = HashMap::new();

        for product in products.iter().filter(|p| p.store_id == store_id) {
            if let Some(item_id) = product.inventory_item_id
                && !by_id.contains_key(&item_id)
            {
                tracing::debug!(
                    product_id = product.id,
                    inventory_item_id = item_id,
                    "Explicit inventory link points outside the store"
                );
                report.broken_links.push(BrokenLink {
                    product_id: product.id,
                    inventory_item_id: item_id,
                });
            }
            let found = match_product(
                product,
                &items,
                &by_id,
                &by_sku,
                &by_name,
                &by_name_ci,
                &mut report.ambiguous,
            );
            match found {
                Some((item_id, strategy)) => {
                    matches.insert(
                        product.id,
                        BridgeMatch {
                            product_id: product.id,
                            inventory_item_id: item_id,
                            strategy,
                        },
                    );
                }
                None => report.unmatched_products.push(product.id),
            }
        }

        let used: HashSet<i64> = matches.values().map(|m| m.inventory_item_id).collect();
        report.orphan_inventory_items = items
            .iter()
            .map(|i| i.id)
            .filter(|id| !used.contains(id))
            .collect();
        report.matches = matches.values().cloned().collect();
        report.matches.sort_by_key(|m| m.product_id);
        report.unmatched_products.sort_unstable();
        report.orphan_inventory_items.sort_unstable();
        report.broken_links.sort_by_key(|b| b.product_id);

        Self { matches, report }
    }

    pub fn match_for(&self, product_id: i64) -> Option<&BridgeMatch> {
        self.matches.get(&product_id)
    }

    pub fn report(&self) -> &ReconciliationReport {
        &self.report
    }
}

/// Merge a product with its backing item (if any)
pub fn canonical(product: &Product, item: Option<&InventoryItem>) -> CanonicalProduct {
    let price = if product.base_price > 0.0 {
        product.base_price
    } else {
        item.map(|i| i.price).unwrap_or(product.base_price)
    };
    CanonicalProduct {
        name: product.name.clone(),
        description: product.description.clone(),
        price,
        category_id: item.and_then(|i| i.category_id).or(product.category_id),
        stock: item.map(|i| i.current_stock),
        inventory_item_id: item.map(|i| i.id),
    }
}

/// Trimmed, lowercase key
pub fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}

fn index<F>(items: &[&InventoryItem], key: F) -> HashMap<String, Vec<i64>>
where
    F: Fn(&InventoryItem) -> Option<String>,
{
    let mut map: HashMap<String, Vec<i64>> = HashMap::new();
    for item in items {
        if let Some(k) = key(item)
            && !k.trim().is_empty()
        {
            map.entry(k).or_default().push(item.id);
        }
    }
    map
}

fn match_product(
    product: &Product,
    items: &[&InventoryItem],
    by_id: &HashMap<i64, &InventoryItem>,
    by_sku: &HashMap<String, Vec<i64>>,
    by_name: &HashMap<String, Vec<i64>>,
    by_name_ci: &HashMap<String, Vec<i64>>,
    ambiguous: &mut Vec<AmbiguousMatch>,
) -> Option<(i64, MatchStrategy)> {
    if let Some(item_id) = product.inventory_item_id
        && by_id.contains_key(&item_id)
    {
        return Some((item_id, MatchStrategy::ExplicitLink));
    }

    let mut keyed = |strategy: MatchStrategy, key: Option<String>, map: &HashMap<String, Vec<i64>>| {
        let key = key.filter(|k| !k.trim().is_empty())?;
        let ids = map.get(&key)?;
        if ids.len() == 1 {
            return Some((ids[0], strategy));
        }
        ambiguous.push(AmbiguousMatch {
            product_id: product.id,
            strategy,
            key,
            candidates: ids.clone(),
        });
        None
    };

    if let Some(found) = keyed(MatchStrategy::Sku, product.sku.as_deref().map(normalize_key), by_sku) {
        return Some(found);
    }
    if let Some(found) = keyed(MatchStrategy::ExactName, Some(product.name.clone()), by_name) {
        return Some(found);
    }
    if let Some(found) = keyed(
        MatchStrategy::CaseInsensitiveName,
        Some(normalize_key(&product.name)),
        by_name_ci,
    ) {
        return Some(found);
    }

    let name = normalize_key(&product.name);
    if name.is_empty() {
        return None;
    }
    let partial: Vec<i64> = items
        .iter()
        .filter(|i| {
            let other = normalize_key(&i.name);
            !other.is_empty() && (other.contains(&name) || name.contains(&other))
        })
        .map(|i| i.id)
        .collect();
    match partial.len() {
        0 => None,
        1 => Some((partial[0], MatchStrategy::PartialName)),
        _ => {
            ambiguous.push(AmbiguousMatch {
                product_id: product.id,
                strategy: MatchStrategy::PartialName,
                key: name,
                candidates: partial,
            });
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, name: &str) -> Product {
        Product {
            id,
            store_id: 1,
            category_id: Some(100),
            inventory_item_id: None,
            name: name.into(),
            description: Some(format!("{name} desc")),
            sku: None,
            base_price: 0.0,
            image: None,
            image_url: None,
            is_visible: true,
            is_active: true,
            is_available: true,
            created_at: 0,
        }
    }

    fn item(id: i64, name: &str) -> InventoryItem {
        InventoryItem {
            id,
            store_id: 1,
            category_id: Some(200),
            name: name.into(),
            sku: None,
            price: 4.5,
            image_url: None,
            is_menu_visible: true,
            current_stock: 12.0,
            unit: None,
            created_at: 0,
        }
    }

    #[test]
    fn explicit_link_beats_heuristics() {
        let mut p = product(1, "Café con leche");
        p.inventory_item_id = Some(11);
        let items = vec![item(10, "Café con leche"), item(11, "Cafe grande")];
        let bridge = Bridge::build(1, &[p], &items);
        let m = bridge.match_for(1).unwrap();
        assert_eq!(m.inventory_item_id, 11);
        assert_eq!(m.strategy, MatchStrategy::ExplicitLink);
        assert_eq!(bridge.report().orphan_inventory_items, vec![10]);
    }

    #[test]
    fn strategies_in_order() {
        let mut by_sku = product(1, "Nothing alike");
        by_sku.sku = Some(" CRV-01 ".into());
        let exact = product(2, "Tostada");
        let ci = product(3, "  zumo de NARANJA ");
        let partial = product(4, "Croquetas");

        let mut sku_item = item(10, "Cerveza");
        sku_item.sku = Some("crv-01".into());
        let items = vec![
            sku_item,
            item(11, "Tostada"),
            item(12, "Zumo de naranja"),
            item(13, "Croquetas de jamón"),
        ];
        let bridge = Bridge::build(1, &[by_sku, exact, ci, partial], &items);

        let strategy = |id| bridge.match_for(id).map(|m| (m.inventory_item_id, m.strategy));
        assert_eq!(strategy(1), Some((10, MatchStrategy::Sku)));
        assert_eq!(strategy(2), Some((11, MatchStrategy::ExactName)));
        assert_eq!(strategy(3), Some((12, MatchStrategy::CaseInsensitiveName)));
        assert_eq!(strategy(4), Some((13, MatchStrategy::PartialName)));
        assert!(bridge.report().unmatched_products.is_empty());
        assert!(bridge.report().orphan_inventory_items.is_empty());
    }

    #[test]
    fn ambiguous_keys_are_skipped_and_reported() {
        let p = product(1, "Agua");
        let items = vec![item(10, "Agua"), item(11, "Agua"), item(12, "Agua con gas")];
        let bridge = Bridge::build(1, &[p], &items);
        assert!(bridge.match_for(1).is_none());
        let report = bridge.report();
        assert_eq!(report.unmatched_products, vec![1]);
        assert!(report.ambiguous.iter().any(|a| a.strategy == MatchStrategy::ExactName
            && a.candidates == vec![10, 11]));
        assert!(report.ambiguous.iter().any(|a| a.strategy == MatchStrategy::PartialName));
        assert_eq!(report.orphan_inventory_items, vec![10, 11, 12]);
    }

    #[test]
    fn dangling_explicit_link_is_reported() {
        let mut missing = product(1, "Tostada");
        missing.inventory_item_id = Some(99);
        let mut foreign_link = product(2, "Nada parecido");
        foreign_link.inventory_item_id = Some(20);
        let mut foreign = item(20, "Otra tienda");
        foreign.store_id = 2;

        let bridge = Bridge::build(1, &[missing, foreign_link], &[item(10, "Tostada"), foreign]);
        let report = bridge.report();
        assert_eq!(
            report.broken_links,
            vec![
                BrokenLink { product_id: 1, inventory_item_id: 99 },
                BrokenLink { product_id: 2, inventory_item_id: 20 },
            ]
        );
        // still matched by name
        assert_eq!(
            bridge.match_for(1).map(|m| m.strategy),
            Some(MatchStrategy::ExactName)
        );
        assert!(bridge.match_for(2).is_none());
    }

    #[test]
    fn other_store_items_are_ignored() {
        let p = product(1, "Tostada");
        let mut foreign = item(10, "Tostada");
        foreign.store_id = 2;
        let bridge = Bridge::build(1, &[p], &[foreign]);
        assert!(bridge.match_for(1).is_none());
        assert!(bridge.report().orphan_inventory_items.is_empty());
    }

    #[test]
    fn canonical_record_merges_fields() {
        let mut p = product(1, "Tostada");
        let i = item(10, "TOSTADA");
        let c = canonical(&p, Some(&i));
        assert_eq!(c.name, "Tostada");
        assert_eq!(c.price, 4.5);
        assert_eq!(c.category_id, Some(200));
        assert_eq!(c.stock, Some(12.0));
        assert_eq!(c.inventory_item_id, Some(10));

        p.base_price = 3.0;
        assert_eq!(canonical(&p, Some(&i)).price, 3.0);

        let c = canonical(&p, None);
        assert_eq!(c.category_id, Some(100));
        assert!(c.stock.is_none());
    }
}
