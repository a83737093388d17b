// src/pipeline/reconcile.rs

//! The reconciliation core: joins listings against inventory records and
//! submits one stock update per match.

use std::collections::HashMap;

use crate::error::Result;
use crate::models::{JoinMode, Listing, Product};
use crate::services::{InventoryWriter, StockSource};

/// Summary of a reconciliation run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Listings processed, in drain order
    pub listings: usize,
    /// Listings whose join key matched an inventory record
    pub matched: usize,
    /// Updates accepted by the inventory API
    pub updated: usize,
    /// Listings with no matching inventory record
    pub unmatched: usize,
    /// Updates rejected by the inventory API
    pub update_failures: usize,
}

/// Build the join index from the full inventory set.
///
/// Products lacking the selected key are excluded. Duplicate keys collapse
/// silently, later record wins; the upstream data gives no uniqueness
/// guarantee, so strict duplicate handling is a non-goal here.
pub fn build_join_index(products: Vec<Product>, mode: JoinMode) -> HashMap<String, Product> {
    let mut index = HashMap::new();
    for product in products {
        if let Some(key) = product.join_key(mode) {
            index.insert(key.to_string(), product);
        }
    }
    index
}

/// Reconcile listings against the join index.
///
/// Processing order is drain order, one listing at a time, with no
/// overlapping writes. The join happens before any detail-page fetch, so
/// unmatched listings cost nothing. A rejected update is logged with the
/// offending id and the loop continues; a failed detail-page fetch aborts
/// the run.
pub async fn reconcile(
    listings: &[Listing],
    index: &HashMap<String, Product>,
    source: &dyn StockSource,
    writer: &dyn InventoryWriter,
) -> Result<ReconcileOutcome> {
    let mut outcome = ReconcileOutcome {
        listings: listings.len(),
        ..ReconcileOutcome::default()
    };

    for listing in listings {
        let Some(product) = index.get(&listing.join_key) else {
            log::debug!("No inventory match for '{}', skipping.", listing.join_key);
            outcome.unmatched += 1;
            continue;
        };
        outcome.matched += 1;

        let quantity_stock = source.stock_quantity(&listing.link).await?;
        let update = product.with_stock(quantity_stock);

        match writer.update_product(&update).await {
            Ok(()) => {
                log::info!("Updated product {} with stock {}.", update.id, quantity_stock);
                outcome.updated += 1;
            }
            Err(error) => {
                log::warn!("Failed to update product {}: {}", update.id, error);
                outcome.update_failures += 1;
            }
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::error::AppError;

    /// Stock source serving canned quantities and counting fetches.
    struct FakeSource {
        stock: HashMap<String, u32>,
        fetches: Mutex<Vec<String>>,
    }

    impl FakeSource {
        fn new(stock: &[(&str, u32)]) -> Self {
            Self {
                stock: stock
                    .iter()
                    .map(|(k, v)| (k.to_string(), *v))
                    .collect(),
                fetches: Mutex::new(Vec::new()),
            }
        }

        fn fetch_count(&self) -> usize {
            self.fetches.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl StockSource for FakeSource {
        async fn stock_quantity(&self, link: &str) -> Result<u32> {
            self.fetches.lock().unwrap().push(link.to_string());
            Ok(self.stock.get(link).copied().unwrap_or(0))
        }
    }

    /// Inventory writer recording every attempted update.
    struct FakeWriter {
        updates: Mutex<Vec<Product>>,
        fail_ids: HashSet<i64>,
    }

    impl FakeWriter {
        fn new() -> Self {
            Self {
                updates: Mutex::new(Vec::new()),
                fail_ids: HashSet::new(),
            }
        }

        fn failing_for(ids: &[i64]) -> Self {
            Self {
                updates: Mutex::new(Vec::new()),
                fail_ids: ids.iter().copied().collect(),
            }
        }

        fn updates(&self) -> Vec<Product> {
            self.updates.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl InventoryWriter for FakeWriter {
        async fn update_product(&self, product: &Product) -> Result<()> {
            self.updates.lock().unwrap().push(product.clone());
            if self.fail_ids.contains(&product.id) {
                return Err(AppError::api(
                    format!("update product {}", product.id),
                    "HTTP 500",
                ));
            }
            Ok(())
        }
    }

    fn product(id: i64, character: &str, stock: u32) -> Product {
        serde_json::from_value(json!({
            "id": id,
            "character": character,
            "quantityStock": stock,
            "name": format!("{character} Figure"),
        }))
        .unwrap()
    }

    fn listing(link: &str, key: &str) -> Listing {
        Listing {
            link: link.to_string(),
            join_key: key.to_string(),
        }
    }

    #[test]
    fn test_join_index_collapses_duplicates_last_wins() {
        let products = vec![
            product(1, "Luffy", 5),
            product(2, "Zoro", 3),
            product(3, "Luffy", 9),
        ];
        let index = build_join_index(products, JoinMode::Character);

        assert_eq!(index.len(), 2);
        assert_eq!(index["Luffy"].id, 3);
    }

    #[test]
    fn test_join_index_excludes_keyless_products() {
        let with_ref: Product = serde_json::from_value(json!({
            "id": 1,
            "treasureBoxRefId": "tb-001",
            "quantityStock": 2,
        }))
        .unwrap();
        let without_ref = product(2, "Zoro", 3);

        let index = build_join_index(vec![with_ref, without_ref], JoinMode::RefId);
        assert_eq!(index.len(), 1);
        assert!(index.contains_key("tb-001"));
    }

    #[tokio::test]
    async fn test_matched_listing_emits_one_update() {
        let index = build_join_index(vec![product(1, "Luffy", 5)], JoinMode::Character);
        let listings = vec![listing("/p/1", "Luffy")];
        let source = FakeSource::new(&[("/p/1", 12)]);
        let writer = FakeWriter::new();

        let outcome = reconcile(&listings, &index, &source, &writer)
            .await
            .unwrap();

        assert_eq!(outcome.matched, 1);
        assert_eq!(outcome.updated, 1);
        assert_eq!(outcome.unmatched, 0);

        let updates = writer.updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].id, 1);
        assert_eq!(updates[0].quantity_stock, 12);
        // All other fields carried forward
        assert_eq!(updates[0].character.as_deref(), Some("Luffy"));
        assert_eq!(updates[0].extra["name"], "Luffy Figure");
    }

    #[tokio::test]
    async fn test_unmatched_listing_costs_nothing() {
        let index = build_join_index(vec![product(1, "Luffy", 5)], JoinMode::Character);
        let listings = vec![listing("/p/1", "Luffy"), listing("/p/2", "Zoro")];
        let source = FakeSource::new(&[("/p/1", 12)]);
        let writer = FakeWriter::new();

        let outcome = reconcile(&listings, &index, &source, &writer)
            .await
            .unwrap();

        assert_eq!(outcome.matched, 1);
        assert_eq!(outcome.unmatched, 1);
        // Detail fetch count equals match count
        assert_eq!(source.fetch_count(), 1);
        assert_eq!(writer.updates().len(), 1);
    }

    #[tokio::test]
    async fn test_zero_stock_still_writes() {
        let index = build_join_index(vec![product(1, "Luffy", 5)], JoinMode::Character);
        let listings = vec![listing("/p/1", "Luffy")];
        // Source has no entry for the link: extraction fell back to 0
        let source = FakeSource::new(&[]);
        let writer = FakeWriter::new();

        let outcome = reconcile(&listings, &index, &source, &writer)
            .await
            .unwrap();

        assert_eq!(outcome.updated, 1);
        assert_eq!(writer.updates()[0].quantity_stock, 0);
    }

    #[tokio::test]
    async fn test_update_failure_does_not_abort_loop() {
        let index = build_join_index(
            vec![product(1, "Luffy", 5), product(2, "Zoro", 3)],
            JoinMode::Character,
        );
        let listings = vec![listing("/p/1", "Luffy"), listing("/p/2", "Zoro")];
        let source = FakeSource::new(&[("/p/1", 4), ("/p/2", 6)]);
        let writer = FakeWriter::failing_for(&[1]);

        let outcome = reconcile(&listings, &index, &source, &writer)
            .await
            .unwrap();

        assert_eq!(outcome.update_failures, 1);
        assert_eq!(outcome.updated, 1);
        // Both updates were attempted, in drain order
        let ids: Vec<i64> = writer.updates().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_duplicate_listing_keys_write_in_drain_order() {
        let index = build_join_index(vec![product(1, "Luffy", 5)], JoinMode::Character);
        let listings = vec![listing("/p/1", "Luffy"), listing("/p/1b", "Luffy")];
        let source = FakeSource::new(&[("/p/1", 4), ("/p/1b", 9)]);
        let writer = FakeWriter::new();

        reconcile(&listings, &index, &source, &writer)
            .await
            .unwrap();

        // Each update is an independent write; the last processed wins
        let stocks: Vec<u32> = writer.updates().iter().map(|p| p.quantity_stock).collect();
        assert_eq!(stocks, vec![4, 9]);
    }
}
