// src/pipeline/sync.rs

//! Full sync run: authenticate, fetch inventory, drain listings, reconcile.

use chrono::Utc;

use crate::error::Result;
use crate::models::{Config, Credentials, JoinMode, Listing, Product};
use crate::pipeline::reconcile::{build_join_index, reconcile, ReconcileOutcome};
use crate::services::{InventoryApi, Storefront};

/// Run the sync pipeline end to end.
///
/// Authentication and the inventory fetch are fail-fast preconditions:
/// nothing is scraped until both have succeeded.
pub async fn run_sync(
    config: &Config,
    credentials: &Credentials,
    mode: JoinMode,
) -> Result<ReconcileOutcome> {
    let started = Utc::now();

    log::info!("Signing in to the inventory API...");
    let api = InventoryApi::sign_in(&config.api, credentials).await?;
    log::info!("Authentication successful.");

    log::info!("Fetching products from the inventory API...");
    let products = api.fetch_products().await?;
    log::info!("Fetched {} products.", products.len());

    let storefront = Storefront::new(config.storefront.clone())?;

    let listings = match mode {
        JoinMode::Character => {
            log::info!("Draining storefront listings...");
            storefront.drain_listings().await?
        }
        // Reference ids come from the inventory itself; one listing per
        // product that carries one, in inventory order.
        JoinMode::RefId => ref_id_listings(&products, &config.storefront.detail_url_prefix),
    };
    log::info!("{} listings to reconcile.", listings.len());

    let index = build_join_index(products, mode);
    log::info!("Join index holds {} records.", index.len());

    let outcome = reconcile(&listings, &index, &storefront, &api).await?;

    let elapsed = Utc::now().signed_duration_since(started);
    log::info!(
        "Sync complete in {}s: {} listings, {} matched, {} updated, {} unmatched, {} failed.",
        elapsed.num_seconds(),
        outcome.listings,
        outcome.matched,
        outcome.updated,
        outcome.unmatched,
        outcome.update_failures,
    );

    Ok(outcome)
}

/// Derive listings from the products' storefront reference ids.
fn ref_id_listings(products: &[Product], detail_url_prefix: &str) -> Vec<Listing> {
    products
        .iter()
        .filter_map(|product| product.treasure_box_ref_id.as_deref())
        .map(|ref_id| Listing {
            link: format!("{detail_url_prefix}{ref_id}"),
            join_key: ref_id.to_string(),
        })
        .collect()
}
