// src/services/mod.rs

//! External collaborators: the inventory API and the storefront.
//!
//! The reconciliation pipeline only sees the two narrow traits below; the
//! concrete HTTP-backed clients live in the submodules.

pub mod inventory;
pub mod storefront;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Product;

// Re-export for convenience
pub use inventory::InventoryApi;
pub use storefront::Storefront;

/// Read access to per-product stock levels on the storefront.
#[async_trait]
pub trait StockSource: Send + Sync {
    /// Fetch the detail page at `link` and extract its stock quantity.
    ///
    /// Extraction misses yield 0; only the fetch itself can fail.
    async fn stock_quantity(&self, link: &str) -> Result<u32>;
}

/// Write access to inventory records.
#[async_trait]
pub trait InventoryWriter: Send + Sync {
    /// Replace the record identified by `product.id` with `product`.
    async fn update_product(&self, product: &Product) -> Result<()>;
}
