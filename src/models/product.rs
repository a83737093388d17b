//! Inventory product data structure.

use serde::{Deserialize, Serialize};

/// Which product attribute a scraped listing is matched on.
///
/// The two sync variants differ only in the join key and the way detail-page
/// URLs are built; a run uses exactly one mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinMode {
    /// Match on the product's display name (`character`).
    Character,
    /// Match on the storefront reference id (`treasureBoxRefId`).
    RefId,
}

/// A product record owned by the inventory API.
///
/// Only the fields the pipeline reads are typed; everything else the API
/// returns is kept in `extra` so that updates replace the full record
/// without dropping fields we don't know about.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Stable unique identifier
    pub id: i64,

    /// Display name used as join key in [`JoinMode::Character`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<String>,

    /// Storefront reference id used as join key in [`JoinMode::RefId`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treasure_box_ref_id: Option<String>,

    /// Current stock quantity
    #[serde(default)]
    pub quantity_stock: u32,

    /// All remaining fields, carried through untouched on update
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Product {
    /// The join key for the given mode, if this product carries one.
    pub fn join_key(&self, mode: JoinMode) -> Option<&str> {
        match mode {
            JoinMode::Character => self.character.as_deref(),
            JoinMode::RefId => self.treasure_box_ref_id.as_deref(),
        }
    }

    /// Build the update request: a full copy of this record with only
    /// `quantity_stock` replaced by the freshly observed value.
    pub fn with_stock(&self, quantity_stock: u32) -> Product {
        Product {
            quantity_stock,
            ..self.clone()
        }
    }
}
