//! Pipeline entry points for sync operations.
//!
//! - `reconcile`: join scraped listings against inventory records and emit updates
//! - `run_sync`: full run, from authentication to the completion summary

pub mod reconcile;
pub mod sync;

pub use reconcile::{build_join_index, reconcile, ReconcileOutcome};
pub use sync::run_sync;
