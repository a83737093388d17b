// src/models/mod.rs

//! Domain models for the sync application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod listing;
mod product;

// Re-export all public types
pub use config::{ApiConfig, Config, Credentials, SelectorConfig, StorefrontConfig};
pub use listing::Listing;
pub use product::{JoinMode, Product};
