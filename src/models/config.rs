//! Application configuration structures.

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Inventory API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Storefront scraping settings
    #[serde(default)]
    pub storefront: StorefrontConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(AppError::config("api.base_url is empty"));
        }
        if self.api.timeout_secs == 0 {
            return Err(AppError::config("api.timeout_secs must be > 0"));
        }
        if self.storefront.listing_url.trim().is_empty() {
            return Err(AppError::config("storefront.listing_url is empty"));
        }
        if self.storefront.detail_url_prefix.trim().is_empty() {
            return Err(AppError::config("storefront.detail_url_prefix is empty"));
        }
        if self.storefront.user_agent.trim().is_empty() {
            return Err(AppError::config("storefront.user_agent is empty"));
        }
        if self.storefront.timeout_secs == 0 {
            return Err(AppError::config("storefront.timeout_secs must be > 0"));
        }
        if self.storefront.max_pages == 0 {
            return Err(AppError::config("storefront.max_pages must be > 0"));
        }
        Ok(())
    }
}

/// Inventory API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the inventory API, with trailing slash
    #[serde(default = "defaults::api_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::api_base_url(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Storefront scraping behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Listing endpoint with the stock-status filter query parameters
    #[serde(default = "defaults::listing_url")]
    pub listing_url: String,

    /// Prefix the reference id is appended to for detail pages
    #[serde(default = "defaults::detail_url_prefix")]
    pub detail_url_prefix: String,

    /// User-Agent header for storefront requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Settling delay between listing pages in milliseconds
    #[serde(default = "defaults::page_delay")]
    pub page_delay_ms: u64,

    /// Upper bound on listing pages walked in one drain
    #[serde(default = "defaults::max_pages")]
    pub max_pages: usize,

    /// CSS selectors for the listing markup
    #[serde(default)]
    pub selectors: SelectorConfig,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            listing_url: defaults::listing_url(),
            detail_url_prefix: defaults::detail_url_prefix(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            page_delay_ms: defaults::page_delay(),
            max_pages: defaults::max_pages(),
            selectors: SelectorConfig::default(),
        }
    }
}

/// CSS selectors for storefront listing pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// One product card in the listing grid
    #[serde(default = "defaults::card_selector")]
    pub card: String,

    /// Detail-page link within a card
    #[serde(default = "defaults::link_selector")]
    pub link: String,

    /// Display name within a card
    #[serde(default = "defaults::name_selector")]
    pub name: String,

    /// The "next page" pagination control
    #[serde(default = "defaults::next_selector")]
    pub next: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            card: defaults::card_selector(),
            link: defaults::link_selector(),
            name: defaults::name_selector(),
            next: defaults::next_selector(),
        }
    }
}

/// Inventory API account credentials.
///
/// Supplied only through the process environment, never through the config
/// file.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Read credentials from the `EMAIL` and `PASSWORD` environment variables.
    pub fn from_env() -> Result<Self> {
        let email = env::var("EMAIL")
            .map_err(|_| AppError::config("EMAIL environment variable is not set"))?;
        let password = env::var("PASSWORD")
            .map_err(|_| AppError::config("PASSWORD environment variable is not set"))?;
        Ok(Self { email, password })
    }
}

/// Default configuration values.
mod defaults {
    pub fn api_base_url() -> String {
        "https://staging.api.unfoldstore.com.br/v1/".to_string()
    }

    pub fn listing_url() -> String {
        "https://store.treasureboxjapan.com/products?preOrder=true&inStock=undefined&outOfStock=undefined&preOwned=undefined&tab=1"
            .to_string()
    }

    pub fn detail_url_prefix() -> String {
        "https://store.treasureboxjapan.com/details?product=".to_string()
    }

    pub fn user_agent() -> String {
        format!("stocksync/{}", env!("CARGO_PKG_VERSION"))
    }

    pub fn timeout() -> u64 {
        30
    }

    pub fn page_delay() -> u64 {
        2000
    }

    pub fn max_pages() -> usize {
        200
    }

    pub fn card_selector() -> String {
        "div.css-5w95k > div.css-0".to_string()
    }

    pub fn link_selector() -> String {
        "a".to_string()
    }

    pub fn name_selector() -> String {
        "div.css-182w6d6 > p:first-child".to_string()
    }

    pub fn next_selector() -> String {
        r#"[aria-label="Go to next page"]"#.to_string()
    }
}
