// src/services/storefront.rs

//! Storefront scraping service.
//!
//! Drains the paginated listing endpoint into a flat sequence of listings and
//! reads per-product stock counts from detail pages, using the CSS selectors
//! from configuration.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Listing, StorefrontConfig};
use crate::services::StockSource;
use crate::utils::{http, resolve_url, with_page};

/// Selectors from [`crate::models::SelectorConfig`], parsed once.
struct ParsedSelectors {
    card: Selector,
    link: Selector,
    name: Selector,
    next: Selector,
    paragraph: Selector,
}

/// Service for scraping the storefront.
pub struct Storefront {
    config: StorefrontConfig,
    client: Client,
    selectors: ParsedSelectors,
}

impl Storefront {
    /// Create a new storefront scraper with the given configuration.
    pub fn new(config: StorefrontConfig) -> Result<Self> {
        let client = http::create_client(&config.user_agent, config.timeout_secs)?;
        let selectors = ParsedSelectors {
            card: parse_selector(&config.selectors.card)?,
            link: parse_selector(&config.selectors.link)?,
            name: parse_selector(&config.selectors.name)?,
            next: parse_selector(&config.selectors.next)?,
            paragraph: parse_selector("p")?,
        };

        Ok(Self {
            config,
            client,
            selectors,
        })
    }

    /// Drain all listing pages into one ordered sequence.
    ///
    /// Starts at page 1 and walks forward until the "next page" control is
    /// absent or disabled, or until `max_pages` is reached. Between pages a
    /// settling delay of `page_delay_ms` elapses, a courtesy to the
    /// storefront's client-side rendering.
    pub async fn drain_listings(&self) -> Result<Vec<Listing>> {
        let base = Url::parse(&self.config.listing_url)?;
        let mut all = Vec::new();
        let mut page = 1;

        loop {
            let page_url = with_page(&base, page);
            let html = self.fetch(page_url.as_str()).await?;
            let (listings, next_disabled) = self.parse_listing_page(&html, &base);

            log::info!("Found {} listings on page {}", listings.len(), page);
            all.extend(listings);

            if next_disabled {
                log::info!("No more listing pages.");
                break;
            }
            if page >= self.config.max_pages {
                log::warn!(
                    "Pagination never reported a disabled next control; stopping at {} pages.",
                    self.config.max_pages
                );
                break;
            }

            page += 1;
            if self.config.page_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.page_delay_ms)).await;
            }
        }

        Ok(all)
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::scrape(url, format!("HTTP {status}")));
        }
        Ok(response.text().await?)
    }

    /// Parse one listing page into its listings and the pagination state.
    ///
    /// Cards missing a link or a display name are dropped here, before
    /// accumulation. An absent "next page" control counts as disabled.
    fn parse_listing_page(&self, html: &str, base: &Url) -> (Vec<Listing>, bool) {
        let document = Html::parse_document(html);
        let mut listings = Vec::new();

        for card in document.select(&self.selectors.card) {
            let href = card
                .select(&self.selectors.link)
                .next()
                .and_then(|a| a.value().attr("href"));
            let name = card
                .select(&self.selectors.name)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string());

            if let (Some(href), Some(name)) = (href, name) {
                if !href.is_empty() && !name.is_empty() {
                    listings.push(Listing {
                        link: resolve_url(base, href),
                        join_key: name,
                    });
                }
            }
        }

        let next_disabled = match document.select(&self.selectors.next).next() {
            Some(next) => next.value().attr("disabled").is_some(),
            None => true,
        };

        (listings, next_disabled)
    }

    /// Extract the stock quantity from detail-page HTML.
    ///
    /// Looks for the first paragraph whose text contains `Stock:`, strips all
    /// non-digit characters and parses the rest. Missing or unparseable stock
    /// text yields 0; this is a best-effort read against markup we don't
    /// control.
    fn extract_stock(&self, html: &str) -> u32 {
        let document = Html::parse_document(html);

        document
            .select(&self.selectors.paragraph)
            .map(|p| p.text().collect::<String>())
            .find(|text| text.contains("Stock:"))
            .map(|text| {
                let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
                digits.parse().unwrap_or(0)
            })
            .unwrap_or(0)
    }
}

#[async_trait]
impl StockSource for Storefront {
    async fn stock_quantity(&self, link: &str) -> Result<u32> {
        let html = self.fetch(link).await?;
        Ok(self.extract_stock(&html))
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
