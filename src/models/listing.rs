//! Scraped listing data structure.

/// One storefront entry scraped from a listing page.
///
/// A listing only exists when both the link and the join key were present in
/// the page; cards missing either are dropped before accumulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// Absolute URL of the product detail page
    pub link: String,

    /// Key the listing is matched on (display name or reference id)
    pub join_key: String,
}
