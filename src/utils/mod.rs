//! Utility functions and helpers.

pub mod http;

use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Return `url` with its `page` query parameter set to `page`.
pub fn with_page(url: &Url, page: usize) -> Url {
    let mut result = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "page")
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    result
        .query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair("page", &page.to_string());
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://example.com/path/").unwrap();
        assert_eq!(
            resolve_url(&base, "page.html"),
            "https://example.com/path/page.html"
        );
        assert_eq!(
            resolve_url(&base, "/root.html"),
            "https://example.com/root.html"
        );
        assert_eq!(
            resolve_url(&base, "https://other.com/x"),
            "https://other.com/x"
        );
    }

    #[test]
    fn test_with_page_appends() {
        let url = Url::parse("https://example.com/products?tab=1").unwrap();
        assert_eq!(
            with_page(&url, 2).as_str(),
            "https://example.com/products?tab=1&page=2"
        );
    }

    #[test]
    fn test_with_page_replaces_existing() {
        let url = Url::parse("https://example.com/products?page=3&tab=1").unwrap();
        assert_eq!(
            with_page(&url, 4).as_str(),
            "https://example.com/products?tab=1&page=4"
        );
    }
}
