//! URL helper functions for mirror endpoints
//!
//! Provides normalization of discovered endpoints and builders for
//! search URLs.

/// Path segment every search endpoint ends with
pub const SEARCH_PATH: &str = "search.php";

/// Prefixes a scheme-less short link with `http://`
///
/// # Example
/// ```
/// use duanju_core::url::with_scheme;
/// assert_eq!(with_scheme("A80.CC"), "http://A80.CC");
/// assert_eq!(with_scheme("https://a80.cc"), "https://a80.cc");
/// ```
pub fn with_scheme(short_url: &str) -> String {
    if short_url.starts_with("http") {
        short_url.to_string()
    } else {
        format!("http://{}", short_url)
    }
}

/// Makes a resolved URL point at the search script
///
/// Appends `search.php`, inserting a `/` separator when the URL lacks one.
/// URLs that already end with `search.php` are returned unchanged.
///
/// # Example
/// ```
/// use duanju_core::url::normalize_endpoint;
/// assert_eq!(normalize_endpoint("https://a80.35240.com"), "https://a80.35240.com/search.php");
/// assert_eq!(normalize_endpoint("https://a80.35240.com/"), "https://a80.35240.com/search.php");
/// ```
pub fn normalize_endpoint(url: &str) -> String {
    if url.ends_with(SEARCH_PATH) {
        url.to_string()
    } else if url.ends_with('/') {
        format!("{}{}", url, SEARCH_PATH)
    } else {
        format!("{}/{}", url, SEARCH_PATH)
    }
}

/// Comparison key for endpoint membership: trailing slashes stripped
pub fn endpoint_key(url: &str) -> &str {
    url.trim_end_matches('/')
}

/// Builds the search URL for a keyword on a given endpoint
///
/// # Example
/// ```
/// use duanju_core::url::build_search_url;
/// let url = build_search_url("https://b.21410.com/search.php", "总裁 归来");
/// assert_eq!(url, "https://b.21410.com/search.php?q=%E6%80%BB%E8%A3%81%20%E5%BD%92%E6%9D%A5");
/// ```
pub fn build_search_url(endpoint: &str, keyword: &str) -> String {
    format!("{}?q={}", endpoint, urlencoding::encode(keyword))
}

/// Whether an anchor `href` looks like a detail page
///
/// Absolute http(s) links carrying an `id=` query marker; everything
/// else on a results page is navigation.
pub fn is_detail_link(href: &str) -> bool {
    (href.starts_with("http://") || href.starts_with("https://")) && href.contains("id=")
}
