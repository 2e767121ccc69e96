//! Search results parser
//!
//! Mirror sites share no stable markup, so the listing is read loosely:
//! every anchor with an `href` is a candidate and the link shape decides
//! whether it points at a detail page.

use std::sync::OnceLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::{DuanjuError, Result};
use crate::types::Candidate;
use crate::url::is_detail_link;

/// Parses a results page and returns detail-page candidates in document order
///
/// # Arguments
/// * `html` - Raw HTML string from a search results page
///
/// # Returns
/// Vector of [`Candidate`], empty if the page holds no detail links
///
/// # Errors
/// Returns `ParseError` if the anchor selector cannot be built
pub fn parse_search_results(html: &str) -> Result<Vec<Candidate>> {
    let document = Html::parse_document(html);

    let link_selector = Selector::parse("a[href]")
        .map_err(|e| DuanjuError::ParseError(format!("Invalid selector: {:?}", e)))?;

    Ok(document
        .select(&link_selector)
        .filter_map(|element| parse_candidate(&element))
        .collect())
}

fn parse_candidate(element: &ElementRef) -> Option<Candidate> {
    let href = element.value().attr("href")?;
    if !is_detail_link(href) {
        return None;
    }

    let title = element.value().attr("title").unwrap_or_default();

    Some(Candidate {
        title: strip_bold_markup(title),
        href: href.to_string(),
    })
}

/// Removes `<strong>` / `</strong>` remnants left in `title` attributes
/// by the sites' keyword highlighting
fn strip_bold_markup(title: &str) -> String {
    static STRONG: OnceLock<Option<Regex>> = OnceLock::new();
    match STRONG.get_or_init(|| Regex::new(r"</?strong>").ok()) {
        Some(re) => re.replace_all(title, "").into_owned(),
        None => title.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_html() {
        let html = "<html><body></body></html>";
        let results = parse_search_results(html).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_parse_search_results_keeps_detail_links() {
        let html = r#"
        <html>
        <body>
            <nav>
                <a href="/">首页</a>
                <a href="https://a80.35240.com/list.php">分类</a>
            </nav>
            <ul class="list">
                <li><a href="https://a80.35240.com/view.php?id=101" title="<strong>总裁</strong>的逆袭">总裁的逆袭</a></li>
                <li><a href="https://a80.35240.com/view.php?id=102" title="重生之<strong>总裁</strong>归来">重生之总裁归来</a></li>
            </ul>
        </body>
        </html>
        "#;

        let results = parse_search_results(html).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "总裁的逆袭");
        assert_eq!(results[0].href, "https://a80.35240.com/view.php?id=101");
        assert_eq!(results[1].title, "重生之总裁归来");
    }

    #[test]
    fn test_relative_detail_links_are_skipped() {
        let html = r#"
        <html><body>
            <a href="/view.php?id=5" title="relative">relative</a>
            <a href="https://b.21410.com/view.php?id=6" title="absolute">absolute</a>
        </body></html>
        "#;

        let results = parse_search_results(html).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "absolute");
    }

    #[test]
    fn test_missing_title_attribute_gives_empty_title() {
        let html = r#"<html><body><a href="https://b.21410.com/view.php?id=6">x</a></body></html>"#;

        let results = parse_search_results(html).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "");
    }

    #[test]
    fn test_anchor_without_href_is_ignored() {
        let html = r#"<html><body><a name="top" title="id=1">top</a></body></html>"#;

        let results = parse_search_results(html).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_strip_bold_markup() {
        assert_eq!(strip_bold_markup("<strong>a</strong>b<strong>c</strong>"), "abc");
        assert_eq!(strip_bold_markup("plain"), "plain");
    }
}
