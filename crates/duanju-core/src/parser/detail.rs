//! Detail page parser
//!
//! Detail pages carry the share link in their `<meta name="description">`
//! text, e.g. `...链接：https://pan.quark.cn/s/abc123XYZ...`. Only Quark
//! links are recognized; other providers in the same text are ignored.

use std::sync::OnceLock;

use regex::Regex;
use scraper::{Html, Selector};

/// Extracts the Quark share link from a detail page
///
/// # Arguments
/// * `html` - Raw HTML string from a detail page
///
/// # Returns
/// `Some(url)` for the first `链接：https://pan.quark.cn/s/<id>` match in the
/// description metadata, `None` if the tag or the pattern is missing
pub fn parse_pan_link(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(r#"meta[name="description"]"#).ok()?;

    let content = document
        .select(&selector)
        .next()?
        .value()
        .attr("content")?;

    extract_pan_link(content)
}

/// Applies the share-link pattern to free text
pub fn extract_pan_link(text: &str) -> Option<String> {
    static PAN_LINK: OnceLock<Option<Regex>> = OnceLock::new();
    let re = PAN_LINK
        .get_or_init(|| Regex::new(r"链接：(https://pan\.quark\.cn/s/[a-zA-Z0-9]+)").ok())
        .as_ref()?;

    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
