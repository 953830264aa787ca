//! HTML link extraction
//!
//! Only `<a href>` targets are harvested; stylesheets, scripts and images
//! are never followed.

use scraper::{Html, Selector};
use url::Url;

/// Returns the raw `href` value of every anchor in document order
///
/// Values are trimmed and empty ones are omitted. No filtering or
/// resolution is done here.
///
/// # Example
///
/// ```
/// use site_mirror::crawler::extract_anchor_hrefs;
///
/// let html = r#"<a href="/a">A</a><a>no href</a><a href="">empty</a><a href="b#x">B</a>"#;
/// assert_eq!(extract_anchor_hrefs(html), vec!["/a", "b#x"]);
/// ```
pub fn extract_anchor_hrefs(html: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolves `href` against `base`, as a browser reports `anchor.href`
pub fn resolve_href(base: &Url, href: &str) -> Option<String> {
    base.join(href).ok().map(|u| u.to_string())
}

/// Resolves every href against `base`; unresolvable ones are kept raw
pub fn resolve_hrefs(base: &Url, hrefs: Vec<String>) -> Vec<String> {
    hrefs
        .into_iter()
        .map(|href| resolve_href(base, &href).unwrap_or(href))
        .collect()
}
