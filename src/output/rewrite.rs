//! Anchor `href` rewriting
//!
//! The page is parsed with `scraper`, every `<a href>` value is replaced in
//! the tree, and the document is serialized back to HTML. Text inside raw
//! and escapable text elements (`script`, `style`, `textarea`, `title`) is
//! never mistaken for markup.

use scraper::node::Node;
use scraper::{Html, Selector};

/// Rewrites the `href` value of every `<a>` element in `html`
///
/// The callback receives the entity-decoded attribute value and returns the
/// replacement, which is escaped again on serialization. The returned
/// document is the parsed page re-serialized, so implied elements such as
/// `<html>` and `<body>` are present even if the input omitted them.
///
/// # Examples
///
/// ```
/// use site_mirror::output::rewrite_anchor_hrefs;
///
/// let html = r#"<p><a class="x" href="/a">A</a><img src="/a"></p>"#;
/// let out = rewrite_anchor_hrefs(html, |href| format!("{}.html", href.trim_start_matches('/')));
/// assert!(out.contains(r#"<a class="x" href="a.html">A</a><img src="/a">"#));
/// ```
pub fn rewrite_anchor_hrefs<F>(html: &str, mut rewrite: F) -> String
where
    F: FnMut(&str) -> String,
{
    let Ok(selector) = Selector::parse("a[href]") else {
        return html.to_string();
    };

    let mut document = Html::parse_document(html);

    let replacements: Vec<_> = document
        .select(&selector)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            let replaced = rewrite(href);
            (replaced != href).then(|| (anchor.id(), replaced))
        })
        .collect();

    for (id, replaced) in replacements {
        let Some(mut node) = document.tree.get_mut(id) else {
            continue;
        };
        if let Node::Element(element) = node.value() {
            for (name, value) in element.attrs.iter_mut() {
                if &*name.local == "href" {
                    *value = replaced.as_str().into();
                }
            }
        }
    }

    document.html()
}
