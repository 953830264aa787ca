//! URL to filesystem path mapping
//!
//! Pages are stored under the output root by URL path with the extension
//! forced to `.html`, so the same URL always lands on the same file no
//! matter when it was crawled. Links between pages are rewritten into
//! relative paths between those files.

use crate::url::{netloc, normalize_url};
use std::path::{Component, Path, PathBuf};
use url::Url;

/// Link prefixes that are never rewritten
const PASSTHROUGH_PREFIXES: &[&str] = &["#", "mailto:", "tel:", "javascript:"];

/// Converts an absolute URL into the HTML file path it is stored under
///
/// Only the URL path is used: leading and trailing slashes are stripped, an
/// empty path maps to `index.html`, and any other path keeps its directory
/// layout with the final extension replaced by `html`. URLs that do not
/// parse map to `index.html`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use site_mirror::output::url_to_output_path;
///
/// let root = Path::new("offline");
/// assert_eq!(url_to_output_path("https://example.com/", root), root.join("index.html"));
/// assert_eq!(url_to_output_path("https://example.com/a/b", root), root.join("a").join("b.html"));
/// assert_eq!(url_to_output_path("https://example.com/a/b.php", root), root.join("a").join("b.html"));
/// ```
pub fn url_to_output_path(url: &str, output_root: &Path) -> PathBuf {
    let path = Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_default();

    let segments: Vec<&str> = path
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect();

    let Some((last, parents)) = segments.split_last() else {
        return output_root.join("index.html");
    };

    let mut output = output_root.to_path_buf();
    for parent in parents {
        output.push(parent);
    }
    output.push(Path::new(last).with_extension("html"));
    output
}

/// Rewrites a hyperlink found on `current_url` for offline browsing
///
/// Same-site links become paths relative to the directory of the current
/// page's output file, using `/` separators, with any fragment carried over.
/// Everything else is returned unchanged:
///
/// - empty links and `#`, `mailto:`, `tel:`, `javascript:` links
/// - links with an explicit non-http(s) scheme
/// - links whose explicit or resolved host differs from `site_host`
/// - links that cannot be resolved against `current_url`
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use site_mirror::output::rewrite_link;
///
/// let root = Path::new("offline");
/// let page = "https://example.com/docs/intro";
/// assert_eq!(rewrite_link(page, "/docs/setup#install", root, "example.com"), "setup.html#install");
/// assert_eq!(rewrite_link(page, "/", root, "example.com"), "../index.html");
/// assert_eq!(rewrite_link(page, "mailto:a@b.com", root, "example.com"), "mailto:a@b.com");
/// ```
pub fn rewrite_link(current_url: &str, raw_link: &str, output_root: &Path, site_host: &str) -> String {
    let raw = raw_link.trim();
    if raw.is_empty() || PASSTHROUGH_PREFIXES.iter().any(|p| raw.starts_with(p)) {
        return raw_link.to_string();
    }

    match Url::parse(raw) {
        Ok(explicit) => {
            if !matches!(explicit.scheme(), "http" | "https") || netloc(&explicit) != site_host {
                return raw_link.to_string();
            }
        }
        Err(url::ParseError::RelativeUrlWithoutBase) => {}
        Err(_) => return raw_link.to_string(),
    }

    let target = match Url::parse(current_url).and_then(|base| base.join(raw)) {
        Ok(target) => target,
        Err(_) => return raw_link.to_string(),
    };

    if netloc(&target) != site_host {
        return raw_link.to_string();
    }

    let current_path = url_to_output_path(&normalize_url(current_url), output_root);
    let target_path = url_to_output_path(&normalize_url(target.as_str()), output_root);
    let current_dir = current_path.parent().unwrap_or(output_root);
    let relative = relative_posix_path(current_dir, &target_path);

    match target.fragment() {
        Some(fragment) if !fragment.is_empty() => format!("{}#{}", relative, fragment),
        _ => relative,
    }
}

/// Lexical relative path from directory `from` to `to`, joined with `/`
fn relative_posix_path(from: &Path, to: &Path) -> String {
    let from: Vec<Component> = from.components().collect();
    let to: Vec<Component> = to.components().collect();

    let common = from
        .iter()
        .zip(to.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = vec!["..".to_string(); from.len() - common];
    parts.extend(
        to[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}
