/// Normalizes a URL by stripping its fragment identifier
///
/// This is the only normalization applied to crawl URLs. Scheme, host,
/// trailing slashes and query strings are left exactly as they are, so two
/// URLs are considered the same page only when they differ by fragment alone.
///
/// # Examples
///
/// ```
/// use site_mirror::url::normalize_url;
///
/// assert_eq!(normalize_url("https://example.com/page#section"), "https://example.com/page");
/// assert_eq!(normalize_url("https://example.com/page/"), "https://example.com/page/");
/// ```
pub fn normalize_url(url: &str) -> String {
    match url.split_once('#') {
        Some((base, _)) => base.to_string(),
        None => url.to_string(),
    }
}
