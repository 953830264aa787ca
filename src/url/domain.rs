use url::Url;

/// Returns the network location of a URL: its host plus an explicit port
///
/// Default ports are omitted by the `url` crate, so `https://example.com:443/`
/// and `https://example.com/` share the network location `example.com`.
/// The host is compared verbatim; no `www.` or subdomain folding happens.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_mirror::url::netloc;
///
/// let url = Url::parse("https://example.com/path").unwrap();
/// assert_eq!(netloc(&url), "example.com");
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(netloc(&url), "127.0.0.1:8080");
/// ```
pub fn netloc(url: &Url) -> String {
    let host = url.host_str().unwrap_or("");
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

/// Parses `url` and returns its network location, or `None` if it does not parse
pub fn url_netloc(url: &str) -> Option<String> {
    Url::parse(url).ok().map(|u| netloc(&u))
}
