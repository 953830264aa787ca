//! URL admission filter chain
//!
//! Every candidate URL passes the same ordered checks before it is fetched
//! (at dequeue) or appended to the queue (at link harvest). The checks are
//! total: a malformed URL is rejected, never reported as an error.

use crate::output::url_to_output_path;
use crate::state::CrawlConfig;
use crate::url::domain::url_netloc;
use std::fmt;
use std::path::Path;
use url::Url;

/// Static-asset extensions that are never fetched as pages
pub const SKIPPED_EXTENSIONS: &[&str] = &[
    ".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg", ".ico", ".pdf", ".zip", ".rar", ".7z",
    ".tar", ".gz", ".mp4", ".mp3", ".avi", ".mov", ".woff", ".woff2", ".ttf", ".eot", ".css",
    ".js",
];

/// Outcome of running a URL through the filter chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterDecision {
    /// URL passed every check
    Admit,
    /// Scheme is not http or https (or the URL does not parse)
    RejectScheme,
    /// Path ends with a static-asset extension
    RejectExtension,
    /// URL does not start with any configured URL prefix
    RejectPrefix,
    /// Path starts with a configured skip prefix
    RejectPathSkip,
    /// Host differs from the site host in domain-only mode
    RejectDomain,
    /// Output file already exists in skip-existing mode
    RejectExisting,
}

impl FilterDecision {
    /// Returns true if the URL was admitted
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admit)
    }
}

impl fmt::Display for FilterDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Admit => "admit",
            Self::RejectScheme => "reject-scheme",
            Self::RejectExtension => "reject-extension",
            Self::RejectPrefix => "reject-prefix",
            Self::RejectPathSkip => "reject-path-skip",
            Self::RejectDomain => "reject-domain",
            Self::RejectExisting => "reject-existing",
        };
        f.write_str(name)
    }
}

/// The ordered admission checks for one crawl
///
/// Order: scheme, extension, URL prefix, path skip, domain (domain-only
/// mode), existing file (skip-existing mode). The first failing check
/// decides the rejection reason.
#[derive(Debug, Clone, Copy)]
pub struct FilterChain<'a> {
    config: &'a CrawlConfig,
    site_host: &'a str,
    output_dir: &'a Path,
}

impl<'a> FilterChain<'a> {
    /// Creates a filter chain for the given crawl identity and output directory
    pub fn new(config: &'a CrawlConfig, site_host: &'a str, output_dir: &'a Path) -> Self {
        Self {
            config,
            site_host,
            output_dir,
        }
    }

    /// Runs all six checks; used when a URL is dequeued
    pub fn evaluate(&self, url: &str) -> FilterDecision {
        let decision = self.admit_link(url);
        if !decision.is_admitted() {
            return decision;
        }

        if self.config.skip_existing && url_to_output_path(url, self.output_dir).exists() {
            return FilterDecision::RejectExisting;
        }

        FilterDecision::Admit
    }

    /// Runs every check except the existing-file check; used at link harvest
    ///
    /// Existing files are only rejected at dequeue, where the visited set is
    /// the authoritative gate.
    pub fn admit_link(&self, url: &str) -> FilterDecision {
        if !has_web_scheme(url) {
            return FilterDecision::RejectScheme;
        }

        if has_skipped_extension(url) {
            return FilterDecision::RejectExtension;
        }

        if !matches_url_prefix(url, &self.config.url_prefixes) {
            return FilterDecision::RejectPrefix;
        }

        if matches_skipped_path(url, &self.config.skipped_paths) {
            return FilterDecision::RejectPathSkip;
        }

        if self.config.domain_only && !is_same_site(url, self.site_host) {
            return FilterDecision::RejectDomain;
        }

        FilterDecision::Admit
    }
}

/// Returns the raw (percent-encoded) path of a URL, or `/` if it does not parse
fn url_path(url: &str) -> String {
    Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| "/".to_string())
}

fn has_web_scheme(url: &str) -> bool {
    Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}

fn has_skipped_extension(url: &str) -> bool {
    let path = url_path(url).to_lowercase();
    SKIPPED_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// An empty prefix list admits everything; empty prefixes never match
fn matches_url_prefix(url: &str, url_prefixes: &[String]) -> bool {
    if url_prefixes.is_empty() {
        return true;
    }
    url_prefixes
        .iter()
        .filter(|prefix| !prefix.is_empty())
        .any(|prefix| url.starts_with(prefix.as_str()))
}

fn matches_skipped_path(url: &str, skipped_paths: &[String]) -> bool {
    if skipped_paths.is_empty() {
        return false;
    }

    let path = url_path(url);
    skipped_paths
        .iter()
        .map(|raw| raw.trim())
        .filter(|prefix| !prefix.is_empty())
        .any(|prefix| {
            if prefix.starts_with('/') {
                path.starts_with(prefix)
            } else {
                path.starts_with(&format!("/{}", prefix))
            }
        })
}

fn is_same_site(url: &str, site_host: &str) -> bool {
    url_netloc(url).as_deref() == Some(site_host)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config(domain_only: bool, skipped: &[&str], prefixes: &[&str], skip_existing: bool) -> CrawlConfig {
        CrawlConfig::new(
            "https://example.com/",
            domain_only,
            skipped.iter().map(|s| s.to_string()).collect(),
            prefixes.iter().map(|s| s.to_string()).collect(),
            skip_existing,
        )
        .unwrap()
    }

    #[test]
    fn test_admit_plain_page() {
        let cfg = config(false, &[], &[], false);
        let chain = FilterChain::new(&cfg, "example.com", Path::new("/tmp/unused"));
        assert_eq!(chain.evaluate("https://example.com/docs"), FilterDecision::Admit);
    }

    #[test]
    fn test_reject_non_web_scheme() {
        let cfg = config(false, &[], &[], false);
        let chain = FilterChain::new(&cfg, "example.com", Path::new("/tmp/unused"));
        assert_eq!(chain.evaluate("ftp://example.com/file"), FilterDecision::RejectScheme);
        assert_eq!(chain.evaluate("mailto:a@b.com"), FilterDecision::RejectScheme);
        assert_eq!(chain.evaluate("not a url"), FilterDecision::RejectScheme);
    }

    #[test]
    fn test_reject_extension_case_insensitive() {
        let cfg = config(false, &[], &[], false);
        let chain = FilterChain::new(&cfg, "example.com", Path::new("/tmp/unused"));
        assert_eq!(
            chain.evaluate("https://example.com/logo.PNG"),
            FilterDecision::RejectExtension
        );
        assert_eq!(
            chain.evaluate("https://example.com/app.js?v=2"),
            FilterDecision::RejectExtension
        );
        assert_eq!(chain.evaluate("https://example.com/page.php"), FilterDecision::Admit);
    }

    #[test]
    fn test_url_prefix_allow_list() {
        let cfg = config(false, &[], &["https://example.com/docs"], false);
        let chain = FilterChain::new(&cfg, "example.com", Path::new("/tmp/unused"));
        assert_eq!(chain.evaluate("https://example.com/docs/a"), FilterDecision::Admit);
        assert_eq!(
            chain.evaluate("https://example.com/blog"),
            FilterDecision::RejectPrefix
        );
    }

    #[test]
    fn test_url_prefix_only_empty_entries_rejects() {
        let cfg = config(false, &[], &[""], false);
        let chain = FilterChain::new(&cfg, "example.com", Path::new("/tmp/unused"));
        assert_eq!(
            chain.evaluate("https://example.com/docs"),
            FilterDecision::RejectPrefix
        );
    }

    #[test]
    fn test_path_skip_adds_leading_slash() {
        let cfg = config(false, &["admin", " /private "], &[], false);
        let chain = FilterChain::new(&cfg, "example.com", Path::new("/tmp/unused"));
        assert_eq!(
            chain.evaluate("https://example.com/admin/users"),
            FilterDecision::RejectPathSkip
        );
        assert_eq!(
            chain.evaluate("https://example.com/private"),
            FilterDecision::RejectPathSkip
        );
        assert_eq!(chain.evaluate("https://example.com/public"), FilterDecision::Admit);
    }

    #[test]
    fn test_domain_only() {
        let cfg = config(true, &[], &[], false);
        let chain = FilterChain::new(&cfg, "example.com", Path::new("/tmp/unused"));
        assert_eq!(
            chain.evaluate("https://other.com/page"),
            FilterDecision::RejectDomain
        );
        assert_eq!(
            chain.evaluate("https://www.example.com/page"),
            FilterDecision::RejectDomain
        );
        assert_eq!(chain.evaluate("https://example.com/page"), FilterDecision::Admit);
    }

    #[test]
    fn test_domain_ignored_without_domain_only() {
        let cfg = config(false, &[], &[], false);
        let chain = FilterChain::new(&cfg, "example.com", Path::new("/tmp/unused"));
        assert_eq!(chain.evaluate("https://other.com/page"), FilterDecision::Admit);
    }

    #[test]
    fn test_fixed_order_scheme_before_prefix() {
        let cfg = config(true, &["/x"], &["https://example.com/only"], false);
        let chain = FilterChain::new(&cfg, "example.com", Path::new("/tmp/unused"));
        // Fails extension, prefix and domain; extension is reported first
        assert_eq!(
            chain.evaluate("https://other.com/x/file.zip"),
            FilterDecision::RejectExtension
        );
        // Fails prefix, path skip and domain; prefix is reported first
        assert_eq!(
            chain.evaluate("https://other.com/x/page"),
            FilterDecision::RejectPrefix
        );
    }

    #[test]
    fn test_existing_file_only_at_dequeue() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/a.html"), "<html></html>").unwrap();

        let cfg = config(false, &[], &[], true);
        let chain = FilterChain::new(&cfg, "example.com", dir.path());
        assert_eq!(
            chain.evaluate("https://example.com/docs/a"),
            FilterDecision::RejectExisting
        );
        assert_eq!(chain.admit_link("https://example.com/docs/a"), FilterDecision::Admit);
        assert_eq!(chain.evaluate("https://example.com/docs/b"), FilterDecision::Admit);
    }

    #[test]
    fn test_existing_file_ignored_when_disabled() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();

        let cfg = config(false, &[], &[], false);
        let chain = FilterChain::new(&cfg, "example.com", dir.path());
        assert_eq!(chain.evaluate("https://example.com/"), FilterDecision::Admit);
    }

    #[test]
    fn test_decision_is_repeatable() {
        let cfg = config(true, &["admin"], &["https://example.com"], false);
        let chain = FilterChain::new(&cfg, "example.com", Path::new("/tmp/unused"));
        for url in [
            "https://example.com/admin",
            "https://example.com/a",
            "https://other.com/",
            "javascript:void(0)",
        ] {
            assert_eq!(chain.evaluate(url), chain.evaluate(url));
        }
    }
}
