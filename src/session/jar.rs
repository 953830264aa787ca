//! Conversion of a stored session into a request cookie store

use super::{Session, SessionCookie};
use chrono::Utc;
use reqwest::cookie::Jar;
use tracing::debug;
use url::Url;

impl Session {
    /// Builds a cookie jar holding every unexpired cookie of the session
    ///
    /// Cookies whose domain starts with a dot are added as domain cookies
    /// (matching subdomains); all others are host-only.
    pub fn cookie_jar(&self) -> Jar {
        let jar = Jar::default();
        let now = Utc::now().timestamp() as f64;

        for cookie in &self.cookies {
            if cookie.is_expired(now) {
                debug!("Skipping expired cookie {} for {}", cookie.name, cookie.domain);
                continue;
            }

            match origin_url(cookie) {
                Some(url) => jar.add_cookie_str(&set_cookie_line(cookie), &url),
                None => debug!("Skipping cookie {} with unusable domain '{}'", cookie.name, cookie.domain),
            }
        }

        jar
    }
}

/// The URL a cookie is attributed to when it is added to the jar
fn origin_url(cookie: &SessionCookie) -> Option<Url> {
    let host = cookie.domain.trim_start_matches('.');
    if host.is_empty() {
        return None;
    }

    let scheme = if cookie.secure { "https" } else { "http" };
    let path = if cookie.path.starts_with('/') {
        cookie.path.as_str()
    } else {
        "/"
    };

    Url::parse(&format!("{}://{}{}", scheme, host, path)).ok()
}

/// Renders a cookie as a `Set-Cookie` header value
fn set_cookie_line(cookie: &SessionCookie) -> String {
    let mut line = format!("{}={}; Path={}", cookie.name, cookie.value, cookie.path);

    if cookie.domain.starts_with('.') {
        line.push_str("; Domain=");
        line.push_str(&cookie.domain);
    }
    if cookie.secure {
        line.push_str("; Secure");
    }
    if cookie.http_only {
        line.push_str("; HttpOnly");
    }
    line
}
