//! Persisted browser session
//!
//! A session is stored in the storage-state JSON shape that browser
//! automation tools export: a list of cookies plus per-origin storage. Only
//! the cookies are used for crawling; origins are carried through untouched
//! so an exported file can be round-tripped.

mod jar;

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Default session file name
pub const DEFAULT_AUTH_FILE: &str = "auth.json";

/// Errors that can occur while building, reading or writing a session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("IO error on session file {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("Failed to parse session file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to serialize session: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Cookie header contains no name=value pairs")]
    EmptyCookieHeader,

    #[error("Invalid site URL '{0}'")]
    InvalidSiteUrl(String),
}

/// One stored cookie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCookie {
    pub name: String,

    pub value: String,

    /// Cookie domain; a leading dot means subdomains match too
    pub domain: String,

    #[serde(default = "default_cookie_path")]
    pub path: String,

    /// Expiry as Unix seconds; `-1` for a session cookie
    #[serde(default = "default_expires")]
    pub expires: f64,

    #[serde(default)]
    pub http_only: bool,

    #[serde(default)]
    pub secure: bool,

    #[serde(default = "default_same_site")]
    pub same_site: String,
}

fn default_cookie_path() -> String {
    "/".to_string()
}

fn default_expires() -> f64 {
    -1.0
}

fn default_same_site() -> String {
    "Lax".to_string()
}

impl SessionCookie {
    /// Creates a host-only session cookie for `host` at path `/`
    pub fn host_only(name: &str, value: &str, host: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            domain: host.to_string(),
            path: default_cookie_path(),
            expires: default_expires(),
            http_only: false,
            secure: false,
            same_site: default_same_site(),
        }
    }

    /// Returns true if the cookie has an expiry that is already in the past
    pub fn is_expired(&self, now_unix: f64) -> bool {
        self.expires > 0.0 && self.expires <= now_unix
    }

    fn same_identity(&self, other: &SessionCookie) -> bool {
        self.name == other.name && self.domain == other.domain && self.path == other.path
    }
}

/// Authenticated browser state used for every request of a crawl
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub cookies: Vec<SessionCookie>,

    #[serde(default)]
    pub origins: Vec<serde_json::Value>,
}

impl Session {
    /// Returns true if a session file exists at `path`
    pub fn exists(path: &Path) -> bool {
        path.is_file()
    }

    /// Reads a session file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the storage-state JSON file
    ///
    /// # Returns
    ///
    /// * `Ok(Session)` - The session was read and parsed
    /// * `Err(SessionError)` - The file is missing, unreadable or not valid storage state
    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let content = fs::read_to_string(path).map_err(|source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| SessionError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes the session as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), SessionError> {
        let payload = serde_json::to_string_pretty(self)?;
        let io_err = |source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, payload).map_err(io_err)
    }

    /// Builds a session from a `Cookie:` header line as copied from a browser
    ///
    /// Every `name=value` pair becomes a host-only cookie for the host of
    /// `site_url`. A leading `Cookie:` label is accepted and ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use site_mirror::Session;
    ///
    /// let session = Session::from_cookie_header("sid=abc; theme=dark", "https://example.com/").unwrap();
    /// assert_eq!(session.cookies.len(), 2);
    /// assert_eq!(session.cookies[0].domain, "example.com");
    /// ```
    pub fn from_cookie_header(header: &str, site_url: &str) -> Result<Self, SessionError> {
        let host = Url::parse(site_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .ok_or_else(|| SessionError::InvalidSiteUrl(site_url.to_string()))?;

        let header = header.trim();
        let header = header
            .strip_prefix("Cookie:")
            .or_else(|| header.strip_prefix("cookie:"))
            .unwrap_or(header);

        let cookies: Vec<SessionCookie> = header
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .map(|(name, value)| (name.trim(), value.trim()))
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, value)| SessionCookie::host_only(name, value, &host))
            .collect();

        if cookies.is_empty() {
            return Err(SessionError::EmptyCookieHeader);
        }

        Ok(Self {
            cookies,
            origins: Vec::new(),
        })
    }

    /// Merges `other` into this session
    ///
    /// Cookies in `other` replace cookies here with the same name, domain and
    /// path; new ones are appended. Origins are appended.
    pub fn merge(&mut self, other: Session) {
        for cookie in other.cookies {
            match self.cookies.iter_mut().find(|c| c.same_identity(&cookie)) {
                Some(existing) => *existing = cookie,
                None => self.cookies.push(cookie),
            }
        }
        self.origins.extend(other.origins);
    }

    /// Returns true if the session holds no cookies
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}
