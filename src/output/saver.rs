//! Page persistence
//!
//! A saver receives the fetched HTML for a URL, rewrites its same-site
//! anchors into relative offline paths, and writes it to the URL's mapped
//! output file.

use crate::output::paths::{rewrite_link, url_to_output_path};
use crate::output::rewrite::rewrite_anchor_hrefs;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Trait for page persistence backends
pub trait PageSaver: Send + Sync {
    /// Stores `html` fetched from `url` under `output_root`
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - The file the page was written to
    /// * `Err(io::Error)` - The page could not be written
    fn save(&self, url: &str, html: &str, output_root: &Path, site_host: &str) -> io::Result<PathBuf>;
}

/// Writes pages as HTML files with same-site links rewritten for offline use
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlSaver;

impl HtmlSaver {
    /// Returns `html` with every anchor `href` passed through `rewrite_link`
    pub fn rewrite(&self, url: &str, html: &str, output_root: &Path, site_host: &str) -> String {
        rewrite_anchor_hrefs(html, |href| rewrite_link(url, href, output_root, site_host))
    }
}

impl PageSaver for HtmlSaver {
    fn save(&self, url: &str, html: &str, output_root: &Path, site_host: &str) -> io::Result<PathBuf> {
        let rewritten = self.rewrite(url, html, output_root, site_host);
        let output_path = url_to_output_path(url, output_root);

        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, rewritten)?;

        tracing::debug!("Saved {} to {}", url, output_path.display());
        Ok(output_path)
    }
}
