//! Output module for writing the offline mirror
//!
//! This module handles:
//! - Mapping URLs to output file paths and rewriting links between them
//! - Rewriting anchor `href` values inside saved HTML
//! - Writing pages to disk
//! - Reporting what a mirror directory contains

mod paths;
mod rewrite;
mod saver;
pub mod stats;

pub use paths::{rewrite_link, url_to_output_path};
pub use rewrite::rewrite_anchor_hrefs;
pub use saver::{HtmlSaver, PageSaver};
pub use stats::{count_saved_pages, load_status, print_status, MirrorStatus};
