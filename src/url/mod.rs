//! URL handling module for site-mirror
//!
//! This module decides URL equivalence (fragment stripping), extracts the
//! network location used for site comparisons, and runs the admission filter
//! chain that every candidate URL passes before it is fetched or enqueued.

mod domain;
mod filter;
mod normalize;

// Re-export main functions
pub use domain::{netloc, url_netloc};
pub use filter::{FilterChain, FilterDecision, SKIPPED_EXTENSIONS};
pub use normalize::normalize_url;
