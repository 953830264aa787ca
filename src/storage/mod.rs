//! Storage module for persisting crawl checkpoints
//!
//! This module handles:
//! - The checkpoint record (crawl identity + crawl state)
//! - Loading, saving and deleting the checkpoint file
//! - Deciding whether a saved checkpoint may be resumed

mod checkpoint;
mod store;

pub use checkpoint::Checkpoint;
pub use store::{is_compatible, CheckpointError, CheckpointResult, CheckpointStore};

use std::path::{Path, PathBuf};

/// File name of the checkpoint when no explicit path is given
pub const DEFAULT_STATE_FILE: &str = ".crawl_state.json";

/// Returns the default checkpoint path for an output directory
pub fn default_state_file(output_dir: &Path) -> PathBuf {
    output_dir.join(DEFAULT_STATE_FILE)
}
