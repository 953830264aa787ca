//! Mirror status reporting
//!
//! This module gathers what is on disk for a mirror (session file, saved
//! pages, pending checkpoint) and prints it for the `status` command.

use crate::session::Session;
use crate::storage::CheckpointStore;
use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Snapshot of a pending checkpoint
#[derive(Debug, Clone)]
pub struct CheckpointSummary {
    pub path: PathBuf,
    pub start_url: String,
    pub fingerprint: String,
    pub queued: usize,
    pub visited: usize,
    pub saved: u64,
    pub failed: u64,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Status of a mirror directory
#[derive(Debug, Clone)]
pub struct MirrorStatus {
    /// Path of the session file
    pub auth_file: PathBuf,

    /// Whether the session file exists
    pub auth_present: bool,

    /// Number of `.html` files under the output directory
    pub saved_pages: u64,

    /// Pending checkpoint, if one exists and is readable
    pub checkpoint: Option<CheckpointSummary>,

    /// Why the checkpoint could not be read, if it exists but is unusable
    pub checkpoint_error: Option<String>,
}

/// Counts saved pages (`*.html` files) under `output_dir`, recursively
///
/// A missing directory counts as zero pages.
pub fn count_saved_pages(output_dir: &Path) -> io::Result<u64> {
    if !output_dir.exists() {
        return Ok(0);
    }

    let mut count = 0;
    let mut pending = vec![output_dir.to_path_buf()];

    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            let path = entry.path();

            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() && path.extension().is_some_and(|ext| ext == "html") {
                count += 1;
            }
        }
    }

    Ok(count)
}

/// Gathers the status of a mirror
pub fn load_status(output_dir: &Path, state_file: &Path, auth_file: &Path) -> io::Result<MirrorStatus> {
    let saved_pages = count_saved_pages(output_dir)?;
    let store = CheckpointStore::new(state_file);

    let (checkpoint, checkpoint_error) = match store.load() {
        Ok(Some(checkpoint)) => {
            let fingerprint = checkpoint.crawl_config().fingerprint();
            let summary = CheckpointSummary {
                path: state_file.to_path_buf(),
                start_url: checkpoint.start_url.clone(),
                fingerprint,
                queued: checkpoint.queue.len(),
                visited: checkpoint.visited.len(),
                saved: checkpoint.saved,
                failed: checkpoint.failed,
                updated_at: checkpoint.updated_at,
            };
            (Some(summary), None)
        }
        Ok(None) => (None, None),
        Err(e) => (None, Some(e.to_string())),
    };

    Ok(MirrorStatus {
        auth_file: auth_file.to_path_buf(),
        auth_present: Session::exists(auth_file),
        saved_pages,
        checkpoint,
        checkpoint_error,
    })
}

/// Prints a mirror status to stdout
pub fn print_status(status: &MirrorStatus) {
    println!("=== Mirror Status ===\n");

    println!(
        "Auth state: {} ({})",
        if status.auth_present { "present" } else { "missing" },
        status.auth_file.display()
    );
    println!("Saved HTML pages: {}", status.saved_pages);

    match (&status.checkpoint, &status.checkpoint_error) {
        (Some(cp), _) => {
            println!("\nPending checkpoint: {}", cp.path.display());
            println!("  Start URL: {}", cp.start_url);
            println!("  Fingerprint: {}", &cp.fingerprint[..12.min(cp.fingerprint.len())]);
            println!("  Queued: {}", cp.queued);
            println!("  Visited: {}", cp.visited);
            println!("  Saved: {}", cp.saved);
            println!("  Failed: {}", cp.failed);
            if let Some(updated_at) = cp.updated_at {
                println!("  Updated: {}", updated_at.to_rfc3339());
            }
        }
        (None, Some(error)) => {
            println!("\nCheckpoint unreadable (next resume starts fresh): {}", error);
        }
        (None, None) => {
            println!("\nNo pending checkpoint");
        }
    }
}
