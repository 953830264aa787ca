//! Checkpoint file persistence
//!
//! The checkpoint is a single pretty-printed JSON document. Saves go to a
//! sibling temporary file that is then renamed over the checkpoint, so a
//! crash mid-write leaves the previous checkpoint intact.

use crate::state::CrawlConfig;
use crate::storage::Checkpoint;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while reading or writing a checkpoint
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("IO error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("Failed to parse checkpoint {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to serialize checkpoint: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for checkpoint operations
pub type CheckpointResult<T> = Result<T, CheckpointError>;

/// Returns true if a checkpoint saved under `saved` may be resumed under `current`
pub fn is_compatible(saved: &CrawlConfig, current: &CrawlConfig) -> bool {
    current.is_compatible(saved)
}

/// Reads and writes the checkpoint file at a fixed path
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    path: PathBuf,
}

impl CheckpointStore {
    /// Creates a store for the checkpoint at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The checkpoint file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if a checkpoint file exists
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Loads the checkpoint
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Checkpoint))` - The checkpoint was read and parsed
    /// * `Ok(None)` - No checkpoint file exists
    /// * `Err(CheckpointError)` - The file exists but is unreadable or corrupt
    pub fn load(&self) -> CheckpointResult<Option<Checkpoint>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(CheckpointError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let checkpoint = serde_json::from_str(&content).map_err(|source| CheckpointError::Parse {
            path: self.path.clone(),
            source,
        })?;

        Ok(Some(checkpoint))
    }

    /// Writes the checkpoint, replacing any previous one
    pub fn save(&self, checkpoint: &Checkpoint) -> CheckpointResult<()> {
        let payload = serde_json::to_string_pretty(checkpoint)?;
        self.write_atomically(payload.as_bytes())
            .map_err(|source| CheckpointError::Io {
                path: self.path.clone(),
                source,
            })
    }

    /// Removes the checkpoint; a missing file is not an error
    pub fn delete(&self) -> CheckpointResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CheckpointError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_atomically(&self, bytes: &[u8]) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp = self.temp_path();
        {
            let mut file = fs::File::create(&temp)?;
            file.write_all(bytes)?;
            file.sync_all()?;
        }
        fs::rename(&temp, &self.path)
    }
}
