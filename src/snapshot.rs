//! Initial feed contents.
//!
//! The bulk fetch lives outside the engine; a loader is called exactly once
//! when a session activates.

use crate::error::{Result, SyncError};
use crate::types::Post;
use std::fs;
use std::path::{Path, PathBuf};

/// One-shot source of the posts that seed the entity store.
pub trait SnapshotLoader {
    fn load(&self) -> Result<Vec<Post>>;
}

/// A fixed list of posts, already in hand.
#[derive(Clone, Debug, Default)]
pub struct StaticSnapshot(pub Vec<Post>);

impl SnapshotLoader for StaticSnapshot {
    fn load(&self) -> Result<Vec<Post>> {
        Ok(self.0.clone())
    }
}

impl<F> SnapshotLoader for F
where
    F: Fn() -> Result<Vec<Post>>,
{
    fn load(&self) -> Result<Vec<Post>> {
        self()
    }
}

/// Reads a JSON array of posts from disk.
#[derive(Clone, Debug)]
pub struct JsonFileSnapshot {
    path: PathBuf,
}

impl JsonFileSnapshot {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotLoader for JsonFileSnapshot {
    fn load(&self) -> Result<Vec<Post>> {
        let bytes = fs::read(&self.path)?;
        serde_json::from_slice(&bytes).map_err(|e| {
            SyncError::Snapshot(format!("{}: {}", self.path.display(), e))
        })
    }
}
