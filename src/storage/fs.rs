//! Filesystem-backed text storage.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::trace;

use super::Storage;
use crate::error::{CacheError, Result};

// == Fs Storage ==
/// Reads UTF-8 text files below a root directory.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    /// Creates a storage rooted at `root`. The directory need not exist yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the storage root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // == Resolve ==
    /// Maps a relative key onto a path below the root.
    ///
    /// Empty keys, absolute paths and `..` components are rejected.
    pub fn resolve(&self, key: &str) -> Result<PathBuf> {
        let mut path = self.root.clone();
        let mut pushed = false;

        for component in Path::new(key).components() {
            match component {
                Component::Normal(part) => {
                    path.push(part);
                    pushed = true;
                }
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(CacheError::InvalidKey(key.to_string()));
                }
            }
        }

        if !pushed {
            return Err(CacheError::InvalidKey(key.to_string()));
        }
        Ok(path)
    }
}

#[async_trait]
impl Storage for FsStorage {
    type Key = String;
    type Value = String;

    async fn read(&self, key: &String) -> Result<Option<String>> {
        let path = self.resolve(key)?;
        trace!(path = %path.display(), "Reading page from storage");

        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(CacheError::Storage(err)),
        }
    }
}
