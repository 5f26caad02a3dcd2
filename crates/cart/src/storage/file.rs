//! File-backed key-value store.
//!
//! Each key maps to `<dir>/<url-encoded key>.json`. Writes go to a sibling
//! temporary file that is then renamed over the target, so a reader never sees
//! a half-written value.

use std::io::ErrorKind;
use std::path::PathBuf;

use super::{KeyValueStore, StorageError};

/// A key-value store that keeps one file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the file holding `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", urlencoding::encode(key)))
    }
}

impl KeyValueStore for FileStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
