use crate::storage::Storage;
use crate::{utils, Result};
use anyhow::{ensure, Context};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::trace;

const EXTENSION: &str = "json";

/// Stores each key as a file named `{key}.json` inside a directory.
///
/// A value is first written to a hidden temporary file and then renamed over the destination, so
/// an interrupted write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates a `FileStorage` rooted at `dir`. The directory must already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> Result<PathBuf> {
        ensure!(!key.is_empty(), "Storage keys must not be empty");
        ensure!(
            !key.starts_with('.') && !key.contains(['/', '\\']),
            "Invalid storage key '{key}'"
        );
        Ok(self.dir.join(format!("{key}.{EXTENSION}")))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!(".{key}.{EXTENSION}.tmp"))
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key)?;
        trace!("Reading {}", path.display());
        utils::read_if_exists(&path).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path(key)?;
        let temp = self.temp_path(key);
        trace!("Writing {}", path.display());
        utils::write(&temp, value).await?;
        utils::rename(&temp, &path).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path(key)?;
        utils::remove(&path).await
    }

    async fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut dir = utils::read_dir(&self.dir).await?;
        while let Some(entry) = dir
            .next_entry()
            .await
            .context("Failed to read directory entry")?
        {
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            if name.starts_with('.') {
                continue;
            }
            if let Some(key) = name.strip_suffix(&format!(".{EXTENSION}")) {
                keys.push(key.to_string());
            }
        }
        Ok(keys)
    }
}
