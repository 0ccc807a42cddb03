use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use sweeper_core::KeyValueStore;
use thiserror::Error;

#[derive(Error, Debug)]
pub(crate) enum FileStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed store: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key-value store kept as one JSON object on disk, rewritten in full on every `set`.
#[derive(Debug)]
pub(crate) struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens `path`, starting empty when it is missing or unreadable.
    pub(crate) fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match Self::read_entries(&path) {
            Ok(entries) => entries,
            Err(FileStoreError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("No store at {}, starting empty", path.display());
                BTreeMap::new()
            }
            Err(err) => {
                log::warn!("Ignoring store at {}: {}", path.display(), err);
                BTreeMap::new()
            }
        };
        Self { path, entries }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(path: &Path) -> Result<BTreeMap<String, String>, FileStoreError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    fn write_entries(&self) -> Result<(), FileStoreError> {
        let text = serde_json::to_string_pretty(&self.entries)?;
        let staging = self.path.with_extension("tmp");
        fs::write(&staging, text)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    type Error = FileStoreError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), Self::Error> {
        self.entries.insert(key.to_string(), value);
        self.write_entries()?;
        log::debug!("Saved {} to {}", key, self.path.display());
        Ok(())
    }
}
