//! Single-document JSON file store.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, instrument};

use super::{KeyValueStore, StorageError};

/// Stores every key in one JSON object file.
///
/// Each operation re-reads the file so separate processes sharing a path see
/// each other's writes. Writes go to a sibling temp file that is renamed over
/// the document, so a crash never leaves a half-written file behind.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

type Document = BTreeMap<String, String>;

impl FileStore {
    /// Open a store at `path`, creating parent directories as needed.
    ///
    /// The file itself is created on first write.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        debug!(path = %path.display(), "Opened file store");
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Document, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Document::new()),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        if raw.trim().is_empty() {
            return Ok(Document::new());
        }

        serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write_document(&self, document: &Document) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(document)?;
        let tmp = self.path.with_extension("tmp");

        fs::write(&tmp, raw).map_err(|source| StorageError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn update(&self, apply: impl FnOnce(&mut Document) -> bool) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut document = self.read_document()?;
        if apply(&mut document) {
            self.write_document(&document)?;
        }
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_document()?.remove(key))
    }

    #[instrument(skip(self, value), fields(path = %self.path.display(), bytes = value.len()))]
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|document| {
            document.insert(key.to_string(), value.to_string());
            true
        })
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|document| document.remove(key).is_some())
    }
}
