//! Durable key-value storage for cart and order records.
//!
//! # Architecture
//!
//! - [`KeyValueStore`] is a string-to-string store, the shape of browser
//!   local storage
//! - [`MemoryStore`] backs tests and ephemeral sessions
//! - [`FileStore`] keeps every key in one JSON document on disk
//! - [`RecordRepository`] wraps a key in a versioned `{"version", "data"}`
//!   envelope and fails closed when the stored record does not match

mod file;
mod record;

pub use file::FileStore;
pub use record::RecordRepository;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use thiserror::Error;

/// Errors that can occur when reading or writing storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("Storage I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file is not a JSON object of strings.
    #[error("Storage document at {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be encoded.
    #[error("Failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),

    /// Another thread panicked while holding the store lock.
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// A durable string-to-string store.
///
/// Implementations must make a completed `set` visible to every later `get`,
/// including from a new store instance over the same backing medium.
pub trait KeyValueStore: Send + Sync {
    /// Read a value. `Ok(None)` means the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a key. Deleting an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-process store with no persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .map_err(|_| StorageError::Poisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .map_err(|_| StorageError::Poisoned)?
            .remove(key);
        Ok(())
    }
}
