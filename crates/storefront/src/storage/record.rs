//! Versioned records over a [`KeyValueStore`].

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{KeyValueStore, StorageError};

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    data: &'a T,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct Header {
    version: u32,
}

/// A single typed record stored under one key as `{"version": N, "data": T}`.
///
/// Loading never fails on bad data: a record that is malformed or carries a
/// different version is logged and treated as absent.
pub struct RecordRepository<S, T> {
    store: Arc<S>,
    key: &'static str,
    version: u32,
    _record: PhantomData<fn() -> T>,
}

impl<S, T> RecordRepository<S, T>
where
    S: KeyValueStore,
    T: Serialize + DeserializeOwned,
{
    #[must_use]
    pub const fn new(store: Arc<S>, key: &'static str, version: u32) -> Self {
        Self {
            store,
            key,
            version,
            _record: PhantomData,
        }
    }

    /// Load the record.
    ///
    /// # Errors
    ///
    /// Returns an error only if the store itself cannot be read.
    pub fn load(&self) -> Result<Option<T>, StorageError> {
        let Some(raw) = self.store.get(self.key)? else {
            return Ok(None);
        };

        let header: Header = match serde_json::from_str(&raw) {
            Ok(header) => header,
            Err(e) => {
                warn!(key = self.key, error = %e, "Discarding malformed record");
                return Ok(None);
            }
        };

        if header.version != self.version {
            warn!(
                key = self.key,
                stored = header.version,
                expected = self.version,
                "Discarding record with unsupported version"
            );
            return Ok(None);
        }

        match serde_json::from_str::<Envelope<T>>(&raw) {
            Ok(envelope) => Ok(Some(envelope.data)),
            Err(e) => {
                warn!(key = self.key, error = %e, "Discarding record with invalid data");
                Ok(None)
            }
        }
    }

    /// Replace the stored record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be encoded or written.
    pub fn save(&self, record: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(&EnvelopeRef {
            version: self.version,
            data: record,
        })?;
        self.store.set(self.key, &raw)
    }

    /// Delete the stored record.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn delete(&self) -> Result<(), StorageError> {
        self.store.remove(self.key)
    }
}
