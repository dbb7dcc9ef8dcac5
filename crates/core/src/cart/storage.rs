//! Cart persistence port and the in-memory adapter.

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::ProductId;

/// Errors raised by a [`CartStorage`] adapter.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the underlying medium failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored blob could not be (de)serialized.
    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The stored blob was written by an unsupported format version.
    #[error("unsupported cart snapshot version {0}")]
    UnsupportedVersion(u32),

    /// The adapter is unusable (e.g. a poisoned lock).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// One persisted cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// The serialized cart blob.
///
/// ```json
/// {"version": 1, "entries": [{"product_id": 1, "quantity": 2}]}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub version: u32,
    pub entries: Vec<SnapshotEntry>,
}

impl CartSnapshot {
    /// Current snapshot format version.
    pub const VERSION: u32 = 1;

    /// Snapshot with no entries.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            version: Self::VERSION,
            entries: Vec::new(),
        }
    }

    /// Serialize to the JSON blob stored by adapters.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if encoding fails.
    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a JSON blob, rejecting unknown format versions.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for malformed JSON and
    /// `StorageError::UnsupportedVersion` for other versions.
    pub fn from_json(json: &str) -> Result<Self, StorageError> {
        let snapshot: Self = serde_json::from_str(json)?;
        if snapshot.version != Self::VERSION {
            return Err(StorageError::UnsupportedVersion(snapshot.version));
        }
        Ok(snapshot)
    }
}

/// Persistence port for a single cart.
///
/// An adapter stores exactly one serialized snapshot (one key in a
/// key-value medium). Calls are synchronous; the store persists after every
/// mutation.
pub trait CartStorage {
    /// Load the last saved snapshot, or `None` if nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the medium cannot be read or the blob is
    /// corrupt.
    fn load(&self) -> Result<Option<CartSnapshot>, StorageError>;

    /// Replace the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be written.
    fn save(&mut self, snapshot: &CartSnapshot) -> Result<(), StorageError>;

    /// Remove the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the snapshot cannot be removed.
    fn clear(&mut self) -> Result<(), StorageError>;
}

/// In-memory storage holding the serialized blob.
///
/// Clones share the same blob, so a test can hand one clone to a store, drop
/// the store, and reopen a new store from another clone to simulate a reload.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    blob: Arc<Mutex<Option<String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The raw stored blob, if any.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.blob
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn with_blob<T>(&self, f: impl FnOnce(&mut Option<String>) -> T) -> Result<T, StorageError> {
        let mut guard = self
            .blob
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(f(&mut guard))
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self) -> Result<Option<CartSnapshot>, StorageError> {
        self.with_blob(|blob| blob.clone())?
            .map(|json| CartSnapshot::from_json(&json))
            .transpose()
    }

    fn save(&mut self, snapshot: &CartSnapshot) -> Result<(), StorageError> {
        let json = snapshot.to_json()?;
        self.with_blob(|blob| *blob = Some(json))
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.with_blob(|blob| *blob = None)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_starts_empty() {
        let storage = MemoryStorage::new();
        assert!(storage.load().unwrap().is_none());
        assert!(storage.raw().is_none());
    }

    #[test]
    fn test_clones_share_blob() {
        let mut writer = MemoryStorage::new();
        let reader = writer.clone();
        let snapshot = CartSnapshot {
            version: CartSnapshot::VERSION,
            entries: vec![SnapshotEntry {
                product_id: ProductId::new(3),
                quantity: 2,
            }],
        };
        writer.save(&snapshot).unwrap();
        assert_eq!(reader.load().unwrap(), Some(snapshot));

        writer.clear().unwrap();
        assert!(reader.load().unwrap().is_none());
    }

    #[test]
    fn test_snapshot_json_shape() {
        let snapshot = CartSnapshot {
            version: 1,
            entries: vec![SnapshotEntry {
                product_id: ProductId::new(1),
                quantity: 2,
            }],
        };
        assert_eq!(
            snapshot.to_json().unwrap(),
            r#"{"version":1,"entries":[{"product_id":1,"quantity":2}]}"#
        );
    }

    #[test]
    fn test_unknown_version_rejected() {
        let err = CartSnapshot::from_json(r#"{"version":2,"entries":[]}"#).unwrap_err();
        assert!(matches!(err, StorageError::UnsupportedVersion(2)));
    }
}
