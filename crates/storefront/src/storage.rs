//! File-backed cart storage.
//!
//! Mirrors browser local storage: a directory is the storage area and each
//! key (a session id) holds one serialized cart blob in `<key>.json`.
//! Each write goes to its own temporary file in the same directory, which is
//! then renamed over the blob. Readers see either the old or the new snapshot.
//! Concurrent writers to one key race, and the last rename wins.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use serendib_core::{CartSnapshot, CartStorage, SessionId, StorageError};

const BLOB_EXTENSION: &str = "json";

/// One key in a file-backed storage area.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    path: PathBuf,
}

impl LocalStorage {
    /// Storage for `key` inside `dir`. The directory is created on first save.
    #[must_use]
    pub fn new(dir: &Path, key: &SessionId) -> Self {
        Self {
            path: dir.join(format!("{key}.{BLOB_EXTENSION}")),
        }
    }

    /// Path of the blob file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartStorage for LocalStorage {
    fn load(&self) -> Result<Option<CartSnapshot>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => CartSnapshot::from_json(&json).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, snapshot: &CartSnapshot) -> Result<(), StorageError> {
        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent)?;

        let json = snapshot.to_json()?;
        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(json.as_bytes())?;
        temp.persist(&self.path).map_err(|e| e.error)?;

        tracing::debug!(path = %self.path.display(), entries = snapshot.entries.len(), "Cart saved");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serendib_core::{ProductId, SnapshotEntry};

    use super::*;

    fn key(s: &str) -> SessionId {
        SessionId::parse(s).unwrap()
    }

    #[test]
    fn test_missing_blob_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), &key("nobody"));
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = LocalStorage::new(&dir.path().join("nested/carts"), &key("abc"));
        let snapshot = CartSnapshot {
            version: CartSnapshot::VERSION,
            entries: vec![SnapshotEntry {
                product_id: ProductId::new(2),
                quantity: 3,
            }],
        };

        storage.save(&snapshot).unwrap();
        assert!(storage.path().ends_with("abc.json"));
        let leftovers = std::fs::read_dir(storage.path().parent().unwrap())
            .unwrap()
            .count();
        assert_eq!(leftovers, 1);
        assert_eq!(storage.load().unwrap(), Some(snapshot));
    }

    #[test]
    fn test_concurrent_saves_to_one_key_all_succeed() {
        let dir = tempfile::tempdir().unwrap();

        let writers: Vec<_> = (1..=8u32)
            .map(|thread| {
                let mut storage = LocalStorage::new(dir.path(), &key("shared"));
                std::thread::spawn(move || {
                    for round in 0..100u32 {
                        let snapshot = CartSnapshot {
                            version: CartSnapshot::VERSION,
                            entries: vec![SnapshotEntry {
                                product_id: ProductId::new(thread),
                                quantity: round + 1,
                            }],
                        };
                        storage.save(&snapshot).unwrap();
                    }
                })
            })
            .collect();

        for writer in writers {
            writer.join().unwrap();
        }

        let storage = LocalStorage::new(dir.path(), &key("shared"));
        let last = storage.load().unwrap().unwrap();
        assert_eq!(last.entries.len(), 1);
        assert_eq!(last.entries.first().unwrap().quantity, 100);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_keys_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = LocalStorage::new(dir.path(), &key("a"));
        let b = LocalStorage::new(dir.path(), &key("b"));

        a.save(&CartSnapshot::empty()).unwrap();
        assert!(a.load().unwrap().is_some());
        assert!(b.load().unwrap().is_none());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = LocalStorage::new(dir.path(), &key("x"));
        storage.save(&CartSnapshot::empty()).unwrap();
        storage.clear().unwrap();
        storage.clear().unwrap();
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_blob_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), &key("bad"));
        std::fs::write(storage.path(), "{not json").unwrap();
        assert!(matches!(
            storage.load(),
            Err(StorageError::Serialization(_))
        ));
    }
}
