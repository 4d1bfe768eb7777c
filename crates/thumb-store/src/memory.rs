//! In-memory storage (for testing).

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{Storage, StoreError, validate_name};

#[derive(Debug, Default)]
struct Inner {
    exists: bool,
    files: BTreeMap<String, Vec<u8>>,
}

/// Thread-safe in-memory storage. Clones share the same files.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStorage {
    /// Create a storage whose location does not exist yet.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

impl Storage for MemoryStorage {
    fn ensure_location(&self) -> Result<(), StoreError> {
        self.lock()?.exists = true;
        Ok(())
    }

    fn exists(&self) -> bool {
        self.lock().map(|inner| inner.exists).unwrap_or(false)
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        // BTreeMap keys are already sorted.
        Ok(self.lock()?.files.keys().cloned().collect())
    }

    fn read(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        validate_name(name)?;
        self.lock()?
            .files
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    fn write(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        validate_name(name)?;
        let mut inner = self.lock()?;
        if !inner.exists {
            return Err(StoreError::io(
                name,
                std::io::Error::new(std::io::ErrorKind::NotFound, "location does not exist"),
            ));
        }
        inner.files.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<(), StoreError> {
        validate_name(name)?;
        self.lock()?
            .files
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    fn remove_location_if_empty(&self) -> Result<bool, StoreError> {
        let mut inner = self.lock()?;
        if !inner.exists || !inner.files.is_empty() {
            return Ok(false);
        }
        inner.exists = false;
        Ok(true)
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_requires_location() {
        let store = MemoryStorage::new();
        assert!(matches!(store.write("a.jpg", b"a"), Err(StoreError::Io { .. })));
        store.ensure_location().unwrap();
        store.write("a.jpg", b"a").unwrap();
        assert_eq!(store.read("a.jpg").unwrap(), b"a");
    }

    #[test]
    fn test_clones_share_files() {
        let store = MemoryStorage::new();
        let other = store.clone();
        store.ensure_location().unwrap();
        store.write("z.jpg", b"z").unwrap();
        store.write("m.jpg", b"m").unwrap();
        assert!(other.exists());
        assert_eq!(other.list().unwrap(), vec!["m.jpg", "z.jpg"]);
    }

    #[test]
    fn test_remove_and_drop_location() {
        let store = MemoryStorage::new();
        store.ensure_location().unwrap();
        store.write("a.jpg", b"a").unwrap();
        assert!(!store.remove_location_if_empty().unwrap());

        store.remove("a.jpg").unwrap();
        assert!(matches!(store.remove("a.jpg"), Err(StoreError::NotFound(_))));
        assert!(store.remove_location_if_empty().unwrap());
        assert!(!store.exists());
        assert!(!store.remove_location_if_empty().unwrap());
    }
}
