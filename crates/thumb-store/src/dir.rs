//! Directory-backed storage.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{Storage, StoreError, validate_name};

/// Storage rooted at one directory on disk.
#[derive(Debug, Clone)]
pub struct DirStorage {
    root: PathBuf,
}

impl DirStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, name: &str) -> Result<PathBuf, StoreError> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }

    fn root_name(&self) -> String {
        self.root.display().to_string()
    }
}

impl Storage for DirStorage {
    fn ensure_location(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).map_err(|e| StoreError::io(self.root_name(), e))
    }

    fn exists(&self) -> bool {
        self.root.is_dir()
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(self.root_name(), e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(self.root_name(), e))?;
            let file_type = entry
                .file_type()
                .map_err(|e| StoreError::io(self.root_name(), e))?;
            if !file_type.is_file() {
                debug!(path = %entry.path().display(), "Skipping non-file entry");
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => debug!(?raw, "Skipping non UTF-8 file name"),
            }
        }

        names.sort();
        Ok(names)
    }

    fn read(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.path_of(name)?;
        fs::read(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::NotFound(name.to_string()),
            _ => StoreError::io(name, e),
        })
    }

    fn write(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.path_of(name)?;
        fs::write(&path, bytes).map_err(|e| StoreError::io(name, e))?;
        debug!(path = %path.display(), len = bytes.len(), "Wrote file");
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<(), StoreError> {
        let path = self.path_of(name)?;
        fs::remove_file(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::NotFound(name.to_string()),
            _ => StoreError::io(name, e),
        })
    }

    fn remove_location_if_empty(&self) -> Result<bool, StoreError> {
        let mut entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(StoreError::io(self.root_name(), e)),
        };
        if entries.next().is_some() {
            return Ok(false);
        }

        fs::remove_dir(&self.root).map_err(|e| StoreError::io(self.root_name(), e))?;
        debug!(path = %self.root.display(), "Removed empty directory");
        Ok(true)
    }

    fn describe(&self) -> String {
        self.root_name()
    }
}
