//! Flat file storage for processed thumbnails.
//!
//! A [`Storage`] is one location holding named files, with no nesting. The
//! batch driver writes into it and the archiver drains it. [`DirStorage`]
//! backs it with a directory on disk. [`MemoryStorage`] keeps everything in
//! memory for tests.

pub mod dir;
pub mod memory;

pub use dir::DirStorage;
pub use memory::MemoryStorage;

/// One flat location of named files.
pub trait Storage: Send + Sync {
    /// Create the location if it does not exist yet.
    fn ensure_location(&self) -> Result<(), StoreError>;

    /// Whether the location currently exists.
    fn exists(&self) -> bool;

    /// Names of the files directly inside the location, sorted.
    ///
    /// A missing location lists as empty.
    fn list(&self) -> Result<Vec<String>, StoreError>;

    fn read(&self, name: &str) -> Result<Vec<u8>, StoreError>;

    /// Create or replace a file.
    fn write(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError>;

    fn remove(&self, name: &str) -> Result<(), StoreError>;

    /// Remove the location itself when it holds no files.
    ///
    /// Returns whether it was removed.
    fn remove_location_if_empty(&self) -> Result<bool, StoreError>;

    /// Human-readable description of the location, for notices and logs.
    fn describe(&self) -> String;
}

/// Storage error type.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid file name: {0:?}")]
    InvalidName(String),

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub(crate) fn io(name: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            name: name.into(),
            source,
        }
    }
}

/// Reject names that would escape the flat location.
pub fn validate_name(name: &str) -> Result<(), StoreError> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');
    if bad {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(())
}
