//! Note storage: one interface, an in-memory and a filesystem implementation
//!
//! A store maps a [`NoteKey`] to a [`NoteRecord`]. Writes to an existing key
//! replace the whole record. Reads of a missing key return an empty record
//! rather than an error; use [`NoteStore::contains`] when the difference
//! matters. Listing returns filenames in first-insertion order.

pub mod disk;
pub mod memory;

use std::path::PathBuf;

use anyhow::{Context, Result};
use thiserror::Error;

use super::catalog::{Grade, NoteKey, Subject};
use super::config::{StorageBackend, StorageConfig};

pub use disk::FsStore;
pub use memory::MemoryStore;

/// A stored note
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteRecord {
    /// User supplied description, empty when none was given
    pub description: String,
    /// PDF bytes, when the store keeps content
    pub payload: Option<Vec<u8>>,
}

impl NoteRecord {
    pub fn new(description: impl Into<String>, payload: Option<Vec<u8>>) -> Self {
        Self {
            description: description.into(),
            payload,
        }
    }
}

/// Storage failures. None of these are fatal to the application.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid metadata file {}: {source}", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid filename: {0:?}")]
    InvalidFilename(String),
    #[error("invalid note key: {0}")]
    InvalidKey(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Keyed note storage with last-write-wins semantics
pub trait NoteStore {
    /// Store a note, replacing any record already at `key`
    fn put(&mut self, key: NoteKey, description: String, payload: Option<Vec<u8>>) -> Result<(), StoreError>;

    /// Fetch a note; a missing key yields an empty record
    fn get(&self, key: &NoteKey) -> NoteRecord;

    /// Filenames stored under a grade and subject, in first-insertion order
    fn list_keys(&self, grade: Grade, subject: Subject) -> Vec<String>;

    /// Whether a record was ever stored at `key`
    fn contains(&self, key: &NoteKey) -> bool;

    /// Which implementation this is
    fn backend(&self) -> StorageBackend;
}

/// Build the store selected by the configuration
pub fn open_store(config: &StorageConfig) -> Result<Box<dyn NoteStore>> {
    let store: Box<dyn NoteStore> = match config.backend {
        StorageBackend::Memory => Box::new(MemoryStore::new()),
        StorageBackend::Filesystem => {
            let root = config.upload_root();
            let store = FsStore::open(&root)
                .with_context(|| format!("Failed to open note storage at {}", root.display()))?;
            Box::new(store)
        }
    };

    tracing::info!("Using {} note storage", store.backend());
    Ok(store)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_store_memory() {
        let config = StorageConfig {
            backend: StorageBackend::Memory,
            root: None,
        };
        let store = open_store(&config).unwrap();
        assert_eq!(store.backend(), StorageBackend::Memory);
    }

    #[test]
    fn test_open_store_filesystem_creates_layout() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("uploads");
        let config = StorageConfig {
            backend: StorageBackend::Filesystem,
            root: Some(root.clone()),
        };

        let store = open_store(&config).unwrap();
        assert_eq!(store.backend(), StorageBackend::Filesystem);
        assert!(root.join("10").join("Physics").is_dir());
    }

    #[test]
    fn test_store_error_messages() {
        let err = StoreError::InvalidFilename("../x.pdf".to_string());
        assert_eq!(err.to_string(), "invalid filename: \"../x.pdf\"");
    }
}
