//! Session-scoped note storage kept entirely in memory

use std::collections::HashMap;

use super::{NoteRecord, NoteStore, StoreError};
use crate::core::catalog::{Grade, NoteKey, Subject};
use crate::core::config::StorageBackend;

/// In-memory store; contents live as long as the value does
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: HashMap<NoteKey, NoteRecord>,
    /// Keys in first-insertion order
    order: Vec<NoteKey>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NoteStore for MemoryStore {
    fn put(&mut self, key: NoteKey, description: String, payload: Option<Vec<u8>>) -> Result<(), StoreError> {
        tracing::debug!(
            "Storing {} in memory ({} bytes)",
            key,
            payload.as_ref().map_or(0, Vec::len)
        );

        if !self.records.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.records.insert(key, NoteRecord::new(description, payload));
        Ok(())
    }

    fn get(&self, key: &NoteKey) -> NoteRecord {
        self.records.get(key).cloned().unwrap_or_default()
    }

    fn list_keys(&self, grade: Grade, subject: Subject) -> Vec<String> {
        self.order
            .iter()
            .filter(|key| key.is_in(grade, subject))
            .map(|key| key.filename.clone())
            .collect()
    }

    fn contains(&self, key: &NoteKey) -> bool {
        self.records.contains_key(key)
    }

    fn backend(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
