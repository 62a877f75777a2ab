//! Process-local storage, used by tests and hosts that persist elsewhere.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::model::Document;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

type Shelf = BTreeMap<String, Document>;

/// Documents kept in a map for the lifetime of the value.
///
/// Stored copies share their item and connector vectors with the caller's
/// document until either side writes.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    shelf: RwLock<Shelf>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, Shelf>> {
        self.shelf
            .read()
            .map_err(|err| StorageError::Other(format!("memory storage poisoned: {}", err)))
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, Shelf>> {
        self.shelf
            .write()
            .map_err(|err| StorageError::Other(format!("memory storage poisoned: {}", err)))
    }
}

impl Storage for MemoryStorage {
    fn save(&self, key: &str, document: &Document) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_owned();
        let document = document.clone();
        Box::pin(async move {
            self.write()?.insert(key, document);
            Ok(())
        })
    }

    fn load(&self, key: &str) -> BoxFuture<'_, StorageResult<Document>> {
        let key = key.to_owned();
        Box::pin(async move {
            let found = self.read()?.get(&key).cloned();
            found.ok_or(StorageError::NotFound(key))
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_owned();
        Box::pin(async move {
            self.write()?.remove(&key);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        // BTreeMap keys are already ordered
        Box::pin(async move { Ok(self.read()?.keys().cloned().collect()) })
    }

    fn exists(&self, key: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let key = key.to_owned();
        Box::pin(async move { Ok(self.read()?.contains_key(&key)) })
    }
}
