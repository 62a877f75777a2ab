//! Keeps a stored document in step with an [`Engine`].
//!
//! The manager remembers which engine revision it last wrote or loaded, so
//! "unsaved changes" is simply a revision mismatch. Writes are debounced by
//! an interval; [`AutoSaveManager::flush`] writes regardless.

use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::model::Document;
use crate::storage::{Storage, StorageError, StorageResult};
use log::{debug, info};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const DEFAULT_AUTOSAVE_INTERVAL_SECS: u64 = 30;

/// Reserved key mirroring whichever document was written most recently.
pub const LAST_DOCUMENT_KEY: &str = "__last_document__";

pub const DEFAULT_DOCUMENT_KEY: &str = "devboard";

pub struct AutoSaveManager<S: Storage> {
    storage: Arc<S>,
    document_key: String,
    interval: Duration,
    /// Engine revision that matches what is stored.
    synced_revision: Option<u64>,
    last_write: Option<Instant>,
}

impl<S: Storage> AutoSaveManager<S> {
    pub fn new(storage: Arc<S>, document_key: impl Into<String>) -> Self {
        Self {
            storage,
            document_key: document_key.into(),
            interval: Duration::from_secs(DEFAULT_AUTOSAVE_INTERVAL_SECS),
            synced_revision: None,
            last_write: None,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn document_key(&self) -> &str {
        &self.document_key
    }

    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }

    /// Open the document under this manager's key as a ready engine.
    ///
    /// A key with nothing stored yields an engine over a fresh document;
    /// nothing is written until that engine changes.
    pub async fn open(&mut self, config: EngineConfig) -> StorageResult<Engine> {
        let document = match self.storage.load(&self.document_key).await {
            Ok(document) => document,
            Err(StorageError::NotFound(_)) => {
                info!("No document '{}', starting a new one", self.document_key);
                Document::new()
            }
            Err(err) => return Err(err),
        };
        let engine = Engine::from_document(document, config);
        self.synced_revision = Some(engine.revision());
        Ok(engine)
    }

    /// The most recently written document under any key, if there is one.
    pub async fn load_last(&self) -> Option<Document> {
        match self.storage.load(LAST_DOCUMENT_KEY).await {
            Ok(document) => Some(document),
            Err(err) => {
                debug!("No last document: {}", err);
                None
            }
        }
    }

    /// Whether `engine` holds changes that are not stored yet.
    pub fn has_unsaved_changes(&self, engine: &Engine) -> bool {
        self.synced_revision != Some(engine.revision())
    }

    /// Whether a debounced save should happen now.
    pub fn is_due(&self, engine: &Engine) -> bool {
        self.has_unsaved_changes(engine)
            && self
                .last_write
                .is_none_or(|written| written.elapsed() >= self.interval)
    }

    /// Save if there are changes and the interval has passed since the last write.
    /// Returns whether anything was written.
    pub async fn tick(&mut self, engine: &Engine) -> StorageResult<bool> {
        if !self.is_due(engine) {
            return Ok(false);
        }
        self.flush(engine).await?;
        Ok(true)
    }

    /// Write the engine's document now, under the key and as the last document.
    pub async fn flush(&mut self, engine: &Engine) -> StorageResult<()> {
        let document = engine.document();
        self.storage.save(&self.document_key, document).await?;
        self.storage.save(LAST_DOCUMENT_KEY, document).await?;
        info!(
            "Saved document '{}' at revision {}",
            self.document_key,
            engine.revision()
        );
        self.synced_revision = Some(engine.revision());
        self.last_write = Some(Instant::now());
        Ok(())
    }

    /// Stored document keys, without the reserved last-document key.
    pub async fn list_documents(&self) -> StorageResult<Vec<String>> {
        let keys = self.storage.list().await?;
        Ok(keys.into_iter().filter(|k| k != LAST_DOCUMENT_KEY).collect())
    }

    pub async fn delete(&self, key: &str) -> StorageResult<()> {
        self.storage.delete(key).await
    }

    pub async fn exists(&self, key: &str) -> StorageResult<bool> {
        self.storage.exists(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::storage::testing::block_on;

    fn manager(key: &str) -> AutoSaveManager<MemoryStorage> {
        AutoSaveManager::new(Arc::new(MemoryStorage::new()), key)
    }

    fn config() -> EngineConfig {
        EngineConfig::default().with_seed(5)
    }

    #[test]
    fn test_open_missing_key_is_clean() {
        let mut manager = manager("fresh");
        let engine = block_on(manager.open(config())).unwrap();
        assert_eq!(engine.document().boards.len(), 1);
        assert!(!manager.has_unsaved_changes(&engine));
        assert!(!block_on(manager.tick(&engine)).unwrap());
        assert!(!block_on(manager.exists("fresh")).unwrap());
    }

    #[test]
    fn test_tick_is_debounced() {
        let mut manager = manager("board");
        let mut engine = block_on(manager.open(config())).unwrap();

        engine.add_note("one");
        assert!(manager.is_due(&engine));
        assert!(block_on(manager.tick(&engine)).unwrap());
        assert!(!manager.has_unsaved_changes(&engine));

        engine.add_note("two");
        assert!(manager.has_unsaved_changes(&engine));
        // written moments ago
        assert!(!block_on(manager.tick(&engine)).unwrap());

        let mut manager = manager.with_interval(Duration::ZERO);
        assert!(block_on(manager.tick(&engine)).unwrap());
    }

    #[test]
    fn test_reopen_sees_flushed_changes() {
        let storage = Arc::new(MemoryStorage::new());
        let mut first = AutoSaveManager::new(storage.clone(), "roadmap");
        let mut engine = block_on(first.open(config())).unwrap();
        let id = engine.add_note("persisted");
        block_on(first.flush(&engine)).unwrap();

        let mut second = AutoSaveManager::new(storage, "roadmap");
        let reopened = block_on(second.open(config())).unwrap();
        assert!(reopened.item(id).is_some());
        assert_eq!(block_on(second.load_last()).as_ref(), Some(reopened.document()));
    }

    #[test]
    fn test_list_hides_last_document_key() {
        let mut manager = manager(DEFAULT_DOCUMENT_KEY);
        assert!(block_on(manager.load_last()).is_none());
        let engine = block_on(manager.open(config())).unwrap();
        block_on(manager.flush(&engine)).unwrap();

        let keys = block_on(manager.list_documents()).unwrap();
        assert_eq!(keys, vec![DEFAULT_DOCUMENT_KEY]);
        assert!(block_on(manager.exists(LAST_DOCUMENT_KEY)).unwrap());
    }
}
