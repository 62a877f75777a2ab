//! File-based storage implementation.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::model::Document;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Stores each document as a pretty-printed JSON file in one directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new file storage with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Directory used when no explicit location is configured.
    ///
    /// On Linux: `~/.local/share/devboard/boards/`
    pub fn default_path() -> StorageResult<PathBuf> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Ok(base.join("devboard").join("boards"))
    }

    /// Create file storage in the default location.
    pub fn default_location() -> StorageResult<Self> {
        Self::new(Self::default_path()?)
    }

    /// File path for a key. Characters unsafe in file names become `_`.
    fn document_path(&self, key: &str) -> PathBuf {
        let safe_key: String = key
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.base_path.join(format!("{}.json", safe_key))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

/// Write through a sibling temp file so a crash never leaves half a document.
fn write_atomic(path: &Path, contents: &str) -> StorageResult<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents)
        .and_then(|_| fs::rename(&tmp, path))
        .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))
}

impl Storage for FileStorage {
    fn save(&self, key: &str, document: &Document) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.document_path(key);
        let json = document.to_json();
        Box::pin(async move {
            let json = json.map_err(|e| StorageError::Serialization(e.to_string()))?;
            write_atomic(&path, &json)?;
            debug!("Saved {}", path.display());
            Ok(())
        })
    }

    fn load(&self, key: &str) -> BoxFuture<'_, StorageResult<Document>> {
        let path = self.document_path(key);
        let key = key.to_string();
        Box::pin(async move {
            if !path.exists() {
                return Err(StorageError::NotFound(key));
            }
            let json = fs::read_to_string(&path).map_err(|e| {
                StorageError::Io(format!("Failed to read {}: {}", path.display(), e))
            })?;
            Document::from_json(&json).map_err(|e| {
                StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
            })
        })
    }

    fn delete(&self, key: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.document_path(key);
        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
                })?;
            }
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        let base = self.base_path.clone();
        Box::pin(async move {
            if !base.exists() {
                return Ok(vec![]);
            }
            let entries = fs::read_dir(&base)
                .map_err(|e| StorageError::Io(format!("Failed to read directory: {}", e)))?;

            let mut keys: Vec<String> = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
                .filter_map(|path| path.file_stem()?.to_str().map(str::to_string))
                .collect();
            keys.sort();
            Ok(keys)
        })
    }

    fn exists(&self, key: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let path = self.document_path(key);
        Box::pin(async move { Ok(path.exists()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Item, ItemKind, ItemPayload};
    use crate::storage::testing::block_on;
    use tempfile::tempdir;

    #[test]
    fn test_file_storage_save_load() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();

        let mut doc = Document::new();
        let board = doc.active_board_id;
        doc.push_item(Item::new(board, ItemPayload::default_for(ItemKind::Milestone)));

        block_on(storage.save("work", &doc)).unwrap();
        let loaded = block_on(storage.load("work")).unwrap();
        assert_eq!(loaded, doc);
        assert!(!dir.path().join("work.json.tmp").exists());
    }

    #[test]
    fn test_file_storage_not_found() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        let result = block_on(storage.load("nonexistent"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_file_storage_rejects_garbage() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        fs::write(dir.path().join("broken.json"), "{ nope").unwrap();
        let result = block_on(storage.load("broken"));
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }

    #[test]
    fn test_file_storage_list_and_delete() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        let doc = Document::new();
        block_on(storage.save("doc2", &doc)).unwrap();
        block_on(storage.save("doc1", &doc)).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        assert_eq!(block_on(storage.list()).unwrap(), vec!["doc1", "doc2"]);
        block_on(storage.delete("doc1")).unwrap();
        assert!(!block_on(storage.exists("doc1")).unwrap());
    }

    #[test]
    fn test_file_storage_sanitizes_key() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path()).unwrap();
        let doc = Document::new();

        block_on(storage.save("team/board:one*", &doc)).unwrap();
        let loaded = block_on(storage.load("team/board:one*")).unwrap();
        assert_eq!(loaded.active_board_id, doc.active_board_id);
        assert!(dir.path().join("team_board_one_.json").exists());
    }
}
