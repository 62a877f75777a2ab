//! Where board documents live between sessions.
//!
//! The engine itself never touches storage. A host opens an engine through
//! [`AutoSaveManager::open`] (or loads a [`Document`] and calls
//! [`Engine::from_document`](crate::Engine::from_document)) and writes
//! [`Engine::document`](crate::Engine::document) back when the revision moves.

mod autosave;
mod file;
mod memory;

pub use autosave::{
    AutoSaveManager, DEFAULT_AUTOSAVE_INTERVAL_SECS, DEFAULT_DOCUMENT_KEY, LAST_DOCUMENT_KEY,
};
pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::model::Document;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// A keyed store of whole board documents.
pub trait Storage: Send + Sync {
    /// Store `document` under `key`, replacing what was there.
    fn save(&self, key: &str, document: &Document) -> BoxFuture<'_, StorageResult<()>>;

    /// Fails with [`StorageError::NotFound`] when nothing is stored under `key`.
    fn load(&self, key: &str) -> BoxFuture<'_, StorageResult<Document>>;

    /// Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// Stored keys in ascending order.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>>;

    fn exists(&self, key: &str) -> BoxFuture<'_, StorageResult<bool>>;
}

#[cfg(test)]
pub(crate) mod testing {
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    /// Minimal executor for the storage futures, which never actually wait.
    pub fn block_on<F: std::future::Future>(f: F) -> F::Output {
        fn dummy_raw_waker() -> RawWaker {
            fn no_op(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker {
                dummy_raw_waker()
            }
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
            RawWaker::new(std::ptr::null(), &VTABLE)
        }

        let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
        let mut cx = Context::from_waker(&waker);
        let mut f = std::pin::pin!(f);

        loop {
            if let Poll::Ready(result) = f.as_mut().poll(&mut cx) {
                return result;
            }
        }
    }
}
