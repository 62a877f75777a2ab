//! Error types for the command-line shell.

use devboard_core::exchange::ExchangeError;
use devboard_core::model::ParseItemKindError;
use devboard_core::storage::StorageError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to load the shell configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Any failure of a shell command.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Exchange(#[from] ExchangeError),
    #[error(transparent)]
    Kind(#[from] ParseItemKindError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("no item matches `{0}`")]
    UnknownItem(String),
    #[error("no board matches `{0}`")]
    UnknownBoard(String),
    #[error("`{0}` matches more than one entry, use a longer prefix")]
    Ambiguous(String),
}
