//! Command-line shell for DevBoard.
//!
//! Hosts a [`devboard_core::Engine`] over a file-backed document store. Each
//! invocation opens the stored document, applies one [`BoardCommand`] and
//! saves the document if the command changed it.

pub mod args;
pub mod config;
pub mod error;
pub mod session;
pub mod shortcuts;

pub use args::{Args, BoardCommand, ExportFormat};
pub use config::{AppConfig, load_config};
pub use error::{AppError, ConfigError};
pub use session::Session;

use devboard_core::storage::FileStorage;
use log::info;
use std::io;
use std::sync::Arc;

/// Run the DevBoard shell.
///
/// # Errors
///
/// Returns `AppError` for configuration, storage, import and I/O failures,
/// and for ids that match no item or board.
pub fn run(args: &Args) -> Result<(), AppError> {
    let config = load_config(args.config.as_deref())?;
    let data_dir = match args.data_dir.clone().or_else(|| config.data_dir.clone()) {
        Some(dir) => dir,
        None => FileStorage::default_path()?,
    };
    info!("Using data directory {}", data_dir.display());

    let storage = Arc::new(FileStorage::new(data_dir)?);
    let mut session = Session::open(storage, &config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    session.execute(&args.command, &mut out)?;

    session.close()?;
    Ok(())
}
