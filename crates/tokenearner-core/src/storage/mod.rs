mod config;
pub mod database;
pub mod slot;

pub use config::{Config, HostConfig, LoggingConfig, StorageBackend, StorageConfig};
pub use database::SqliteSlot;
pub use slot::{FileSlot, MemorySlot, Slot};

use std::path::PathBuf;

use crate::error::{ConfigError, StorageError};

/// Returns `~/.config/tokenearner[-dev]/` based on TOKENEARNER_ENV.
///
/// Set TOKENEARNER_ENV=dev to use the development data directory, or
/// TOKENEARNER_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("TOKENEARNER_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("TOKENEARNER_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("tokenearner-dev")
            } else {
                base_dir.join("tokenearner")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(e.to_string()))?;
    Ok(dir)
}

/// Open the slot selected by `config.storage.backend` inside `dir`.
///
/// # Errors
/// Returns an error if the SQLite database cannot be opened.
pub fn open_slot(config: &Config, dir: PathBuf) -> Result<Box<dyn Slot>, StorageError> {
    let slot: Box<dyn Slot> = match config.storage.backend {
        StorageBackend::File => Box::new(FileSlot::new(dir)),
        StorageBackend::Sqlite => Box::new(SqliteSlot::open(&dir.join("tokenearner.db"))?),
        StorageBackend::Memory => Box::new(MemorySlot::new()),
    };
    tracing::debug!(backend = ?config.storage.backend, "opened ledger slot");
    Ok(slot)
}
