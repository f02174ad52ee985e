//! Core error types for tokenearner-core.
//!
//! Every failure in the core is recoverable: storage errors degrade to a
//! default ledger or a logged no-op, and transition errors leave state
//! untouched so the user can simply try again.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for tokenearner-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rejected reward transitions
    #[error("{0}")]
    Reward(#[from] RewardError),

    /// Host shell errors
    #[error("Host error: {0}")]
    Host(#[from] HostError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by a durable key-value slot.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Reading the slot failed
    #[error("Failed to read '{key}': {message}")]
    ReadFailed { key: String, message: String },

    /// Writing the slot failed (quota, permissions, disk full)
    #[error("Failed to write '{key}': {message}")]
    WriteFailed { key: String, message: String },

    /// Stored blob could not be decoded
    #[error("Malformed ledger blob: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Failed to open the backing database
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// SQLite query failed
    #[error("Query failed: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Data directory could not be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// A reward transition the state machine refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewardError {
    /// Earn requested while a countdown is running
    #[error("Please wait for the current task to complete")]
    Busy,

    /// Claim requested before the countdown completed
    #[error("Nothing to claim yet")]
    NothingToClaim,

    /// The external link could not be opened
    #[error("Failed to open link. Please try again.")]
    LinkOpen(#[from] HostError),
}

/// Host shell failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// Opening the external link failed
    #[error("could not open {url}: {message}")]
    LinkOpenFailed { url: String, message: String },

    /// The link is not a valid absolute URL
    #[error("invalid link '{0}'")]
    InvalidUrl(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
