//! Core error types for flowgenix-core.
//!
//! Every failure in the library is recoverable at the front-end boundary.
//! Validation problems abort the operation without touching state; degraded
//! capabilities and an unreachable app blocker never surface here at all and
//! are logged by the dispatcher instead.

use std::path::PathBuf;
use thiserror::Error;

use crate::timer::SessionState;

/// Core error type for flowgenix-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistent store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Focus timer rejected the requested transition
    #[error("Timer error: {0}")]
    Timer(#[from] TimerError),

    /// Coin ledger errors
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// Todo import errors
    #[error("Import error: {0}")]
    Import(#[from] ImportError),

    /// App blocker peer errors
    #[error("App blocker error: {0}")]
    Blocker(#[from] BlockerError),

    /// Reset with elapsed time needs an explicit confirmation
    #[error("Reset needs confirmation: {elapsed_secs}s of progress would be lost")]
    ConfirmationRequired { elapsed_secs: u64 },

    /// A todo or calendar event id did not resolve
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
}

/// Persistent store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the store
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Store is locked by another process
    #[error("Store is locked")]
    Locked,

    /// Could not resolve the data directory
    #[error("Cannot access data directory: {0}")]
    DataDir(String),
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
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Validation errors. Reported inline; the operation leaves state untouched.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was empty
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Starting a session without a duration
    #[error("Please set a timer duration first")]
    DurationNotSet,

    /// Changing the duration while a session is active
    #[error("Stop current timer before setting a new duration")]
    SessionActive,

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Rejected focus-session transitions.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TimerError {
    #[error("cannot {action} while {state:?}")]
    InvalidTransition {
        action: &'static str,
        state: SessionState,
    },
}

/// Coin ledger errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Not enough coins: need {needed}, have {available}")]
    InsufficientCoins { needed: u64, available: u64 },

    #[error("Unknown reward: {0}")]
    UnknownReward(u32),
}

/// Todo import errors. Existing todos are left unchanged.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Invalid file format: expected a JSON array of tasks")]
    NotAnArray,

    #[error("Invalid task at index {index}: {message}")]
    InvalidItem { index: usize, message: String },

    #[error("Malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// App blocker peer errors.
#[derive(Error, Debug)]
pub enum BlockerError {
    /// Peer unreachable (not running, refused, timed out)
    #[error("App blocker service unavailable: {0}")]
    Unavailable(String),

    /// Peer answered with a non-success HTTP status
    #[error("App blocker returned HTTP {status}")]
    Http { status: u16 },

    /// Peer answered with a body we could not decode
    #[error("Unexpected app blocker response: {0}")]
    Decode(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked
                    || e.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for BlockerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            BlockerError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            BlockerError::Http {
                status: status.as_u16(),
            }
        } else {
            BlockerError::Unavailable(err.to_string())
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
