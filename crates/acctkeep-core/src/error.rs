//! Error types for storage and store operations.

use std::path::PathBuf;
use thiserror::Error;

/// Failure of a key-value storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to replace {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure to read or write the persisted account list.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to (de)serialize accounts: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Reasons an import is rejected. The store is left untouched in every case.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("import data is not valid JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("import data must be a JSON array of accounts")]
    NotAnArray,

    #[error("failed to save imported accounts: {0}")]
    Storage(#[from] StoreError),

    #[error("record {index} is not a valid account: {source}")]
    Record {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}
