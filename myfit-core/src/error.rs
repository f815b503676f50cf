/*!
Error types for the MyFit core store.
*/

use thiserror::Error;

/// Result type used throughout the MyFit core.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while reading or writing the store.
///
/// Repositories never return these directly: read failures are replaced by a
/// default collection and write failures are reported as
/// [`PersistOutcome::PersistFailed`](crate::PersistOutcome). They surface to
/// callers only from the key-value store port, configuration, and backup
/// import.
#[derive(Error, Debug)]
pub enum StoreError {
    /// I/O errors during file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Storage backend errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// The store refused a write because it would exceed its capacity
    #[error("Storage quota exceeded writing '{key}': {required} bytes needed, {quota} bytes allowed")]
    QuotaExceeded {
        key: String,
        required: usize,
        quota: usize,
    },

    /// Storage key contains characters the backend cannot represent
    #[error("Invalid storage key: '{0}'")]
    InvalidKey(String),

    /// Backup document rejected during import
    #[error("Invalid backup file format: {0}")]
    InvalidBackup(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

impl StoreError {
    /// Create a new storage error
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a new invalid backup error
    pub fn invalid_backup<S: Into<String>>(msg: S) -> Self {
        Self::InvalidBackup(msg.into())
    }
}
