//! Error types for vault operations.
//!
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-friendly messages and exit codes.
//!
//! Per-record decryption failures are not errors at this level. They are
//! carried as data on [`crate::DecryptedRecord`] so a batch never aborts.

use thiserror::Error;
use uuid::Uuid;

/// Result type alias for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;

/// Core error type for vault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Passphrase rejected before key derivation
    #[error("Invalid passphrase: {0}")]
    InvalidPassphrase(String),

    /// A single record failed to authenticate or decode
    #[error("Record {id} could not be decrypted: {reason}")]
    RecordDecryptionFailed { id: Uuid, reason: String },

    /// Export attempted while the vault is not unlocked
    #[error("Export refused: {0}")]
    ExportPreconditionFailed(String),

    /// Operation not valid in the session's current state
    #[error("Invalid vault state: {0}")]
    InvalidState(String),

    /// Key derivation or encryption error
    #[error("Encryption error: {0}")]
    Crypto(String),

    /// Storage backend error (generic)
    #[error("Storage error: {0}")]
    Storage(String),

    /// SQLite-specific storage error
    #[error("SQLite error: {source}")]
    Sqlite {
        #[from]
        source: rusqlite::Error,
    },

    /// Record not found by ID
    #[error("Record not found: {0}")]
    RecordNotFound(Uuid),

    /// Invalid caller input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}
